use std::collections::HashMap;

use chrono::{DateTime, Utc};
use gpuscope_common::{GpuMetrics, BYTES_PER_GB};

use crate::fanout::QueryResults;
use crate::schema::{Conversion, GpuQuery, GPU_LABEL, MODEL_LABEL, NODE_LABEL};
use crate::types::Sample;

/// Join per-metric result sets into one record per `(node, gpu)`.
///
/// Samples without both join labels, with a non-integer GPU index or with a
/// non-numeric value are skipped. Memory utilization is always derived from
/// used/total. Output is sorted by node name, then GPU index.
pub fn merge(results: &QueryResults, captured_at: DateTime<Utc>) -> Vec<GpuMetrics> {
    let mut records: HashMap<(String, u32), GpuMetrics> = HashMap::new();

    for (&query, response) in results {
        for sample in response.samples() {
            let node = sample.label(NODE_LABEL);
            let gpu = sample.label(GPU_LABEL);
            if node.is_empty() || gpu.is_empty() {
                continue;
            }
            let Some(value) = sample.parsed_value() else {
                continue;
            };
            let Ok(gpu_index) = gpu.trim().parse::<u32>() else {
                continue;
            };

            let record = records
                .entry((node.to_string(), gpu_index))
                .or_insert_with(|| GpuMetrics::new(node, gpu_index, captured_at));
            apply(record, query, value, sample);
        }
    }

    let mut merged: Vec<GpuMetrics> = records
        .into_values()
        .map(|mut record| {
            if record.memory_total > 0.0 {
                record.memory_utilization = record.memory_used / record.memory_total * 100.0;
            }
            record
        })
        .collect();
    merged.sort_by(|a, b| {
        a.node_name
            .cmp(&b.node_name)
            .then(a.gpu_index.cmp(&b.gpu_index))
    });
    merged
}

fn apply(record: &mut GpuMetrics, query: GpuQuery, value: f64, sample: &Sample) {
    let value = match query.conversion() {
        Conversion::Identity => value,
        Conversion::BytesToGigabytes => value / BYTES_PER_GB,
        Conversion::ModelLabel => {
            if let Some(name) = sample.metric.get(MODEL_LABEL) {
                record.gpu_name = name.clone();
            }
            return;
        }
    };

    match query {
        GpuQuery::Utilization => record.utilization = value,
        GpuQuery::MemoryUsed => record.memory_used = value,
        GpuQuery::MemoryTotal => record.memory_total = value,
        GpuQuery::MemoryFree => record.memory_free = value,
        GpuQuery::Temperature => record.temperature = value,
        GpuQuery::PowerDraw => record.power_draw = value,
        GpuQuery::PowerLimit => record.power_limit = value,
        GpuQuery::GpuName => {}
    }
}
