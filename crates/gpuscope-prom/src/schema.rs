//! Metric names and labels expected from the nvidia_smi exporter.
//!
//! This table is the contract with the backend: every series is joined on
//! the `node` and `gpu` labels and the model name comes from the `name`
//! label of `nvidia_smi_gpu_info`.

pub const NODE_LABEL: &str = "node";
pub const GPU_LABEL: &str = "gpu";
pub const MODEL_LABEL: &str = "name";

pub const PROBE_QUERY: &str = "up";
pub const GPU_INFO_METRIC: &str = "nvidia_smi_gpu_info";
pub const UTILIZATION_QUERY: &str = "nvidia_smi_utilization_gpu_ratio * 100";

/// How a query's sample value lands in the merged record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Identity,
    BytesToGigabytes,
    ModelLabel,
}

/// The fixed set of queries fanned out for every metrics request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GpuQuery {
    Utilization,
    MemoryUsed,
    MemoryTotal,
    MemoryFree,
    Temperature,
    PowerDraw,
    PowerLimit,
    GpuName,
}

impl GpuQuery {
    pub const ALL: [GpuQuery; 8] = [
        GpuQuery::Utilization,
        GpuQuery::MemoryUsed,
        GpuQuery::MemoryTotal,
        GpuQuery::MemoryFree,
        GpuQuery::Temperature,
        GpuQuery::PowerDraw,
        GpuQuery::PowerLimit,
        GpuQuery::GpuName,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GpuQuery::Utilization => "utilization",
            GpuQuery::MemoryUsed => "memory_used",
            GpuQuery::MemoryTotal => "memory_total",
            GpuQuery::MemoryFree => "memory_free",
            GpuQuery::Temperature => "temperature",
            GpuQuery::PowerDraw => "power_draw",
            GpuQuery::PowerLimit => "power_limit",
            GpuQuery::GpuName => "gpu_name",
        }
    }

    pub fn promql(self) -> &'static str {
        match self {
            GpuQuery::Utilization => UTILIZATION_QUERY,
            GpuQuery::MemoryUsed => "nvidia_smi_memory_used_bytes",
            GpuQuery::MemoryTotal => "nvidia_smi_memory_total_bytes",
            GpuQuery::MemoryFree => "nvidia_smi_memory_free_bytes",
            GpuQuery::Temperature => "nvidia_smi_temperature_gpu_celsius",
            GpuQuery::PowerDraw => "nvidia_smi_power_draw_watts",
            GpuQuery::PowerLimit => "nvidia_smi_enforced_power_limit_watts",
            GpuQuery::GpuName => GPU_INFO_METRIC,
        }
    }

    pub fn conversion(self) -> Conversion {
        match self {
            GpuQuery::MemoryUsed | GpuQuery::MemoryTotal | GpuQuery::MemoryFree => {
                Conversion::BytesToGigabytes
            }
            GpuQuery::GpuName => Conversion::ModelLabel,
            _ => Conversion::Identity,
        }
    }
}

/// Distinct (node, model) pairs that expose GPUs.
pub fn nodes_query() -> String {
    format!("group by ({NODE_LABEL}, {MODEL_LABEL}) ({GPU_INFO_METRIC})")
}

/// GPU count for a single node.
pub fn node_count_query(node: &str) -> String {
    format!(
        "count by ({NODE_LABEL}) ({GPU_INFO_METRIC}{{{NODE_LABEL}=\"{}\"}})",
        escape_label_value(node)
    )
}

fn escape_label_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}
