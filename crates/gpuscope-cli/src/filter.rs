use gpuscope_common::GpuMetrics;

use crate::args::MetricsFilterArgs;

pub const HIGH_UTILIZATION: f64 = 80.0;
const ACTIVE_UTILIZATION: f64 = 5.0;
const HOT_TEMPERATURE: f64 = 80.0;

impl MetricsFilterArgs {
    pub fn matches(&self, gpu: &GpuMetrics) -> bool {
        if let Some(needle) = &self.node {
            if !gpu
                .node_name
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        let util = gpu.utilization;
        let temp = gpu.temperature;
        self.min_util.map_or(true, |v| util >= v)
            && self.max_util.map_or(true, |v| util <= v)
            && self.min_temp.map_or(true, |v| temp >= v)
            && self.max_temp.map_or(true, |v| temp <= v)
            && (!self.high_util || util >= HIGH_UTILIZATION)
    }

    pub fn apply(&self, metrics: Vec<GpuMetrics>) -> Vec<GpuMetrics> {
        metrics.into_iter().filter(|g| self.matches(g)).collect()
    }
}

/// Fleet-wide numbers printed under the metrics table.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: usize,
    pub active: usize,
    pub avg_utilization: f64,
    pub hot: usize,
}

pub fn summarize(metrics: &[GpuMetrics]) -> Summary {
    let total = metrics.len();
    let avg_utilization = if total == 0 {
        0.0
    } else {
        metrics.iter().map(|g| g.utilization).sum::<f64>() / total as f64
    };
    Summary {
        total,
        active: metrics
            .iter()
            .filter(|g| g.utilization > ACTIVE_UTILIZATION)
            .count(),
        avg_utilization,
        hot: metrics
            .iter()
            .filter(|g| g.temperature > HOT_TEMPERATURE)
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn gpu(node: &str, idx: u32, util: f64, temp: f64) -> GpuMetrics {
        let mut g = GpuMetrics::new(node, idx, Utc::now());
        g.utilization = util;
        g.temperature = temp;
        g
    }

    fn fleet() -> Vec<GpuMetrics> {
        vec![
            gpu("gpu-node-a", 0, 95.0, 82.0),
            gpu("gpu-node-a", 1, 2.0, 40.0),
            gpu("worker-b", 0, 50.0, 65.0),
        ]
    }

    #[test]
    fn test_no_filters_keeps_everything() {
        let f = MetricsFilterArgs::default();
        assert_eq!(f.apply(fleet()).len(), 3);
    }

    #[test]
    fn test_node_substring_case_insensitive() {
        let f = MetricsFilterArgs {
            node: Some("NODE-A".into()),
            ..Default::default()
        };
        let out = f.apply(fleet());
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|g| g.node_name == "gpu-node-a"));
    }

    #[test]
    fn test_ranges_are_inclusive() {
        let f = MetricsFilterArgs {
            min_util: Some(50.0),
            max_temp: Some(65.0),
            ..Default::default()
        };
        let out = f.apply(fleet());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].node_name, "worker-b");
    }

    #[test]
    fn test_high_util_only() {
        let f = MetricsFilterArgs {
            high_util: true,
            ..Default::default()
        };
        let out = f.apply(fleet());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].utilization, 95.0);
    }

    #[test]
    fn test_summary() {
        let s = summarize(&fleet());
        assert_eq!(s.total, 3);
        assert_eq!(s.active, 2);
        assert_eq!(s.hot, 1);
        assert!((s.avg_utilization - 49.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_empty() {
        let s = summarize(&[]);
        assert_eq!(s.total, 0);
        assert_eq!(s.avg_utilization, 0.0);
    }
}
