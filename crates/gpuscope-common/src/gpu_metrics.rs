use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bytes in one gigabyte as reported to the dashboard (2^30).
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Merged view of a single GPU, keyed by `(node_name, gpu_index)`.
///
/// Memory figures are gigabytes, power is watts, temperature is Celsius and
/// both utilization fields are percentages in `0..=100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuMetrics {
    pub node_name: String,
    pub gpu_index: u32,
    #[serde(default)]
    pub gpu_name: String,
    #[serde(default)]
    pub utilization: f64,
    #[serde(default)]
    pub memory_used: f64,
    #[serde(default)]
    pub memory_total: f64,
    #[serde(default)]
    pub memory_free: f64,
    #[serde(default)]
    pub memory_utilization: f64,
    #[serde(default)]
    pub temperature: f64,
    #[serde(default)]
    pub power_draw: f64,
    #[serde(default)]
    pub power_limit: f64,
    pub timestamp: DateTime<Utc>,
}

impl GpuMetrics {
    pub fn new(node_name: &str, gpu_index: u32, timestamp: DateTime<Utc>) -> Self {
        Self {
            node_name: node_name.to_string(),
            gpu_index,
            gpu_name: String::new(),
            utilization: 0.0,
            memory_used: 0.0,
            memory_total: 0.0,
            memory_free: 0.0,
            memory_utilization: 0.0,
            temperature: 0.0,
            power_draw: 0.0,
            power_limit: 0.0,
            timestamp,
        }
    }
}

/// Raw utilization projection served by the lightweight endpoint.
///
/// `gpu_index` and `utilization` are passed through as the label and value
/// strings Prometheus returned; `timestamp` is the sample's Unix time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuUtilization {
    pub node: String,
    pub gpu_index: String,
    pub utilization: String,
    pub timestamp: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_has_zero_defaults() {
        let ts = Utc::now();
        let m = GpuMetrics::new("node1", 3, ts);
        assert_eq!(m.node_name, "node1");
        assert_eq!(m.gpu_index, 3);
        assert!(m.gpu_name.is_empty());
        assert_eq!(m.utilization, 0.0);
        assert_eq!(m.power_limit, 0.0);
        assert_eq!(m.timestamp, ts);
    }

    #[test]
    fn test_serializes_frontend_field_names() {
        let m = GpuMetrics::new("node1", 0, Utc::now());
        let v = serde_json::to_value(&m).unwrap();
        for field in [
            "node_name",
            "gpu_index",
            "gpu_name",
            "utilization",
            "memory_used",
            "memory_total",
            "memory_free",
            "memory_utilization",
            "temperature",
            "power_draw",
            "power_limit",
            "timestamp",
        ] {
            assert!(v.get(field).is_some(), "missing field {field}");
        }
        assert!(v["timestamp"].is_string());
    }
}
