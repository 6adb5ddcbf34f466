pub mod api_response;
pub mod gpu_metrics;
pub mod gpu_node;

pub use api_response::ApiResponse;
pub use gpu_metrics::{GpuMetrics, GpuUtilization, BYTES_PER_GB};
pub use gpu_node::{GpuNode, HealthStatus};

pub mod telemetry;
