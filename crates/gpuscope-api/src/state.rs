use std::sync::Arc;

use gpuscope_prom::{GpuCollector, QueryApi};

#[derive(Clone)]
pub struct AppState {
    pub collector: GpuCollector,
    pub version: &'static str,
}

impl AppState {
    pub fn new(api: Arc<dyn QueryApi>) -> Self {
        Self::with_collector(GpuCollector::new(api))
    }

    pub fn with_collector(collector: GpuCollector) -> Self {
        Self {
            collector,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
