use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use gpuscope_common::{GpuMetrics, GpuNode, GpuUtilization};

use crate::error::PromError;
use crate::fanout::fan_out;
use crate::http::DEFAULT_QUERY_TIMEOUT;
use crate::merge::merge;
use crate::nodes::list_nodes;
use crate::schema::{GpuQuery, GPU_LABEL, NODE_LABEL, UTILIZATION_QUERY};
use crate::types::QueryApi;

/// Request-level entry point used by the HTTP layer.
///
/// Every operation runs under `request_timeout`; hitting it drops all
/// in-flight queries and yields [`PromError::Timeout`].
#[derive(Clone)]
pub struct GpuCollector {
    api: Arc<dyn QueryApi>,
    request_timeout: Duration,
}

impl GpuCollector {
    pub fn new(api: Arc<dyn QueryApi>) -> Self {
        Self {
            api,
            request_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub async fn gpu_metrics(&self) -> Result<Vec<GpuMetrics>, PromError> {
        let results = self
            .with_deadline(fan_out(self.api.as_ref(), &GpuQuery::ALL))
            .await?;
        Ok(merge(&results, Utc::now()))
    }

    pub async fn gpu_nodes(&self) -> Result<Vec<GpuNode>, PromError> {
        self.with_deadline(list_nodes(self.api.as_ref())).await
    }

    /// Raw utilization samples, bypassing the join.
    pub async fn gpu_utilization(&self) -> Result<Vec<GpuUtilization>, PromError> {
        let resp = self.with_deadline(self.api.query(UTILIZATION_QUERY)).await?;
        let samples = resp
            .samples()
            .iter()
            .filter_map(|s| {
                let value = s.value.as_ref()?;
                Some(GpuUtilization {
                    node: s.label(NODE_LABEL).to_string(),
                    gpu_index: s.label(GPU_LABEL).to_string(),
                    utilization: value.1.clone(),
                    timestamp: value.0,
                })
            })
            .collect();
        Ok(samples)
    }

    /// Backend connectivity check; the executor applies its own probe timeout.
    pub async fn health(&self) -> Result<(), PromError> {
        self.api.probe().await.map(|_| ())
    }

    async fn with_deadline<T, F>(&self, fut: F) -> Result<T, PromError>
    where
        F: Future<Output = Result<T, PromError>>,
    {
        match tokio::time::timeout(self.request_timeout, fut).await {
            Ok(res) => res,
            Err(_) => Err(PromError::Timeout(self.request_timeout)),
        }
    }
}
