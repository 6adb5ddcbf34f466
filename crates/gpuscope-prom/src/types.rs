use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PromError;
use crate::schema::PROBE_QUERY;

/// Decoded `/api/v1/query` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub status: String,
    #[serde(default)]
    pub data: QueryData,
    #[serde(default, rename = "errorType", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryData {
    #[serde(rename = "resultType", default)]
    pub result_type: String,
    #[serde(default)]
    pub result: Vec<Sample>,
}

/// One instant-vector element: labels plus a single `[ts, "value"]` pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(default)]
    pub metric: HashMap<String, String>,
    #[serde(default)]
    pub value: Option<SampleValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleValue(pub f64, pub String);

impl QueryResponse {
    pub fn vector(samples: Vec<Sample>) -> Self {
        Self {
            status: "success".to_string(),
            data: QueryData {
                result_type: "vector".to_string(),
                result: samples,
            },
            error_type: None,
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Turn a decoded non-success envelope into [`PromError::Query`].
    pub fn into_result(self) -> Result<Self, PromError> {
        if self.is_success() {
            return Ok(self);
        }
        Err(PromError::Query {
            error_type: self.error_type.unwrap_or_default(),
            message: self.error.unwrap_or_default(),
        })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.data.result
    }
}

impl Sample {
    pub fn new(labels: &[(&str, &str)], timestamp: f64, value: &str) -> Self {
        Self {
            metric: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            value: Some(SampleValue(timestamp, value.to_string())),
        }
    }

    /// Label value, or `""` when the label is absent.
    pub fn label(&self, name: &str) -> &str {
        self.metric.get(name).map(String::as_str).unwrap_or("")
    }

    /// Sample value as a finite number.
    ///
    /// `None` when the value is missing, not numeric, or NaN/Inf.
    pub fn parsed_value(&self) -> Option<f64> {
        let raw = self.value.as_ref()?.1.trim();
        raw.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    pub fn timestamp(&self) -> Option<f64> {
        self.value.as_ref().map(|v| v.0)
    }
}

/// Executes single instant queries against a Prometheus-compatible backend.
///
/// Implementations must be safe to call concurrently; the fan-out issues
/// every query of a request at once through the same instance.
#[async_trait]
pub trait QueryApi: Send + Sync {
    async fn query(&self, expr: &str) -> Result<QueryResponse, PromError>;

    /// Lightweight connectivity check.
    async fn probe(&self) -> Result<QueryResponse, PromError> {
        self.query(PROBE_QUERY).await
    }
}
