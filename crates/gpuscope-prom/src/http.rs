use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::PromError;
use crate::schema::PROBE_QUERY;
use crate::types::{QueryApi, QueryResponse};

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

const MAX_LOGGED_BODY: usize = 512;

/// Instant-query executor backed by a shared `reqwest` connection pool.
#[derive(Debug, Clone)]
pub struct HttpQueryClient {
    base_url: String,
    http: reqwest::Client,
    query_timeout: Duration,
    probe_timeout: Duration,
}

impl HttpQueryClient {
    pub fn new(base_url: &str) -> Result<Self, PromError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(3))
            .timeout(DEFAULT_QUERY_TIMEOUT)
            .build()?;
        Ok(Self::with_client(base_url, http))
    }

    pub fn with_client(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, query_timeout: Duration, probe_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self.probe_timeout = probe_timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn execute(&self, expr: &str, timeout: Duration) -> Result<QueryResponse, PromError> {
        let url = format!("{}/api/v1/query", self.base_url);
        let now = Utc::now().timestamp().to_string();

        let resp = self
            .http
            .get(&url)
            .query(&[("query", expr), ("time", now.as_str())])
            .timeout(timeout)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if status != reqwest::StatusCode::OK {
            return Err(PromError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_LOGGED_BODY),
            });
        }

        let decoded: QueryResponse = serde_json::from_str(&body)?;
        let decoded = decoded.into_result()?;
        tracing::debug!(
            query = expr,
            result_type = %decoded.data.result_type,
            series = decoded.data.result.len(),
            "prometheus query ok"
        );
        Ok(decoded)
    }
}

#[async_trait]
impl QueryApi for HttpQueryClient {
    async fn query(&self, expr: &str) -> Result<QueryResponse, PromError> {
        self.execute(expr, self.query_timeout).await
    }

    async fn probe(&self) -> Result<QueryResponse, PromError> {
        self.execute(PROBE_QUERY, self.probe_timeout).await
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
