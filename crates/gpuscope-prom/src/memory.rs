use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::PromError;
use crate::types::{QueryApi, QueryResponse, Sample};

#[derive(Debug, Clone)]
enum Fixture {
    Respond(QueryResponse),
    Fail(String),
}

/// In-memory backend answering from canned responses keyed by expression.
///
/// Expressions without a fixture answer with an empty vector. Every issued
/// expression is recorded so callers can assert on what was asked.
#[derive(Debug, Clone, Default)]
pub struct StaticQueryApi {
    fixtures: Arc<HashMap<String, Fixture>>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StaticQueryApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_fixture(mut self, expr: &str, fixture: Fixture) -> Self {
        Arc::make_mut(&mut self.fixtures).insert(expr.to_string(), fixture);
        self
    }

    pub fn with_response(self, expr: &str, response: QueryResponse) -> Self {
        self.with_fixture(expr, Fixture::Respond(response))
    }

    pub fn with_vector(self, expr: &str, samples: Vec<Sample>) -> Self {
        self.with_response(expr, QueryResponse::vector(samples))
    }

    /// Make `expr` fail with a query error carrying `message`.
    pub fn with_failure(self, expr: &str, message: &str) -> Self {
        self.with_fixture(expr, Fixture::Fail(message.to_string()))
    }

    /// Delay every answer, to exercise deadlines.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl QueryApi for StaticQueryApi {
    async fn query(&self, expr: &str) -> Result<QueryResponse, PromError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(expr.to_string());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.fixtures.get(expr) {
            Some(Fixture::Respond(resp)) => resp.clone().into_result(),
            Some(Fixture::Fail(message)) => Err(PromError::Query {
                error_type: "unavailable".to_string(),
                message: message.clone(),
            }),
            None => Ok(QueryResponse::vector(Vec::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixtures_and_call_log() {
        let api = StaticQueryApi::new()
            .with_vector("a", vec![Sample::new(&[("node", "n1")], 1.0, "2")])
            .with_failure("b", "down");

        assert_eq!(api.query("a").await.unwrap().samples().len(), 1);
        assert!(matches!(api.query("b").await, Err(PromError::Query { .. })));
        assert!(api.query("c").await.unwrap().samples().is_empty());
        assert_eq!(api.calls(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_default_probe_queries_up() {
        let api = StaticQueryApi::new().with_failure("up", "connection refused");
        assert!(api.probe().await.is_err());
        assert_eq!(api.calls(), vec!["up"]);
    }

    #[tokio::test]
    async fn test_non_success_response_is_error() {
        let mut resp = QueryResponse::vector(Vec::new());
        resp.status = "error".to_string();
        resp.error = Some("boom".to_string());
        let api = StaticQueryApi::new().with_response("x", resp);
        assert!(api.query("x").await.is_err());
    }
}
