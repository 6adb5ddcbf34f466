use std::time::Duration;

use thiserror::Error;

/// Failures talking to the Prometheus query API.
#[derive(Debug, Error)]
pub enum PromError {
    /// The request never produced a complete HTTP response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Prometheus answered with something other than 200 OK.
    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not a query envelope.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The envelope decoded but reported `status != "success"`.
    #[error("prometheus query failed: {error_type} - {message}")]
    Query { error_type: String, message: String },

    /// One query of a fan-out failed.
    #[error("query {name} failed: {source}")]
    QueryFailed {
        name: &'static str,
        #[source]
        source: Box<PromError>,
    },

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

impl PromError {
    /// Short class name used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            PromError::Transport(_) => "transport",
            PromError::Status { .. } | PromError::Decode(_) => "protocol",
            PromError::Query { .. } => "query",
            PromError::QueryFailed { source, .. } => source.kind(),
            PromError::Timeout(_) => "timeout",
        }
    }

    /// Logical query name when this error came out of a fan-out.
    pub fn failed_query(&self) -> Option<&'static str> {
        match self {
            PromError::QueryFailed { name, .. } => Some(*name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_out_error_names_query_and_keeps_cause() {
        let err = PromError::QueryFailed {
            name: "temperature",
            source: Box::new(PromError::Query {
                error_type: "bad_data".to_string(),
                message: "parse error".to_string(),
            }),
        };
        assert_eq!(err.failed_query(), Some("temperature"));
        assert_eq!(err.kind(), "query");
        let text = err.to_string();
        assert!(text.contains("temperature"));
        assert!(text.contains("parse error"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_protocol_kinds() {
        let err = PromError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.kind(), "protocol");

        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(PromError::from(decode).kind(), "protocol");
    }
}
