use axum::{extract::State, http::StatusCode, response::Response};
use chrono::{SecondsFormat, Utc};
use gpuscope_common::HealthStatus;

use crate::responses::{error_response, ok_response};
use crate::state::AppState;

pub async fn health(State(st): State<AppState>) -> Response {
    if let Err(e) = st.collector.health().await {
        tracing::error!(error=%e, kind = e.kind(), "health check failed");
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "Prometheus connection failed");
    }

    let status = HealthStatus {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        version: st.version.to_string(),
    };
    ok_response(status, "Service is healthy")
}

pub async fn gpu_metrics(State(st): State<AppState>) -> Response {
    match st.collector.gpu_metrics().await {
        Ok(metrics) => {
            tracing::debug!(gpus = metrics.len(), "gpu metrics merged");
            ok_response(metrics, "GPU metrics retrieved successfully")
        }
        Err(e) => {
            tracing::error!(
                error=%e,
                kind = e.kind(),
                query = e.failed_query().unwrap_or("-"),
                "failed to get gpu metrics"
            );
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to retrieve GPU metrics")
        }
    }
}

pub async fn gpu_nodes(State(st): State<AppState>) -> Response {
    match st.collector.gpu_nodes().await {
        Ok(nodes) => ok_response(nodes, "GPU nodes retrieved successfully"),
        Err(e) => {
            tracing::error!(error=%e, kind = e.kind(), "failed to get gpu nodes");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to retrieve GPU nodes")
        }
    }
}

pub async fn gpu_utilization(State(st): State<AppState>) -> Response {
    match st.collector.gpu_utilization().await {
        Ok(samples) => ok_response(samples, "GPU utilization retrieved successfully"),
        Err(e) => {
            tracing::error!(error=%e, kind = e.kind(), "failed to get gpu utilization");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve GPU utilization",
            )
        }
    }
}
