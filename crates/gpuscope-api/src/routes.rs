use std::path::PathBuf;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;

use crate::handlers::{gpu_metrics, gpu_nodes, gpu_utilization, health};
use crate::middleware::{cors_layer, enforce_deadline, handle_panic, log_requests};
use crate::state::AppState;

/// Headroom between the collector deadline and the request guard.
pub const DEADLINE_GRACE: Duration = Duration::from_secs(5);

/// API routes plus the static frontend, wrapped in
/// log → CORS → deadline guard → panic recovery (outermost first).
///
/// The guard limit is the collector deadline plus [`DEADLINE_GRACE`].
pub fn build_router(st: AppState, static_dir: Option<PathBuf>) -> Router {
    let request_limit = st.collector.request_timeout() + DEADLINE_GRACE;

    let gpu_routes = Router::new()
        .route("/metrics", get(gpu_metrics))
        .route("/nodes", get(gpu_nodes))
        .route("/utilization", get(gpu_utilization));

    let api_routes = Router::new()
        .route("/health", get(health))
        .nest("/v1/gpu", gpu_routes);

    let mut app = Router::new().nest("/api", api_routes).with_state(st);
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(request_limit, enforce_deadline))
        .layer(cors_layer())
        .layer(middleware::from_fn(log_requests))
}
