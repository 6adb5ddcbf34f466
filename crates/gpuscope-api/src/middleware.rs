use std::any::Any;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{Any as AnyOrigin, CorsLayer};

use crate::responses::error_response;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Log one line per request: method, path, status, latency and peer.
pub async fn log_requests(
    req: Request<Body>,
    next: Next,
) -> Result<Response, std::convert::Infallible> {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let remote = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.to_string())
        .unwrap_or_else(|| "-".to_string());
    let request_id = format!("req_{}", uuid::Uuid::new_v4());

    let mut resp = next.run(req).await;

    let status = resp.status().as_u16();
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    if status >= 500 {
        tracing::warn!(%method, %path, status, latency_ms, %remote, %request_id, "request");
    } else {
        tracing::info!(%method, %path, status, latency_ms, %remote, %request_id, "request");
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    Ok(resp)
}

/// Last-resort limit for a whole request.
///
/// Set above the collector deadline so slow upstream queries still end in
/// the handler's own error envelope; this only fires for requests stuck
/// somewhere else.
pub async fn enforce_deadline(
    State(limit): State<Duration>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, std::convert::Infallible> {
    let path = req.uri().path().to_string();
    match tokio::time::timeout(limit, next.run(req)).await {
        Ok(resp) => Ok(resp),
        Err(_) => {
            tracing::error!(%path, limit_ms = limit.as_millis() as u64, "request deadline exceeded");
            Ok(error_response(StatusCode::GATEWAY_TIMEOUT, "Request timed out"))
        }
    }
}

/// Any origin, the usual REST verbs, preflight cached for a day.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(86400))
}

/// Panic handler for `CatchPanicLayer`.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "panic recovered");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    use super::*;

    #[tokio::test]
    async fn test_panic_becomes_500_envelope() {
        let app = Router::new()
            .route(
                "/boom",
                get(|| async {
                    if true {
                        panic!("handler exploded");
                    }
                    "unreachable"
                }),
            )
            .layer(CatchPanicLayer::custom(handle_panic));

        let req = Request::builder().uri("/boom").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Internal Server Error");
    }

    #[tokio::test]
    async fn test_log_requests_sets_request_id() {
        let app = Router::new()
            .route("/ok", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn(log_requests));

        let req = Request::builder().uri("/ok").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let id = resp.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap();
        assert!(id.starts_with("req_"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stuck_request_gets_timeout_envelope() {
        let app = Router::new()
            .route(
                "/stuck",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(600)).await;
                    "late"
                }),
            )
            .layer(axum::middleware::from_fn_with_state(
                Duration::from_secs(35),
                enforce_deadline,
            ));

        let req = Request::builder().uri("/stuck").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Request timed out");
    }

    #[tokio::test]
    async fn test_cors_headers_on_simple_request() {
        let app = Router::new()
            .route("/ok", get(|| async { "ok" }))
            .layer(cors_layer());

        let req = Request::builder()
            .uri("/ok")
            .header("Origin", "http://dashboard.local")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
