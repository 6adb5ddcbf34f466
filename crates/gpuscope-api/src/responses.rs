use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gpuscope_common::ApiResponse;
use serde::Serialize;

pub fn ok_response<T: Serialize>(data: T, message: &str) -> Response {
    (StatusCode::OK, Json(ApiResponse::ok(data, message))).into_response()
}

/// Error envelope. `message` is shown to clients as-is, so it must never
/// carry upstream error text.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ApiResponse::<()>::failure(message))).into_response()
}
