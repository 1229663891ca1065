use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Request failures. Every variant is the caller's fault and maps to 400.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("{name} must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f64 },
    #[error("step must be positive, got {0}")]
    NonPositiveStep(f64),
    #[error("limit must be between 1 and {max}, got {limit}")]
    LimitOutOfRange { limit: u32, max: u32 },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!("rejected request: {self}");
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
