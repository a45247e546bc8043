//! Request-level error taxonomy.
//!
//! `ApiError::InvalidInput` is the only error the evaluation pipeline surfaces to
//! callers: malformed submissions fail fast, before any model call. AI-boundary
//! failures are represented separately as `AiUnavailable` and are always absorbed
//! by the deterministic fallback, never returned from a handler.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  /// Malformed request: empty question set, answer referencing an unknown
  /// question, and similar contract violations. No fallback is attempted.
  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("internal error: {0}")]
  Internal(String),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, detail) = match &self {
      ApiError::InvalidInput(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
      ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
    };
    (status, Json(json!({ "detail": detail }))).into_response()
  }
}

/// Recoverable AI-boundary failure: transport error, non-success status,
/// unparseable body, or a response missing required fields. Carries the reason
/// for logging only; callers react to the variant, not the text.
#[derive(Debug, Clone, Error)]
pub enum AiUnavailable {
  #[error("model transport error: {0}")]
  Transport(String),
  #[error("model returned HTTP {status}: {message}")]
  Status { status: u16, message: String },
  #[error("malformed model response: {0}")]
  Malformed(String),
  #[error("no model configured")]
  NotConfigured,
}
