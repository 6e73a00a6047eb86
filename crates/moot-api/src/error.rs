//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("password hashing failed: {0}")]
  Hash(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Map the domain taxonomy onto HTTP semantics: absent addressed resources
/// are 404, violated uniqueness/membership rules are 409, everything else is
/// a server error.
impl From<moot_core::Error> for ApiError {
  fn from(err: moot_core::Error) -> Self {
    use moot_core::Error as E;
    match err {
      E::ParticipantNotFound(_) | E::MeetingNotFound(_) => {
        ApiError::NotFound(err.to_string())
      }
      E::LoginTaken(_)
      | E::AlreadyEnrolled { .. }
      | E::NotEnrolled { .. }
      | E::UnknownParticipant(_) => ApiError::Conflict(err.to_string()),
      other => ApiError::Store(Box::new(other)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Hash(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
