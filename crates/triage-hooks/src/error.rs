//! Hook error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use triage_core::error::RejectionKind;

/// An error returned by a hook or commit-path handler.
#[derive(Debug, Error)]
pub enum HookError {
  /// The lifecycle rules refused the change; the host must not commit it.
  #[error(transparent)]
  Rejected(triage_core::Error),

  /// The request body could not be read as the expected JSON shape.
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),

  /// The host's own write failed after the rules approved the change.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<triage_core::Error> for HookError {
  fn from(e: triage_core::Error) -> Self {
    match e {
      triage_core::Error::OccurrenceNotFound(id) => {
        Self::NotFound(format!("occurrence {id} not found"))
      }
      other => Self::Rejected(other),
    }
  }
}

impl From<JsonRejection> for HookError {
  fn from(rejection: JsonRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl IntoResponse for HookError {
  fn into_response(self) -> Response {
    let (status, kind) = match &self {
      HookError::Rejected(e) => match e.kind() {
        RejectionKind::LookupFailure => {
          (StatusCode::INTERNAL_SERVER_ERROR, Some(e.kind()))
        }
        kind => (StatusCode::UNPROCESSABLE_ENTITY, Some(kind)),
      },
      HookError::BadRequest(_) => (StatusCode::BAD_REQUEST, None),
      HookError::NotFound(_) => (StatusCode::NOT_FOUND, None),
      HookError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
    };
    let body = match kind {
      Some(kind) => json!({ "error": self.to_string(), "kind": kind }),
      None => json!({ "error": self.to_string() }),
    };
    (status, Json(body)).into_response()
  }
}
