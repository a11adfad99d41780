//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure leaves the service as a SCIM error envelope
//! (`urn:ietf:params:scim:api:messages:2.0:Error`).

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use scimlet_core::StoreError;
use thiserror::Error;

use crate::wire::ErrorResponse;

/// An error returned by a SCIM handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("Resource Not Found")]
  NotFound,

  /// The store rejected a write because of a uniqueness or integrity
  /// constraint.
  #[error("{0}")]
  Conflict(String),

  /// A recognised request attribute carried a value of the wrong shape.
  #[error("{0}")]
  InvalidValue(String),

  /// The request body or query string could not be parsed at all.
  #[error("{0}")]
  InvalidSyntax(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend failure: constraint violations are the client's
  /// fault, anything else is ours.
  pub fn from_store<E: StoreError>(e: E) -> Self {
    if e.is_conflict() {
      ApiError::Conflict(e.to_string())
    } else {
      ApiError::Store(Box::new(e))
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::InvalidValue(_) | ApiError::InvalidSyntax(_) => {
        StatusCode::BAD_REQUEST
      }
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  /// The RFC 7644 §3.12 `scimType` keyword, where one applies.
  pub fn scim_type(&self) -> Option<&'static str> {
    match self {
      ApiError::Conflict(_) => Some("uniqueness"),
      ApiError::InvalidValue(_) => Some("invalidValue"),
      ApiError::InvalidSyntax(_) => Some("invalidSyntax"),
      ApiError::NotFound | ApiError::Store(_) => None,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let detail = match &self {
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        "Internal Server Error".to_string()
      }
      other => other.to_string(),
    };
    let body = ErrorResponse::new(status.as_u16(), detail, self.scim_type());
    (status, Json(body)).into_response()
  }
}

// ─── Extractor rejections ────────────────────────────────────────────────────

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::InvalidSyntax(rejection.body_text())
  }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self {
    ApiError::InvalidSyntax(rejection.body_text())
  }
}

/// A non-numeric id can never name a stored user.
impl From<PathRejection> for ApiError {
  fn from(_: PathRejection) -> Self { ApiError::NotFound }
}
