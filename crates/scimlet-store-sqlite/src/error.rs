//! Error type for `scimlet-store-sqlite`.

use scimlet_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  /// A write was rejected by a `UNIQUE`, `PRIMARY KEY`, `NOT NULL` or foreign
  /// key constraint. The transaction it ran in has been rolled back.
  #[error("constraint violation: {0}")]
  Constraint(String),
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    match e {
      tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
        failure,
        message,
      )) if failure.code == rusqlite::ErrorCode::ConstraintViolation => {
        Error::Constraint(message.unwrap_or_else(|| failure.to_string()))
      }
      other => Error::Database(other),
    }
  }
}

impl StoreError for Error {
  fn is_conflict(&self) -> bool { matches!(self, Error::Constraint(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
