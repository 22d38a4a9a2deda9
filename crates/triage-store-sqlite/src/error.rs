//! Error type for `triage-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] triage_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unexpected value in column {column}: {detail}")]
  Decode { column: String, detail: String },

  #[error("unknown status code: {0}")]
  UnknownStatus(i64),

  /// Attempted to update or delete an occurrence that does not exist.
  #[error("occurrence not found: {0}")]
  NotFound(uuid::Uuid),

  #[error("update has no id")]
  MissingId,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
