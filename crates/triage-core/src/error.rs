//! Error types for `triage-core`.
//!
//! Every variant is a rejection: the caller must not commit the proposed
//! change.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Attributes that become immutable once an occurrence is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectedField {
  Name,
  Email,
  Description,
  Cpf,
  ZipCode,
  Type,
  Subject,
}

impl ProtectedField {
  /// Human-readable label used in rejection messages.
  pub fn label(self) -> &'static str {
    match self {
      Self::Name => "Name",
      Self::Email => "Email",
      Self::Description => "Description",
      Self::Cpf => "CPF",
      Self::ZipCode => "ZIP code",
      Self::Type => "Type",
      Self::Subject => "Subject",
    }
  }
}

impl fmt::Display for ProtectedField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// Coarse classification of a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
  DuplicateOpenRecord,
  ClosedRecordImmutable,
  ClosedRecordNotDeletable,
  LookupFailure,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("an open occurrence already exists for this CPF, type and subject")]
  DuplicateOpenRecord,

  #[error(
    "another open occurrence already exists for this CPF, type and subject"
  )]
  DuplicateOpenRecordOnUpdate,

  #[error("{}", closed_message(.field))]
  ClosedRecordImmutable { field: Option<ProtectedField> },

  #[error("closed occurrence cannot be deleted")]
  ClosedRecordNotDeletable,

  #[error("occurrence not found: {0}")]
  OccurrenceNotFound(Uuid),

  #[error("occurrence type not found: {0}")]
  TypeNotFound(Uuid),

  #[error("unknown status code: {0}")]
  UnknownStatus(i64),

  #[error("store lookup failed: {0}")]
  LookupFailure(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("invalid schema: {0}")]
  InvalidSchema(String),
}

fn closed_message(field: &Option<ProtectedField>) -> String {
  match field {
    Some(f) => format!("closed occurrence cannot have its {f} changed"),
    None => "closed occurrence cannot be edited".to_string(),
  }
}

impl Error {
  /// Box a store error into [`Error::LookupFailure`].
  pub fn lookup<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::LookupFailure(Box::new(e))
  }

  pub fn kind(&self) -> RejectionKind {
    match self {
      Self::DuplicateOpenRecord | Self::DuplicateOpenRecordOnUpdate => {
        RejectionKind::DuplicateOpenRecord
      }
      Self::ClosedRecordImmutable { .. } => RejectionKind::ClosedRecordImmutable,
      Self::ClosedRecordNotDeletable => RejectionKind::ClosedRecordNotDeletable,
      Self::OccurrenceNotFound(_)
      | Self::TypeNotFound(_)
      | Self::UnknownStatus(_)
      | Self::LookupFailure(_)
      | Self::InvalidSchema(_) => RejectionKind::LookupFailure,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn closed_messages_name_the_field() {
    let e = Error::ClosedRecordImmutable { field: Some(ProtectedField::Name) };
    assert_eq!(e.to_string(), "closed occurrence cannot have its Name changed");

    let e = Error::ClosedRecordImmutable { field: None };
    assert_eq!(e.to_string(), "closed occurrence cannot be edited");
  }

  #[test]
  fn duplicate_messages_differ_by_path() {
    assert_ne!(
      Error::DuplicateOpenRecord.to_string(),
      Error::DuplicateOpenRecordOnUpdate.to_string()
    );
    assert_eq!(
      Error::DuplicateOpenRecordOnUpdate.kind(),
      RejectionKind::DuplicateOpenRecord
    );
  }
}
