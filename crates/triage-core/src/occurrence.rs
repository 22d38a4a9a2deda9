//! Occurrence: the ticket-like record whose lifecycle the rules guard.
//!
//! The same type carries both a proposed change (only touched attributes
//! present) and a stored record or pre-image (every fetched attribute
//! present, possibly cleared).

use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::field::Field;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Lifecycle status of an occurrence.
///
/// Only `Closed` is behaviourally distinguished; `Overdue` is treated like
/// `Open` by every rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
  Open,
  Closed,
  Overdue,
}

impl Status {
  pub fn is_closed(self) -> bool { matches!(self, Self::Closed) }
}

// ─── References ──────────────────────────────────────────────────────────────

/// Reference to an [`OccurrenceType`]. Compared by identifier only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
  pub id: Uuid,
}

impl TypeRef {
  pub fn new(id: Uuid) -> Self { Self { id } }
}

/// Enumerated subject classification code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectCode(pub i32);

/// A reference to a record of some entity kind, as received on delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
  /// Logical name of the entity kind the reference points into.
  pub entity: String,
  pub id:     Uuid,
}

// ─── OccurrenceType ──────────────────────────────────────────────────────────

/// Reference entity configuring the response window for occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceType {
  pub type_id:        Uuid,
  /// Response window in hours; `None` means "use the configured default".
  pub deadline_hours: Option<NonZeroU32>,
}

impl OccurrenceType {
  pub fn type_ref(&self) -> TypeRef { TypeRef::new(self.type_id) }
}

// ─── Occurrence ──────────────────────────────────────────────────────────────

/// A stored occurrence or a proposed change to one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
  /// Logical name of the entity kind; the rules ignore anything that is not
  /// the managed kind.
  #[serde(default)]
  pub entity:       String,
  /// Assigned by the store on creation.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:           Option<Uuid>,
  #[serde(default, skip_serializing_if = "Field::is_absent")]
  pub cpf:          Field<String>,
  #[serde(default, skip_serializing_if = "Field::is_absent")]
  pub name:         Field<String>,
  #[serde(default, skip_serializing_if = "Field::is_absent")]
  pub email:        Field<String>,
  #[serde(default, skip_serializing_if = "Field::is_absent")]
  pub description:  Field<String>,
  #[serde(default, skip_serializing_if = "Field::is_absent")]
  pub zip_code:     Field<String>,
  #[serde(default, skip_serializing_if = "Field::is_absent")]
  pub type_ref:     Field<TypeRef>,
  #[serde(default, skip_serializing_if = "Field::is_absent")]
  pub subject_code: Field<SubjectCode>,
  #[serde(default, skip_serializing_if = "Field::is_absent")]
  pub status:       Field<Status>,
  /// Set once, on creation.
  #[serde(default, skip_serializing_if = "Field::is_absent")]
  pub created_at:   Field<DateTime<Utc>>,
  /// Derived from `created_at` and the type's response window.
  #[serde(default, skip_serializing_if = "Field::is_absent")]
  pub expires_at:   Field<DateTime<Utc>>,
  /// Set once, the first time the status becomes `Closed`.
  #[serde(default, skip_serializing_if = "Field::is_absent")]
  pub closed_at:    Field<DateTime<Utc>>,
}

impl Occurrence {
  /// An empty proposal for the given entity kind.
  pub fn new(entity: impl Into<String>) -> Self {
    Self { entity: entity.into(), ..Self::default() }
  }

  /// An empty proposal targeting an existing record.
  pub fn with_id(entity: impl Into<String>, id: Uuid) -> Self {
    Self { id: Some(id), ..Self::new(entity) }
  }

  /// `true` only when the status attribute holds `Closed`.
  pub fn is_closed(&self) -> bool {
    self.status.value().is_some_and(|s| s.is_closed())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_json_keeps_untouched_attributes_absent() {
    let proposal: Occurrence = serde_json::from_str(
      r#"{"entity":"occurrence","name":"Maria","email":null,"status":"closed"}"#,
    )
    .unwrap();

    assert_eq!(proposal.name, Field::Value("Maria".to_string()));
    assert_eq!(proposal.email, Field::Null);
    assert!(proposal.cpf.is_absent());
    assert!(proposal.type_ref.is_absent());
    assert!(proposal.is_closed());
  }

  #[test]
  fn overdue_is_not_closed() {
    let mut record = Occurrence::new("occurrence");
    record.status = Field::Value(Status::Overdue);
    assert!(!record.is_closed());
    record.status = Field::Null;
    assert!(!record.is_closed());
  }

  #[test]
  fn zero_hour_window_is_refused() {
    let id = Uuid::new_v4();
    let zero = serde_json::from_str::<OccurrenceType>(&format!(
      r#"{{"type_id":"{id}","deadline_hours":0}}"#
    ));
    assert!(zero.is_err());

    let unset: OccurrenceType = serde_json::from_str(&format!(
      r#"{{"type_id":"{id}","deadline_hours":null}}"#
    ))
    .unwrap();
    assert_eq!(unset.deadline_hours, None);
  }
}
