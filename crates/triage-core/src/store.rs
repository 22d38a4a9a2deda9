//! The `OccurrenceStore` trait: the record store port.
//!
//! The lifecycle rules only read through this trait. The write methods exist
//! for the host's own commit path, which runs after a rule has approved (and
//! possibly transformed) a proposal.

use std::{future::Future, num::NonZeroU32};

use uuid::Uuid;

use crate::{
  occurrence::{Occurrence, OccurrenceType, SubjectCode},
  schema::Column,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`OccurrenceStore::exists_open_duplicate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateProbe {
  pub cpf:          String,
  pub type_id:      Uuid,
  pub subject_code: SubjectCode,
  /// Record to leave out of the match, i.e. the one being updated.
  pub exclude_id:   Option<Uuid>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the external store that owns occurrences.
///
/// All methods return `Send` futures so the trait can be used behind an
/// `axum` router on a multi-threaded runtime.
pub trait OccurrenceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Host commit path ──────────────────────────────────────────────────

  /// Persist a new occurrence from its present attributes and return its id.
  /// Uses `record.id` when set, otherwise assigns a fresh one.
  fn create(
    &self,
    record: Occurrence,
  ) -> impl Future<Output = Result<Uuid, Self::Error>> + Send + '_;

  /// Partial update keyed by `record.id`: present attributes are written,
  /// [`Field::Null`](crate::field::Field::Null) clears a column, absent
  /// attributes are left alone. Fails if the record does not exist.
  fn update(
    &self,
    record: Occurrence,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove an occurrence. Fails if the record does not exist.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Seed an occurrence type with an optional response window.
  fn add_type(
    &self,
    deadline_hours: Option<NonZeroU32>,
  ) -> impl Future<Output = Result<OccurrenceType, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Retrieve an occurrence by id. Returns `None` if not found.
  ///
  /// With a projection only the listed columns are populated on the result;
  /// every other attribute is [`Field::Absent`](crate::field::Field::Absent).
  fn retrieve<'a>(
    &'a self,
    id: Uuid,
    projection: Option<&'a [Column]>,
  ) -> impl Future<Output = Result<Option<Occurrence>, Self::Error>> + Send + 'a;

  /// Whether any `Open` occurrence matches the probe's CPF, type and subject,
  /// ignoring `exclude_id`. Stops at the first match.
  fn exists_open_duplicate<'a>(
    &'a self,
    probe: &'a DuplicateProbe,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Retrieve an occurrence type by id. Returns `None` if not found.
  fn get_type(
    &self,
    type_id: Uuid,
  ) -> impl Future<Output = Result<Option<OccurrenceType>, Self::Error>> + Send + '_;
}
