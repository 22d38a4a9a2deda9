//! Lifecycle operations: the entry points the invocation harness calls
//! around each mutation.
//!
//! Each operation runs its steps in order and stops at the first rejection.
//! None of them write to the store: on success they may have mutated the
//! in-flight proposal, and the host commits it through its own path.

mod create;
mod delete;
mod update;

use serde::Serialize;

use crate::{schema::Schema, store::OccurrenceStore};

/// Result of a lifecycle operation that did not reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
  /// The rules ran; the proposal may have been transformed.
  Applied,
  /// The target was not a managed occurrence, or there was nothing to
  /// validate against. Nothing was touched.
  NotApplicable,
}

impl Outcome {
  pub fn is_applied(self) -> bool { matches!(self, Self::Applied) }
}

/// The lifecycle rules bound to a store and a schema for one request.
pub struct OccurrenceRules<'a, S> {
  store:  &'a S,
  schema: &'a Schema,
}

impl<'a, S: OccurrenceStore> OccurrenceRules<'a, S> {
  pub fn new(store: &'a S, schema: &'a Schema) -> Self { Self { store, schema } }

  pub fn schema(&self) -> &Schema { self.schema }
}
