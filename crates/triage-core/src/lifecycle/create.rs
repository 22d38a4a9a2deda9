use chrono::Utc;
use tracing::debug;

use super::{OccurrenceRules, Outcome};
use crate::{
  Error, Result,
  deadline::{deadline_hours, expiration},
  duplicate::open_duplicate_exists,
  field::Field,
  occurrence::Occurrence,
  store::OccurrenceStore,
};

impl<S: OccurrenceStore> OccurrenceRules<'_, S> {
  /// Validate and default a proposed new occurrence.
  ///
  /// Sets `created_at` unless the caller already did, always overwrites
  /// `expires_at` from the current instant and the type's response window,
  /// then rejects the proposal if an open occurrence already holds the same
  /// CPF, type and subject.
  pub async fn on_create(&self, proposal: &mut Occurrence) -> Result<Outcome> {
    if !self.schema.manages(&proposal.entity) {
      return Ok(Outcome::NotApplicable);
    }

    let now = Utc::now();
    if proposal.created_at.is_absent() {
      proposal.created_at = Field::Value(now);
    }

    let hours =
      deadline_hours(self.store, self.schema, proposal.type_ref.value()).await?;
    proposal.expires_at = Field::Value(expiration(now, hours));
    debug!(expires_at = ?proposal.expires_at, "applied creation defaults");

    let duplicate = open_duplicate_exists(
      self.store,
      proposal.cpf.value().map(String::as_str),
      proposal.type_ref.value(),
      proposal.subject_code.value(),
      None,
    )
    .await?;
    if duplicate {
      return Err(Error::DuplicateOpenRecord);
    }

    Ok(Outcome::Applied)
  }
}
