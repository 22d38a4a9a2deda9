use tracing::debug;

use super::{OccurrenceRules, Outcome};
use crate::{
  Error, Result,
  occurrence::RecordRef,
  schema::Column,
  store::OccurrenceStore,
};

impl<S: OccurrenceStore> OccurrenceRules<'_, S> {
  /// Reject deletion of a closed occurrence. Open and overdue records pass.
  pub async fn on_delete(&self, target: &RecordRef) -> Result<Outcome> {
    if !self.schema.manages(&target.entity) {
      return Ok(Outcome::NotApplicable);
    }

    let record = self
      .store
      .retrieve(target.id, Some(&[Column::Status]))
      .await
      .map_err(Error::lookup)?
      .ok_or(Error::OccurrenceNotFound(target.id))?;

    debug!(id = %target.id, status = ?record.status, "checked delete target");
    if record.is_closed() {
      return Err(Error::ClosedRecordNotDeletable);
    }

    Ok(Outcome::Applied)
  }
}
