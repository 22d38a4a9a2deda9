use std::borrow::Cow;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{OccurrenceRules, Outcome};
use crate::{
  Error, Result,
  deadline::{deadline_hours, expiration},
  duplicate::open_duplicate_exists,
  field::Field,
  immutable::enforce_closed_immutable,
  occurrence::{Occurrence, Status},
  schema::Column,
  store::OccurrenceStore,
};

/// Columns read when the host supplies no pre-image.
pub const PRIOR_STATE_COLUMNS: &[Column] = &[
  Column::Status,
  Column::ClosedAt,
  Column::CreatedAt,
  Column::Type,
  Column::Cpf,
  Column::Name,
  Column::Email,
  Column::Description,
  Column::ZipCode,
  Column::Subject,
];

impl<S: OccurrenceStore> OccurrenceRules<'_, S> {
  /// Validate and recalculate a proposed partial update.
  ///
  /// `pre_image` is the record as it was before this change. When the host
  /// cannot supply one it is read from the store by `proposal.id`; with
  /// neither there is nothing to validate against and the call is a no-op.
  /// The same holds when neither the proposal nor the pre-image carries an
  /// id, since the record could not be told apart from its own duplicate.
  ///
  /// Steps, each able to reject:
  /// 1. closed records accept no update at all;
  /// 2. the first transition to `Closed` stamps `closed_at`;
  /// 3. touching the type recomputes `expires_at` from the original
  ///    creation time;
  /// 4. the effective CPF, type and subject must not collide with another
  ///    open occurrence.
  pub async fn on_update(
    &self,
    proposal: &mut Occurrence,
    pre_image: Option<&Occurrence>,
  ) -> Result<Outcome> {
    if !self.schema.manages(&proposal.entity) {
      return Ok(Outcome::NotApplicable);
    }
    let Some(prior) = self.prior_state(proposal, pre_image).await? else {
      debug!("no prior state available, skipping update rules");
      return Ok(Outcome::NotApplicable);
    };
    let Some(record_id) = prior.id.or(proposal.id) else {
      debug!("update names no record id, skipping update rules");
      return Ok(Outcome::NotApplicable);
    };

    enforce_closed_immutable(proposal, &prior)?;

    let now = Utc::now();
    stamp_closed_at(proposal, &prior, now);

    if proposal.type_ref.is_present() {
      let type_ref = proposal.type_ref.value_or_prior(&prior.type_ref);
      let hours = deadline_hours(self.store, self.schema, type_ref).await?;
      let base = prior.created_at.value().copied().unwrap_or(now);
      proposal.expires_at = Field::Value(expiration(base, hours));
      debug!(expires_at = ?proposal.expires_at, "recalculated expiration");
    }

    let cpf = proposal.cpf.or_else_prior(&prior.cpf).value();
    let duplicate = open_duplicate_exists(
      self.store,
      cpf.map(String::as_str),
      proposal.type_ref.value_or_prior(&prior.type_ref),
      proposal.subject_code.value_or_prior(&prior.subject_code),
      Some(record_id),
    )
    .await?;
    if duplicate {
      return Err(Error::DuplicateOpenRecordOnUpdate);
    }

    Ok(Outcome::Applied)
  }

  async fn prior_state<'p>(
    &self,
    proposal: &Occurrence,
    pre_image: Option<&'p Occurrence>,
  ) -> Result<Option<Cow<'p, Occurrence>>> {
    if let Some(pre_image) = pre_image {
      return Ok(Some(Cow::Borrowed(pre_image)));
    }
    let Some(id) = proposal.id else {
      return Ok(None);
    };

    let mut record = self
      .store
      .retrieve(id, Some(PRIOR_STATE_COLUMNS))
      .await
      .map_err(Error::lookup)?
      .ok_or(Error::OccurrenceNotFound(id))?;
    record.id.get_or_insert(id);
    Ok(Some(Cow::Owned(record)))
  }
}

/// Set `closed_at` on the first transition into `Closed`.
fn stamp_closed_at(
  proposal: &mut Occurrence,
  prior: &Occurrence,
  now: DateTime<Utc>,
) {
  let closing = proposal.status.value() == Some(&Status::Closed);
  if closing && prior.closed_at.value().is_none() {
    proposal.closed_at = Field::Value(now);
  }
}
