//! Immutability of closed occurrences.

use crate::{
  Error, Result,
  error::ProtectedField,
  field::Field,
  occurrence::Occurrence,
};

/// Reject any update against a record whose prior status is `Closed`.
///
/// Each protected attribute present in the proposal is compared against the
/// prior state and the first difference is reported by name. When nothing
/// differs the update is still rejected with the generic message: once
/// closed, the update path is terminal. Records that are not closed pass.
pub fn enforce_closed_immutable(
  proposal: &Occurrence,
  prior: &Occurrence,
) -> Result<()> {
  if !prior.is_closed() {
    return Ok(());
  }

  let text_fields = [
    (ProtectedField::Name, &proposal.name, &prior.name),
    (ProtectedField::Email, &proposal.email, &prior.email),
    (ProtectedField::Description, &proposal.description, &prior.description),
    (ProtectedField::Cpf, &proposal.cpf, &prior.cpf),
    (ProtectedField::ZipCode, &proposal.zip_code, &prior.zip_code),
  ];
  for (field, proposed, previous) in text_fields {
    if proposed.is_present() && !text_matches(proposed, previous) {
      return Err(Error::ClosedRecordImmutable { field: Some(field) });
    }
  }

  if proposal.type_ref.is_present()
    && proposal.type_ref.value().map(|t| t.id) != prior.type_ref.value().map(|t| t.id)
  {
    return Err(Error::ClosedRecordImmutable { field: Some(ProtectedField::Type) });
  }

  if proposal.subject_code.is_present()
    && proposal.subject_code.value() != prior.subject_code.value()
  {
    return Err(Error::ClosedRecordImmutable {
      field: Some(ProtectedField::Subject),
    });
  }

  Err(Error::ClosedRecordImmutable { field: None })
}

/// Case-insensitive comparison where a cleared value equals the empty string.
fn text_matches(proposed: &Field<String>, previous: &Field<String>) -> bool {
  let a = proposed.value().map_or("", String::as_str);
  let b = previous.value().map_or("", String::as_str);
  a == b || a.to_lowercase() == b.to_lowercase()
}
