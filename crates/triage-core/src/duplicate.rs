//! Detection of a second open occurrence for the same CPF, type and subject.

use tracing::debug;
use uuid::Uuid;

use crate::{
  Error, Result,
  occurrence::{SubjectCode, TypeRef},
  store::{DuplicateProbe, OccurrenceStore},
};

/// Whether another `Open` occurrence shares the triple, optionally ignoring
/// `exclude_id`.
///
/// Returns `false` without a store round trip when the CPF is blank or the
/// type or subject is missing. The check is not atomic with the eventual
/// commit; closing that race is left to the store.
pub async fn open_duplicate_exists<S: OccurrenceStore>(
  store: &S,
  cpf: Option<&str>,
  type_ref: Option<&TypeRef>,
  subject_code: Option<&SubjectCode>,
  exclude_id: Option<Uuid>,
) -> Result<bool> {
  let (Some(cpf), Some(type_ref), Some(subject_code)) =
    (cpf, type_ref, subject_code)
  else {
    return Ok(false);
  };
  if cpf.trim().is_empty() {
    return Ok(false);
  }

  let probe = DuplicateProbe {
    cpf: cpf.to_owned(),
    type_id: type_ref.id,
    subject_code: *subject_code,
    exclude_id,
  };
  let found = store
    .exists_open_duplicate(&probe)
    .await
    .map_err(Error::lookup)?;

  debug!(?probe, found, "duplicate probe");
  Ok(found)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{occurrence::Status, testing::MemoryStore};

  #[tokio::test]
  async fn blank_cpf_or_missing_key_skips_the_store() {
    let store = MemoryStore::default();
    let t = store.seed_type(None);
    let s = SubjectCode(10);

    for cpf in [None, Some(""), Some("   ")] {
      assert!(
        !open_duplicate_exists(&store, cpf, Some(&t), Some(&s), None)
          .await
          .unwrap()
      );
    }
    assert!(
      !open_duplicate_exists(&store, Some("123"), None, Some(&s), None)
        .await
        .unwrap()
    );
    assert!(
      !open_duplicate_exists(&store, Some("123"), Some(&t), None, None)
        .await
        .unwrap()
    );
    assert_eq!(store.duplicate_probes(), 0);
  }

  #[tokio::test]
  async fn only_open_records_count() {
    let store = MemoryStore::default();
    let t = store.seed_type(None);
    let s = SubjectCode(10);

    let id = store.seed_occurrence("123", t, s, Status::Closed);
    assert!(
      !open_duplicate_exists(&store, Some("123"), Some(&t), Some(&s), None)
        .await
        .unwrap()
    );

    store.set_status(id, Status::Overdue);
    assert!(
      !open_duplicate_exists(&store, Some("123"), Some(&t), Some(&s), None)
        .await
        .unwrap()
    );

    store.set_status(id, Status::Open);
    assert!(
      open_duplicate_exists(&store, Some("123"), Some(&t), Some(&s), None)
        .await
        .unwrap()
    );
  }

  #[tokio::test]
  async fn excluded_record_does_not_match_itself() {
    let store = MemoryStore::default();
    let t = store.seed_type(None);
    let s = SubjectCode(10);
    let id = store.seed_occurrence("123", t, s, Status::Open);

    assert!(
      !open_duplicate_exists(&store, Some("123"), Some(&t), Some(&s), Some(id))
        .await
        .unwrap()
    );
    assert!(
      !open_duplicate_exists(&store, Some("123"), Some(&t), Some(&SubjectCode(11)), None)
        .await
        .unwrap()
    );
  }
}
