//! Response deadlines and the expiration timestamps derived from them.

use std::num::NonZeroU32;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::{
  Error, Result,
  occurrence::TypeRef,
  schema::Schema,
  store::OccurrenceStore,
};

/// Look up the configured response window for `type_ref`.
///
/// No type yields `None`, as does a type without a configured window. A type
/// reference the store does not know is a lookup failure.
pub async fn resolve_deadline<S: OccurrenceStore>(
  store: &S,
  type_ref: Option<&TypeRef>,
) -> Result<Option<NonZeroU32>> {
  let Some(type_ref) = type_ref else {
    return Ok(None);
  };

  let occurrence_type = store
    .get_type(type_ref.id)
    .await
    .map_err(Error::lookup)?
    .ok_or(Error::TypeNotFound(type_ref.id))?;

  Ok(occurrence_type.deadline_hours)
}

/// [`resolve_deadline`] with the schema's default applied.
pub async fn deadline_hours<S: OccurrenceStore>(
  store: &S,
  schema: &Schema,
  type_ref: Option<&TypeRef>,
) -> Result<u32> {
  let configured = resolve_deadline(store, type_ref).await?;
  let hours = configured.map_or(schema.default_deadline_hours, NonZeroU32::get);
  debug!(?type_ref, ?configured, hours, "resolved response deadline");
  Ok(hours)
}

/// The instant `hours` after `base`.
pub fn expiration(base: DateTime<Utc>, hours: u32) -> DateTime<Utc> {
  base + Duration::hours(i64::from(hours))
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use uuid::Uuid;

  use super::*;
  use crate::testing::MemoryStore;

  #[test]
  fn expiration_adds_whole_hours() {
    let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 22, 0, 0).unwrap();
    assert_eq!(
      expiration(t0, 5),
      Utc.with_ymd_and_hms(2024, 3, 2, 3, 0, 0).unwrap()
    );
    assert_eq!(expiration(t0, 0), t0);
  }

  #[tokio::test]
  async fn configured_deadline_is_returned() {
    let store = MemoryStore::default();
    let t = store.seed_type(Some(72));
    let hours = deadline_hours(&store, &Schema::default(), Some(&t))
      .await
      .unwrap();
    assert_eq!(hours, 72);
  }

  #[tokio::test]
  async fn missing_type_or_window_uses_default() {
    let store = MemoryStore::default();
    let schema = Schema::default();

    assert_eq!(resolve_deadline(&store, None).await.unwrap(), None);
    assert_eq!(deadline_hours(&store, &schema, None).await.unwrap(), 24);

    let unset = store.seed_type(None);
    assert_eq!(resolve_deadline(&store, Some(&unset)).await.unwrap(), None);
    assert_eq!(
      deadline_hours(&store, &schema, Some(&unset)).await.unwrap(),
      24
    );
  }

  #[tokio::test]
  async fn unknown_type_is_a_lookup_failure() {
    let store = MemoryStore::default();
    let ghost = TypeRef::new(Uuid::new_v4());
    let err = resolve_deadline(&store, Some(&ghost)).await.unwrap_err();
    assert!(matches!(err, Error::TypeNotFound(id) if id == ghost.id));
  }
}
