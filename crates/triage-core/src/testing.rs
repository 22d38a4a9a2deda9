//! In-memory [`OccurrenceStore`] used by the unit tests.

use std::{
  collections::HashMap,
  num::NonZeroU32,
  sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
  },
};

use thiserror::Error;
use uuid::Uuid;

use crate::{
  field::Field,
  occurrence::{Occurrence, OccurrenceType, Status, SubjectCode, TypeRef},
  schema::Column,
  store::{DuplicateProbe, OccurrenceStore},
};

#[derive(Debug, Error)]
pub enum MemoryError {
  #[error("occurrence not found: {0}")]
  NotFound(Uuid),
  #[error("store offline")]
  Offline,
}

#[derive(Default)]
pub struct MemoryStore {
  occurrences:      Mutex<HashMap<Uuid, Occurrence>>,
  types:            Mutex<HashMap<Uuid, OccurrenceType>>,
  duplicate_probes: AtomicUsize,
  offline:          AtomicBool,
}

impl MemoryStore {
  pub fn seed_type(&self, deadline_hours: Option<u32>) -> TypeRef {
    let deadline_hours =
      deadline_hours.map(|h| NonZeroU32::new(h).expect("positive window"));
    self.insert_type(deadline_hours).type_ref()
  }

  fn insert_type(&self, deadline_hours: Option<NonZeroU32>) -> OccurrenceType {
    let t = OccurrenceType { type_id: Uuid::new_v4(), deadline_hours };
    self.types.lock().unwrap().insert(t.type_id, t.clone());
    t
  }

  /// Store a full record and return its id.
  pub fn insert(&self, mut record: Occurrence) -> Uuid {
    let id = *record.id.get_or_insert_with(Uuid::new_v4);
    record.entity = "occurrence".into();
    self.occurrences.lock().unwrap().insert(id, record);
    id
  }

  pub fn seed_occurrence(
    &self,
    cpf: &str,
    type_ref: TypeRef,
    subject_code: SubjectCode,
    status: Status,
  ) -> Uuid {
    let mut record = Occurrence::new("occurrence");
    record.cpf = Field::Value(cpf.to_owned());
    record.type_ref = Field::Value(type_ref);
    record.subject_code = Field::Value(subject_code);
    record.status = Field::Value(status);
    self.insert(record)
  }

  pub fn set_status(&self, id: Uuid, status: Status) {
    if let Some(r) = self.occurrences.lock().unwrap().get_mut(&id) {
      r.status = Field::Value(status);
    }
  }

  pub fn duplicate_probes(&self) -> usize {
    self.duplicate_probes.load(Ordering::SeqCst)
  }

  /// Make every read fail from now on.
  pub fn go_offline(&self) { self.offline.store(true, Ordering::SeqCst); }

  fn check_online(&self) -> Result<(), MemoryError> {
    if self.offline.load(Ordering::SeqCst) {
      Err(MemoryError::Offline)
    } else {
      Ok(())
    }
  }
}

fn project(record: &Occurrence, projection: &[Column]) -> Occurrence {
  let keep = |c: Column| projection.contains(&c);
  let mut out = Occurrence::with_id(record.entity.clone(), record.id.unwrap_or_default());
  if keep(Column::Cpf) { out.cpf = record.cpf.clone(); }
  if keep(Column::Name) { out.name = record.name.clone(); }
  if keep(Column::Email) { out.email = record.email.clone(); }
  if keep(Column::Description) { out.description = record.description.clone(); }
  if keep(Column::ZipCode) { out.zip_code = record.zip_code.clone(); }
  if keep(Column::Type) { out.type_ref = record.type_ref; }
  if keep(Column::Subject) { out.subject_code = record.subject_code; }
  if keep(Column::Status) { out.status = record.status; }
  if keep(Column::CreatedAt) { out.created_at = record.created_at; }
  if keep(Column::ExpiresAt) { out.expires_at = record.expires_at; }
  if keep(Column::ClosedAt) { out.closed_at = record.closed_at; }
  out
}

impl OccurrenceStore for MemoryStore {
  type Error = MemoryError;

  async fn create(&self, record: Occurrence) -> Result<Uuid, MemoryError> {
    self.check_online()?;
    Ok(self.insert(record))
  }

  async fn update(&self, record: Occurrence) -> Result<(), MemoryError> {
    self.check_online()?;
    let id = record.id.unwrap_or_default();
    let mut map = self.occurrences.lock().unwrap();
    let stored = map.get_mut(&id).ok_or(MemoryError::NotFound(id))?;
    macro_rules! merge {
      ($($f:ident),*) => {
        $(if record.$f.is_present() { stored.$f = record.$f.clone(); })*
      };
    }
    merge!(
      cpf, name, email, description, zip_code, type_ref, subject_code, status,
      created_at, expires_at, closed_at
    );
    Ok(())
  }

  async fn delete(&self, id: Uuid) -> Result<(), MemoryError> {
    self.check_online()?;
    self
      .occurrences
      .lock()
      .unwrap()
      .remove(&id)
      .map(|_| ())
      .ok_or(MemoryError::NotFound(id))
  }

  async fn add_type(
    &self,
    deadline_hours: Option<NonZeroU32>,
  ) -> Result<OccurrenceType, MemoryError> {
    self.check_online()?;
    Ok(self.insert_type(deadline_hours))
  }

  async fn retrieve<'a>(
    &'a self,
    id: Uuid,
    projection: Option<&'a [Column]>,
  ) -> Result<Option<Occurrence>, MemoryError> {
    self.check_online()?;
    let map = self.occurrences.lock().unwrap();
    Ok(map.get(&id).map(|r| project(r, projection.unwrap_or(Column::ALL))))
  }

  async fn exists_open_duplicate<'a>(
    &'a self,
    probe: &'a DuplicateProbe,
  ) -> Result<bool, MemoryError> {
    self.check_online()?;
    self.duplicate_probes.fetch_add(1, Ordering::SeqCst);
    let map = self.occurrences.lock().unwrap();
    Ok(map.values().any(|r| {
      r.id != probe.exclude_id
        && r.status.value() == Some(&Status::Open)
        && r.cpf.value().map(String::as_str) == Some(probe.cpf.as_str())
        && r.type_ref.value().map(|t| t.id) == Some(probe.type_id)
        && r.subject_code.value() == Some(&probe.subject_code)
    }))
  }

  async fn get_type(
    &self,
    type_id: Uuid,
  ) -> Result<Option<OccurrenceType>, MemoryError> {
    self.check_online()?;
    Ok(self.types.lock().unwrap().get(&type_id).cloned())
  }
}
