//! [`SqliteStore`]: the SQLite implementation of [`OccurrenceStore`].

use std::{num::NonZeroU32, path::Path, sync::Arc};

use rusqlite::{OptionalExtension as _, types::Value};
use tracing::debug;
use uuid::Uuid;

use triage_core::{
  occurrence::{Occurrence, OccurrenceType},
  schema::{Column, Schema},
  store::{DuplicateProbe, OccurrenceStore},
};

use crate::{
  Error, Result,
  encode::{RawOccurrence, decode_deadline, decode_uuid, encode_cells, encode_uuid},
  schema::ddl,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An occurrence store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection and schema are reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:   tokio_rusqlite::Connection,
  schema: Arc<Schema>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>, schema: Schema) -> Result<Self> {
    schema.validate()?;
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, schema: Arc::new(schema) };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory(schema: Schema) -> Result<Self> {
    schema.validate()?;
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, schema: Arc::new(schema) };
    store.init_schema().await?;
    Ok(store)
  }

  pub fn schema(&self) -> &Schema { &self.schema }

  async fn init_schema(&self) -> Result<()> {
    let sql = ddl(&self.schema);
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(&sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a statement and return the number of affected rows.
  pub(crate) async fn execute(&self, sql: String, values: Vec<Value>) -> Result<usize> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(&sql, rusqlite::params_from_iter(values))?)
      })
      .await?;
    Ok(changed)
  }
}

// ─── OccurrenceStore impl ────────────────────────────────────────────────────

impl OccurrenceStore for SqliteStore {
  type Error = Error;

  // ── Host commit path ──────────────────────────────────────────────────────

  async fn create(&self, record: Occurrence) -> Result<Uuid> {
    let id = record.id.unwrap_or_else(Uuid::new_v4);
    let cells = encode_cells(&self.schema, &record);

    let mut columns = vec![self.schema.primary_id.as_str()];
    columns.extend(cells.iter().map(|(c, _)| self.schema.column(*c)));
    let placeholders = (1..=columns.len())
      .map(|i| format!("?{i}"))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!(
      "INSERT INTO {} ({}) VALUES ({placeholders})",
      self.schema.entity,
      columns.join(", "),
    );

    let mut values = vec![Value::Text(encode_uuid(id))];
    values.extend(cells.into_iter().map(|(_, v)| v));

    self.execute(sql, values).await?;
    debug!(%id, "created occurrence");
    Ok(id)
  }

  async fn update(&self, record: Occurrence) -> Result<()> {
    let id = record.id.ok_or(Error::MissingId)?;
    let cells = encode_cells(&self.schema, &record);

    if cells.is_empty() {
      // Nothing to write; still report a missing target.
      return match self.retrieve(id, Some(&[])).await? {
        Some(_) => Ok(()),
        None => Err(Error::NotFound(id)),
      };
    }

    let assignments = cells
      .iter()
      .enumerate()
      .map(|(i, (c, _))| format!("{} = ?{}", self.schema.column(*c), i + 1))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!(
      "UPDATE {} SET {assignments} WHERE {} = ?{}",
      self.schema.entity,
      self.schema.primary_id,
      cells.len() + 1,
    );

    let mut values: Vec<Value> = cells.into_iter().map(|(_, v)| v).collect();
    values.push(Value::Text(encode_uuid(id)));

    if self.execute(sql, values).await? == 0 {
      return Err(Error::NotFound(id));
    }
    debug!(%id, "updated occurrence");
    Ok(())
  }

  async fn delete(&self, id: Uuid) -> Result<()> {
    let sql = format!(
      "DELETE FROM {} WHERE {} = ?1",
      self.schema.entity, self.schema.primary_id
    );
    if self.execute(sql, vec![Value::Text(encode_uuid(id))]).await? == 0 {
      return Err(Error::NotFound(id));
    }
    debug!(%id, "deleted occurrence");
    Ok(())
  }

  async fn add_type(&self, deadline_hours: Option<NonZeroU32>) -> Result<OccurrenceType> {
    let occurrence_type = OccurrenceType { type_id: Uuid::new_v4(), deadline_hours };
    let sql = format!(
      "INSERT INTO {} ({}, {}) VALUES (?1, ?2)",
      self.schema.type_entity, self.schema.type_primary_id, self.schema.deadline
    );
    let deadline =
      deadline_hours.map_or(Value::Null, |h| Value::Integer(i64::from(h.get())));

    self
      .execute(sql, vec![Value::Text(encode_uuid(occurrence_type.type_id)), deadline])
      .await?;
    Ok(occurrence_type)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn retrieve<'a>(
    &'a self,
    id: Uuid,
    projection: Option<&'a [Column]>,
  ) -> Result<Option<Occurrence>> {
    let columns: Vec<Column> = projection.unwrap_or(Column::ALL).to_vec();
    let select = std::iter::once(self.schema.primary_id.as_str())
      .chain(columns.iter().map(|c| self.schema.column(*c)))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!(
      "SELECT {select} FROM {} WHERE {} = ?1",
      self.schema.entity, self.schema.primary_id
    );
    let id_str = encode_uuid(id);

    let raw: Option<RawOccurrence> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(&sql, rusqlite::params![id_str], |row| {
            let mut cells = Vec::with_capacity(columns.len());
            for (i, column) in columns.iter().enumerate() {
              cells.push((*column, row.get::<_, Value>(i + 1)?));
            }
            Ok(RawOccurrence { id: row.get(0)?, cells })
          })
          .optional()?)
      })
      .await?;

    raw.map(|r| r.into_occurrence(&self.schema)).transpose()
  }

  async fn exists_open_duplicate<'a>(
    &'a self,
    probe: &'a DuplicateProbe,
  ) -> Result<bool> {
    let s = &self.schema;
    let sql = format!(
      "SELECT 1 FROM {entity}
       WHERE {cpf} = ?1
         AND {type_ref} = ?2
         AND {subject} = ?3
         AND {status} = ?4
         AND (?5 IS NULL OR {pk} != ?5)
       LIMIT 1",
      entity = s.entity,
      cpf = s.column(Column::Cpf),
      type_ref = s.column(Column::Type),
      subject = s.column(Column::Subject),
      status = s.column(Column::Status),
      pk = s.primary_id,
    );
    let cpf = probe.cpf.clone();
    let type_id = encode_uuid(probe.type_id);
    let subject = i64::from(probe.subject_code.0);
    let open = s.status_codes.open;
    let exclude = probe.exclude_id.map(encode_uuid);

    let found = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &sql,
            rusqlite::params![cpf, type_id, subject, open, exclude],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false))
      })
      .await?;
    Ok(found)
  }

  async fn get_type(&self, type_id: Uuid) -> Result<Option<OccurrenceType>> {
    let sql = format!(
      "SELECT {}, {} FROM {} WHERE {} = ?1",
      self.schema.type_primary_id,
      self.schema.deadline,
      self.schema.type_entity,
      self.schema.type_primary_id,
    );
    let id_str = encode_uuid(type_id);

    let raw: Option<(String, Option<i64>)> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(&sql, rusqlite::params![id_str], |row| {
            Ok((row.get(0)?, row.get(1)?))
          })
          .optional()?)
      })
      .await?;

    raw
      .map(|(id, hours)| {
        Ok(OccurrenceType {
          type_id:        decode_uuid(&id)?,
          deadline_hours: decode_deadline(hours),
        })
      })
      .transpose()
  }
}
