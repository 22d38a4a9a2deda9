//! Encoding and decoding helpers between occurrence attributes and the
//! values stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings, status as the schema's integer code.

use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use triage_core::{
  Field,
  occurrence::{Occurrence, Status, SubjectCode, TypeRef},
  schema::{Column, Schema},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Deadline ─────────────────────────────────────────────────────────────────

/// Windows are written as positive integers only. Rows from a table created
/// without the `CHECK` constraint may still hold zero, negative or oversized
/// values; those read back as unset.
pub fn decode_deadline(hours: Option<i64>) -> Option<NonZeroU32> {
  hours
    .and_then(|h| u32::try_from(h).ok())
    .and_then(NonZeroU32::new)
}

// ─── Cells ────────────────────────────────────────────────────────────────────

fn cell<T>(field: &Field<T>, encode: impl FnOnce(&T) -> Value) -> Option<Value> {
  match field {
    Field::Absent => None,
    Field::Null => Some(Value::Null),
    Field::Value(v) => Some(encode(v)),
  }
}

fn text(s: &str) -> Value { Value::Text(s.to_owned()) }

fn timestamp(dt: &DateTime<Utc>) -> Value { Value::Text(encode_dt(*dt)) }

/// The present attributes of `record` as `(column, value)` pairs, in
/// [`Column::ALL`] order. Absent attributes are skipped.
pub fn encode_cells(schema: &Schema, record: &Occurrence) -> Vec<(Column, Value)> {
  Column::ALL
    .iter()
    .filter_map(|&column| {
      let value = match column {
        Column::Cpf => cell(&record.cpf, |s| text(s)),
        Column::Name => cell(&record.name, |s| text(s)),
        Column::Email => cell(&record.email, |s| text(s)),
        Column::Description => cell(&record.description, |s| text(s)),
        Column::ZipCode => cell(&record.zip_code, |s| text(s)),
        Column::Type => {
          cell(&record.type_ref, |t| Value::Text(encode_uuid(t.id)))
        }
        Column::Subject => {
          cell(&record.subject_code, |s| Value::Integer(i64::from(s.0)))
        }
        Column::Status => {
          cell(&record.status, |s| Value::Integer(schema.status_code(*s)))
        }
        Column::CreatedAt => cell(&record.created_at, timestamp),
        Column::ExpiresAt => cell(&record.expires_at, timestamp),
        Column::ClosedAt => cell(&record.closed_at, timestamp),
      }?;
      Some((column, value))
    })
    .collect()
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an occurrence row for a set of columns.
pub struct RawOccurrence {
  pub id:    String,
  pub cells: Vec<(Column, Value)>,
}

impl RawOccurrence {
  /// Decode into an [`Occurrence`] of the managed entity kind. Columns that
  /// were read but hold `NULL` become [`Field::Null`]; columns that were not
  /// read stay [`Field::Absent`].
  pub fn into_occurrence(self, schema: &Schema) -> Result<Occurrence> {
    let mut record =
      Occurrence::with_id(schema.entity.clone(), decode_uuid(&self.id)?);

    for (column, value) in self.cells {
      let name = schema.column(column);
      match column {
        Column::Cpf => record.cpf = decode_text(name, value)?,
        Column::Name => record.name = decode_text(name, value)?,
        Column::Email => record.email = decode_text(name, value)?,
        Column::Description => record.description = decode_text(name, value)?,
        Column::ZipCode => record.zip_code = decode_text(name, value)?,
        Column::Type => {
          record.type_ref = map_field(decode_text(name, value)?, |s| {
            decode_uuid(&s).map(TypeRef::new)
          })?;
        }
        Column::Subject => {
          record.subject_code = map_field(decode_int(name, value)?, |n| {
            i32::try_from(n).map(SubjectCode).map_err(|e| Error::Decode {
              column: name.to_owned(),
              detail: e.to_string(),
            })
          })?;
        }
        Column::Status => {
          record.status = map_field(decode_int(name, value)?, |code| {
            decode_status(schema, code)
          })?;
        }
        Column::CreatedAt => {
          record.created_at = map_field(decode_text(name, value)?, |s| decode_dt(&s))?;
        }
        Column::ExpiresAt => {
          record.expires_at = map_field(decode_text(name, value)?, |s| decode_dt(&s))?;
        }
        Column::ClosedAt => {
          record.closed_at = map_field(decode_text(name, value)?, |s| decode_dt(&s))?;
        }
      }
    }

    Ok(record)
  }
}

fn decode_status(schema: &Schema, code: i64) -> Result<Status> {
  schema.status_from_code(code).ok_or(Error::UnknownStatus(code))
}

fn map_field<T, U>(
  field: Field<T>,
  f: impl FnOnce(T) -> Result<U>,
) -> Result<Field<U>> {
  Ok(match field {
    Field::Absent => Field::Absent,
    Field::Null => Field::Null,
    Field::Value(v) => Field::Value(f(v)?),
  })
}

fn decode_text(column: &str, value: Value) -> Result<Field<String>> {
  match value {
    Value::Null => Ok(Field::Null),
    Value::Text(s) => Ok(Field::Value(s)),
    other => Err(Error::Decode {
      column: column.to_owned(),
      detail: format!("expected text, found {:?}", other.data_type()),
    }),
  }
}

fn decode_int(column: &str, value: Value) -> Result<Field<i64>> {
  match value {
    Value::Null => Ok(Field::Null),
    Value::Integer(n) => Ok(Field::Value(n)),
    other => Err(Error::Decode {
      column: column.to_owned(),
      detail: format!("expected integer, found {:?}", other.data_type()),
    }),
  }
}
