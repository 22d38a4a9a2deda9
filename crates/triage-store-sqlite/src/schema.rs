//! SQL schema for the occurrence SQLite store.
//!
//! Table and column names are interpolated from a validated
//! [`Schema`], so a renamed storage column only touches configuration.

use triage_core::schema::{Column, Schema};

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub fn ddl(schema: &Schema) -> String {
  let col = |c: Column| schema.column(c);
  format!(
    "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS {types} (
    {type_pk}   TEXT PRIMARY KEY,
    {deadline}  INTEGER CHECK ({deadline} > 0)  -- hours; NULL means use the default
);

CREATE TABLE IF NOT EXISTS {entity} (
    {pk}          TEXT PRIMARY KEY,
    {cpf}         TEXT,
    {name}        TEXT,
    {email}       TEXT,
    {description} TEXT,
    {zip}         TEXT,
    {type_ref}    TEXT REFERENCES {types}({type_pk}),
    {subject}     INTEGER,
    {status}      INTEGER DEFAULT {open},
    {created_at}  TEXT,              -- RFC 3339 UTC
    {expires_at}  TEXT,
    {closed_at}   TEXT
);

-- Serves the open-duplicate probe.
CREATE INDEX IF NOT EXISTS {entity}_duplicate_idx
    ON {entity}({cpf}, {type_ref}, {subject}, {status});

PRAGMA user_version = 1;
",
    types = schema.type_entity,
    type_pk = schema.type_primary_id,
    deadline = schema.deadline,
    entity = schema.entity,
    pk = schema.primary_id,
    cpf = col(Column::Cpf),
    name = col(Column::Name),
    email = col(Column::Email),
    description = col(Column::Description),
    zip = col(Column::ZipCode),
    type_ref = col(Column::Type),
    subject = col(Column::Subject),
    status = col(Column::Status),
    open = schema.status_codes.open,
    created_at = col(Column::CreatedAt),
    expires_at = col(Column::ExpiresAt),
    closed_at = col(Column::ClosedAt),
  )
}
