//! Field-name indirection and fixed lifecycle constants.
//!
//! Logical attributes are mapped to storage column names through a single
//! [`Schema`] value so that storage-schema changes never reach the rules.

use serde::Deserialize;

use crate::{Error, Result, occurrence::Status};

// ─── Columns ─────────────────────────────────────────────────────────────────

/// Logical attributes of an occurrence that live in storage columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
  Cpf,
  Name,
  Email,
  Description,
  ZipCode,
  Type,
  Subject,
  Status,
  CreatedAt,
  ExpiresAt,
  ClosedAt,
}

impl Column {
  pub const ALL: &'static [Column] = &[
    Column::Cpf,
    Column::Name,
    Column::Email,
    Column::Description,
    Column::ZipCode,
    Column::Type,
    Column::Subject,
    Column::Status,
    Column::CreatedAt,
    Column::ExpiresAt,
    Column::ClosedAt,
  ];
}

// ─── Schema ──────────────────────────────────────────────────────────────────

/// Storage column names for each [`Column`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
  pub cpf:         String,
  pub name:        String,
  pub email:       String,
  pub description: String,
  pub zip_code:    String,
  pub type_ref:    String,
  pub subject:     String,
  pub status:      String,
  pub created_at:  String,
  pub expires_at:  String,
  pub closed_at:   String,
}

impl Default for ColumnNames {
  fn default() -> Self {
    Self {
      cpf:         "cpf".into(),
      name:        "name".into(),
      email:       "email".into(),
      description: "description".into(),
      zip_code:    "zip_code".into(),
      type_ref:    "occurrence_type".into(),
      subject:     "subject".into(),
      status:      "status".into(),
      created_at:  "created_at".into(),
      expires_at:  "expires_at".into(),
      closed_at:   "closed_at".into(),
    }
  }
}

/// Integer codes the store uses for each [`Status`].
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct StatusCodes {
  pub open:    i64,
  pub closed:  i64,
  pub overdue: i64,
}

impl Default for StatusCodes {
  fn default() -> Self {
    Self { open: 751_960_000, closed: 751_960_002, overdue: 751_960_003 }
  }
}

/// Static configuration consumed by the rules and the storage backends.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Schema {
  /// Logical name of the managed entity kind (also its table name).
  pub entity:                 String,
  pub primary_id:             String,
  /// Table holding occurrence types.
  pub type_entity:            String,
  pub type_primary_id:        String,
  /// Column on the type table holding the response window in hours.
  pub deadline:               String,
  pub columns:                ColumnNames,
  pub status_codes:           StatusCodes,
  /// Response window applied when a type has none configured, or no type is
  /// set.
  pub default_deadline_hours: u32,
}

impl Default for Schema {
  fn default() -> Self {
    Self {
      entity:                 "occurrence".into(),
      primary_id:             "occurrence_id".into(),
      type_entity:            "occurrence_type".into(),
      type_primary_id:        "occurrence_type_id".into(),
      deadline:               "response_deadline_hours".into(),
      columns:                ColumnNames::default(),
      status_codes:           StatusCodes::default(),
      default_deadline_hours: 24,
    }
  }
}

impl Schema {
  /// Whether `entity` names the managed entity kind.
  pub fn manages(&self, entity: &str) -> bool { self.entity == entity }

  pub fn column(&self, column: Column) -> &str {
    let c = &self.columns;
    match column {
      Column::Cpf => &c.cpf,
      Column::Name => &c.name,
      Column::Email => &c.email,
      Column::Description => &c.description,
      Column::ZipCode => &c.zip_code,
      Column::Type => &c.type_ref,
      Column::Subject => &c.subject,
      Column::Status => &c.status,
      Column::CreatedAt => &c.created_at,
      Column::ExpiresAt => &c.expires_at,
      Column::ClosedAt => &c.closed_at,
    }
  }

  pub fn status_code(&self, status: Status) -> i64 {
    match status {
      Status::Open => self.status_codes.open,
      Status::Closed => self.status_codes.closed,
      Status::Overdue => self.status_codes.overdue,
    }
  }

  /// Decode a stored status code; `None` for a code this schema does not know.
  pub fn status_from_code(&self, code: i64) -> Option<Status> {
    let s = &self.status_codes;
    if code == s.open {
      Some(Status::Open)
    } else if code == s.closed {
      Some(Status::Closed)
    } else if code == s.overdue {
      Some(Status::Overdue)
    } else {
      None
    }
  }

  /// Reject names that cannot be used verbatim as SQL identifiers, names
  /// that collide within or across tables, and status codes that collide.
  ///
  /// SQL identifiers are compared without regard to ASCII case.
  pub fn validate(&self) -> Result<()> {
    let names = [
      ("entity", self.entity.as_str()),
      ("primary_id", self.primary_id.as_str()),
      ("type_entity", self.type_entity.as_str()),
      ("type_primary_id", self.type_primary_id.as_str()),
      ("deadline", self.deadline.as_str()),
    ]
    .into_iter()
    .chain(Column::ALL.iter().map(|&c| ("column", self.column(c))));

    let mut seen: Vec<&str> = Vec::new();
    for (label, name) in names {
      if !is_identifier(name) {
        return Err(Error::InvalidSchema(format!(
          "{label} name {name:?} is not a plain identifier"
        )));
      }
      if label == "column" || label == "primary_id" {
        if seen.iter().any(|s| s.eq_ignore_ascii_case(name)) {
          return Err(Error::InvalidSchema(format!(
            "column name {name:?} is mapped more than once"
          )));
        }
        seen.push(name);
      }
    }

    if self.entity.eq_ignore_ascii_case(&self.type_entity) {
      return Err(Error::InvalidSchema(format!(
        "entity and type_entity both name table {:?}",
        self.entity
      )));
    }
    if self.type_primary_id.eq_ignore_ascii_case(&self.deadline) {
      return Err(Error::InvalidSchema(format!(
        "type column name {:?} is mapped more than once",
        self.deadline
      )));
    }
    if self.default_deadline_hours == 0 {
      return Err(Error::InvalidSchema(
        "default_deadline_hours must be at least one".into(),
      ));
    }

    let s = &self.status_codes;
    if s.open == s.closed || s.open == s.overdue || s.closed == s.overdue {
      return Err(Error::InvalidSchema("status codes must be distinct".into()));
    }
    Ok(())
  }
}

fn is_identifier(name: &str) -> bool {
  let mut chars = name.chars();
  match chars.next() {
    Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
    _ => return false,
  }
  chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
