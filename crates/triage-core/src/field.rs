//! Three-state attribute values.
//!
//! A proposed change only carries the attributes the caller touched. Several
//! rules key off "was this attribute included" rather than its value, so an
//! attribute is either absent, present but cleared, or present with a value.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An attribute slot on a record or proposal.
///
/// In JSON a missing key is [`Field::Absent`], an explicit `null` is
/// [`Field::Null`], and anything else is [`Field::Value`]. Containers must
/// mark the slot `#[serde(default, skip_serializing_if = "Field::is_absent")]`
/// for the missing-key case to round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field<T> {
  /// Not part of the record or proposal.
  #[default]
  Absent,
  /// Included, explicitly cleared.
  Null,
  Value(T),
}

impl<T> Field<T> {
  pub fn is_absent(&self) -> bool { matches!(self, Self::Absent) }

  /// `true` for both [`Field::Null`] and [`Field::Value`].
  pub fn is_present(&self) -> bool { !self.is_absent() }

  pub fn value(&self) -> Option<&T> {
    match self {
      Self::Value(v) => Some(v),
      _ => None,
    }
  }

  pub fn into_option(self) -> Option<T> {
    match self {
      Self::Value(v) => Some(v),
      _ => None,
    }
  }

  /// This slot if it is present (even when cleared), otherwise `prior`.
  pub fn or_else_prior<'a>(&'a self, prior: &'a Field<T>) -> &'a Field<T> {
    if self.is_present() { self } else { prior }
  }

  /// This slot's value if it has one, otherwise the value of `prior`.
  pub fn value_or_prior<'a>(&'a self, prior: &'a Field<T>) -> Option<&'a T> {
    self.value().or_else(|| prior.value())
  }
}

impl<T> From<Option<T>> for Field<T> {
  fn from(value: Option<T>) -> Self {
    match value {
      Some(v) => Self::Value(v),
      None => Self::Null,
    }
  }
}

impl<T: Serialize> Serialize for Field<T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Self::Value(v) => serializer.serialize_some(v),
      Self::Absent | Self::Null => serializer.serialize_none(),
    }
  }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    Option::<T>::deserialize(deserializer).map(Field::from)
  }
}

#[cfg(test)]
mod tests {
  use serde::{Deserialize, Serialize};

  use super::Field;

  #[derive(Debug, Serialize, Deserialize)]
  struct Probe {
    #[serde(default, skip_serializing_if = "Field::is_absent")]
    name: Field<String>,
  }

  #[test]
  fn missing_key_is_absent_and_null_is_null() {
    let missing: Probe = serde_json::from_str("{}").unwrap();
    assert_eq!(missing.name, Field::Absent);

    let null: Probe = serde_json::from_str(r#"{"name":null}"#).unwrap();
    assert_eq!(null.name, Field::Null);

    let set: Probe = serde_json::from_str(r#"{"name":"Ana"}"#).unwrap();
    assert_eq!(set.name, Field::Value("Ana".to_string()));
  }

  #[test]
  fn absent_slots_are_not_serialised() {
    let json = serde_json::to_string(&Probe { name: Field::Absent }).unwrap();
    assert_eq!(json, "{}");
    let json = serde_json::to_string(&Probe { name: Field::Null }).unwrap();
    assert_eq!(json, r#"{"name":null}"#);
  }

  #[test]
  fn prior_fallbacks_distinguish_presence_from_value() {
    let prior = Field::Value(7);

    assert_eq!(Field::Absent.or_else_prior(&prior), &Field::Value(7));
    assert_eq!(Field::<i32>::Null.or_else_prior(&prior), &Field::Null);

    assert_eq!(Field::Null.value_or_prior(&prior), Some(&7));
    assert_eq!(Field::Value(3).value_or_prior(&prior), Some(&3));
    assert_eq!(Field::<i32>::Absent.value_or_prior(&Field::Null), None);
  }
}
