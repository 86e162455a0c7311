//! Scalar values carried by cursors, filters and page boundaries.

use std::cmp::Ordering;
use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// A store-agnostic scalar value.
///
/// Values of the same kind are totally ordered. Integers and floats compare
/// numerically with each other and `Null` sorts before everything else.
///
/// Serialized untagged, so deserialization picks the first matching variant:
/// text that reads as a UUID or an RFC 3339 timestamp comes back as
/// [`Value::Uuid`] or [`Value::Timestamp`]. The [`Display`] form is the same
/// either way, so cursors built from a deserialized key still resolve
/// through the query's [`KeyKind`].
///
/// [`Display`]: fmt::Display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed 64-bit integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// UUID value.
    Uuid(Uuid),
    /// Timestamp with nanosecond precision.
    Timestamp(Timestamp),
    /// Text value.
    Text(String),
}

impl Value {
    /// Returns whether this value is [`Value::Null`].
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the integer if this is an integer value.
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text if this is a text value.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Compares two values.
    ///
    /// Returns `None` for values of incompatible kinds or for `NaN` floats.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Null, Self::Null) => Some(Ordering::Equal),
            (Self::Null, _) => Some(Ordering::Less),
            (_, Self::Null) => Some(Ordering::Greater),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Uuid(a), Self::Uuid(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Uuid(value) => write!(f, "{value}"),
            Self::Timestamp(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        Self::Timestamp(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// How raw cursor tokens parse into typed primary keys.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr
)]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum KeyKind {
    /// Integer keys (`serial`, `bigserial`, sequence numbers).
    #[default]
    Int,
    /// Free-form text keys.
    Text,
    /// UUID keys.
    Uuid,
    /// RFC 3339 timestamps.
    Timestamp,
}

impl KeyKind {
    /// Parses a raw cursor value into a typed key.
    ///
    /// Returns `None` if the raw value is not a valid key of this kind.
    pub fn parse(self, raw: &str) -> Option<Value> {
        match self {
            Self::Int => raw.parse().ok().map(Value::Int),
            Self::Text => Some(Value::Text(raw.to_owned())),
            Self::Uuid => raw.parse().ok().map(Value::Uuid),
            Self::Timestamp => raw.parse().ok().map(Value::Timestamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_mixed_numbers() {
        assert_eq!(
            Value::Int(2).compare(&Value::Float(2.5)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::Float(3.0).compare(&Value::Int(3)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn compare_null_first() {
        assert_eq!(Value::Null.compare(&Value::Int(0)), Some(Ordering::Less));
        assert_eq!(
            Value::Text("a".into()).compare(&Value::Null),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn compare_incompatible_kinds() {
        assert_eq!(Value::Int(1).compare(&Value::Text("1".into())), None);
        assert_eq!(Value::Float(f64::NAN).compare(&Value::Float(1.0)), None);
    }

    #[test]
    fn key_kind_parse() {
        assert_eq!(KeyKind::Int.parse("42"), Some(Value::Int(42)));
        assert_eq!(KeyKind::Int.parse("forty-two"), None);
        assert_eq!(KeyKind::Text.parse("abc"), Some(Value::Text("abc".into())));

        let id = Uuid::new_v4();
        assert_eq!(KeyKind::Uuid.parse(&id.to_string()), Some(Value::Uuid(id)));
        assert_eq!(KeyKind::Uuid.parse("not-a-uuid"), None);

        let parsed = KeyKind::Timestamp.parse("2024-05-01T12:00:00Z");
        assert!(matches!(parsed, Some(Value::Timestamp(_))));
    }

    #[test]
    fn display_matches_token_form() {
        assert_eq!(Value::Int(7).to_string(), "7");
        assert_eq!(Value::Text("x y".into()).to_string(), "x y");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn untagged_text_keys_keep_their_token() -> serde_json::Result<()> {
        for text in ["67e55044-10b1-426f-9247-bb680e5fe0c8", "2024-05-01T12:00:00Z", "abc"] {
            let key = Value::Text(text.to_owned());
            let json = serde_json::to_string(&key)?;
            let read: Value = serde_json::from_str(&json)?;

            assert_eq!(read.to_string(), text);
            assert_eq!(KeyKind::Text.parse(&read.to_string()), Some(key));
        }

        let read: Value = serde_json::from_str(r#""67e55044-10b1-426f-9247-bb680e5fe0c8""#)?;
        assert!(matches!(read, Value::Uuid(_)));
        Ok(())
    }

    #[test]
    fn key_kind_string_forms() {
        assert_eq!(KeyKind::Uuid.as_ref(), "uuid");
        assert_eq!("timestamp".parse::<KeyKind>().ok(), Some(KeyKind::Timestamp));
    }
}
