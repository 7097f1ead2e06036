//! Scalar values and type tags shared by filters, models and backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

/// Type tag of a scalar filter or model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Boolean.
    Bool,
    /// Signed integer.
    Int,
    /// Floating point number.
    Float,
    /// Text.
    String,
    /// UTC timestamp.
    DateTime,
    /// UUID.
    Uuid,
}

impl FieldType {
    /// Check whether a value of this type can be compared against a field of `target` type.
    ///
    /// Identical types are assignable, and integers widen to floats.
    pub fn is_assignable_to(self, target: FieldType) -> bool {
        self == target || matches!((self, target), (Self::Int, Self::Float))
    }

    /// Get the type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::DateTime => "datetime",
            Self::Uuid => "uuid",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar value read from a filter or a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// UUID value.
    Uuid(Uuid),
    /// Timestamp value.
    DateTime(DateTime<Utc>),
    /// String value.
    String(String),
}

impl FieldValue {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The type tag of this value, `None` for null.
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(FieldType::Bool),
            Self::Int(_) => Some(FieldType::Int),
            Self::Float(_) => Some(FieldType::Float),
            Self::String(_) => Some(FieldType::String),
            Self::DateTime(_) => Some(FieldType::DateTime),
            Self::Uuid(_) => Some(FieldType::Uuid),
        }
    }

    /// Borrow the string content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Compare two values of compatible types.
    ///
    /// Integers and floats compare numerically; null and mismatched types
    /// are unordered.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
            (Self::Uuid(a), Self::Uuid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Equality that treats numerically equal ints and floats as equal.
    pub fn loosely_equals(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            _ => self.compare(other) == Some(Ordering::Equal),
        }
    }
}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{:?}", v),
            Self::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Self::Uuid(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v)
    }
}

impl From<Uuid> for FieldValue {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

/// A Rust scalar type usable as a filter element or model field.
pub trait Scalar: Clone + Into<FieldValue> + Send + Sync + 'static {
    /// The type tag for this scalar.
    const TYPE: FieldType;

    /// Convert a borrowed scalar into a [`FieldValue`].
    fn to_field_value(&self) -> FieldValue {
        self.clone().into()
    }
}

macro_rules! impl_scalar {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const TYPE: FieldType = FieldType::$tag;
            }
        )*
    };
}

impl_scalar! {
    bool => Bool,
    i32 => Int,
    i64 => Int,
    u32 => Int,
    f64 => Float,
    String => String,
    DateTime<Utc> => DateTime,
    Uuid => Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_from() {
        assert_eq!(FieldValue::from(42i32), FieldValue::Int(42));
        assert_eq!(FieldValue::from("hello"), FieldValue::String("hello".to_string()));
        assert_eq!(FieldValue::from(true), FieldValue::Bool(true));
        assert_eq!(FieldValue::from(None::<i32>), FieldValue::Null);
    }

    #[test]
    fn test_field_type_of_value() {
        assert_eq!(FieldValue::Int(1).field_type(), Some(FieldType::Int));
        assert_eq!(FieldValue::Null.field_type(), None);
        assert_eq!(<String as Scalar>::TYPE, FieldType::String);
        assert_eq!(<u32 as Scalar>::TYPE, FieldType::Int);
    }

    #[test]
    fn test_assignability() {
        assert!(FieldType::Int.is_assignable_to(FieldType::Int));
        assert!(FieldType::Int.is_assignable_to(FieldType::Float));
        assert!(!FieldType::Float.is_assignable_to(FieldType::Int));
        assert!(!FieldType::Int.is_assignable_to(FieldType::DateTime));
    }

    #[test]
    fn test_numeric_comparison() {
        assert_eq!(FieldValue::Int(2).compare(&FieldValue::Float(2.5)), Some(Ordering::Less));
        assert!(FieldValue::Int(3).loosely_equals(&FieldValue::Float(3.0)));
        assert_eq!(FieldValue::Int(1).compare(&FieldValue::String("1".into())), None);
        assert_eq!(FieldValue::Null.compare(&FieldValue::Null), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::String("ab".into()).to_string(), "\"ab\"");
        assert_eq!(FieldValue::Int(5).to_string(), "5");
        assert_eq!(FieldValue::Null.to_string(), "null");
    }
}
