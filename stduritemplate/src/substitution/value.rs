use crate::logging::codes;
use chrono::{DateTime, SecondsFormat, TimeZone};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Errors raised while building a substitution bag
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("Illegal value passed as substitution for '{name}', found {found}")]
    UnsupportedValueType { name: String, found: String },

    #[error("Substitutions must be an object, found {found}")]
    NotAnObject { found: String },
}

impl ValueError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            ValueError::UnsupportedValueType { .. } => codes::substitution::UNSUPPORTED_VALUE_TYPE,
            ValueError::NotAnObject { .. } => codes::substitution::NOT_AN_OBJECT,
        }
    }
}

/// A substitution value.
///
/// Scalars are rendered to `String` when the bag is built, so expansion only ever sees
/// these three shapes. Map keys iterate in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

impl Value {
    /// Lists and maps without elements are empty; strings never are, even `""`
    pub fn is_empty(&self) -> bool {
        match self {
            Value::String(_) => false,
            Value::List(items) => items.is_empty(),
            Value::Map(pairs) => pairs.is_empty(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s),
            Value::List(items) => write!(f, "{:?}", items),
            Value::Map(pairs) => write!(f, "{:?}", pairs),
        }
    }
}

/// RFC 3339 with second precision, `Z` for UTC
pub fn format_timestamp<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// ============================================================================
// NATIVE CONVERSIONS
// ============================================================================

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::String(value.to_string())
    }
}

macro_rules! value_from_display {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::String(value.to_string())
                }
            }
        )+
    };
}

value_from_display!(i32, i64, u32, u64, usize, f32, f64);

impl<Tz> From<DateTime<Tz>> for Value
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    fn from(value: DateTime<Tz>) -> Self {
        Value::String(format_timestamp(&value))
    }
}

impl<T: Into<String>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<String>> From<BTreeMap<K, V>> for Value {
    fn from(pairs: BTreeMap<K, V>) -> Self {
        Value::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> From<HashMap<K, V>> for Value {
    fn from(pairs: HashMap<K, V>) -> Self {
        Value::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Value {
    fn from(pairs: [(K, V); N]) -> Self {
        Value::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
