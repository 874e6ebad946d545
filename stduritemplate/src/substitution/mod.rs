//! Substitution values
//!
//! The bag of named values a template is expanded against. The engine only reads it.

pub mod normalize;
pub mod value;

pub use normalize::{from_json, from_json_with_timestamps, NATIVE_TIMESTAMP_MEMBERS};
pub use value::{format_timestamp, Value, ValueError};

use std::collections::HashMap;

/// Named substitution values. A missing name is an absent variable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    values: HashMap<String, Value>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn from_json(data: &serde_json::Value) -> Result<Self, ValueError> {
        normalize::from_json(data)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Substitutions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut substitutions = Substitutions::new();
        for (name, value) in iter {
            substitutions.insert(name, value);
        }
        substitutions
    }
}
