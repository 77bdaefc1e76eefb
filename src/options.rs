//! Opaque key/value options passed through to rule handlers.
//!
//! The engine never looks inside; handlers query the keys they understand.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// One option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum OptionValue {
    Bool(bool),
    Int64(i64),
    Float64(f64),
    String(String),
    Bytes(Vec<u8>),
    Int64List(Vec<i64>),
    Float64List(Vec<f64>),
    StringList(Vec<String>),
}

impl OptionValue {
    fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Bool(_) => "bool",
            OptionValue::Int64(_) => "int64",
            OptionValue::Float64(_) => "float64",
            OptionValue::String(_) => "string",
            OptionValue::Bytes(_) => "bytes",
            OptionValue::Int64List(_) => "int64 list",
            OptionValue::Float64List(_) => "float64 list",
            OptionValue::StringList(_) => "string list",
        }
    }
}

/// An option held a value of the wrong type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("option {key:?} has type {actual}, expected {expected}")]
pub struct OptionTypeError {
    pub key: String,
    pub expected: &'static str,
    pub actual: &'static str,
}

/// Options for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options {
    values: BTreeMap<String, OptionValue>,
}

macro_rules! typed_getter {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $ty:ty, $expected:literal) => {
        $(#[$doc])*
        pub fn $name(&self, key: &str) -> Result<$ty, OptionTypeError> {
            match self.values.get(key) {
                None => Ok(<$ty>::default()),
                Some(OptionValue::$variant(v)) => Ok(v.clone()),
                Some(other) => Err(OptionTypeError {
                    key: key.to_string(),
                    expected: $expected,
                    actual: other.type_name(),
                }),
            }
        }
    };
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: OptionValue) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: OptionValue) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    typed_getter!(
        /// `false` when unset.
        get_bool, Bool, bool, "bool"
    );
    typed_getter!(get_int64, Int64, i64, "int64");
    typed_getter!(get_float64, Float64, f64, "float64");
    typed_getter!(get_string, String, String, "string");
    typed_getter!(get_bytes, Bytes, Vec<u8>, "bytes");
    typed_getter!(get_int64_list, Int64List, Vec<i64>, "int64 list");
    typed_getter!(get_float64_list, Float64List, Vec<f64>, "float64 list");
    typed_getter!(get_string_list, StringList, Vec<String>, "string list");
}
