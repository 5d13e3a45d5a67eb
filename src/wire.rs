//! Structural wire values shared by every command and response.
//!
//! A [`Value`] is the only thing that crosses the bridge between a learner
//! program and an engine. Each domain type implements [`WireMessage`]: encoding
//! is total, decoding returns `None` for anything structurally wrong. Callers
//! treat `None` as "ignore the message".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A self-describing wire value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(String),
    Array(Vec<Value>),
    Dictionary(BTreeMap<String, Value>),
}

impl Value {
    /// Builds a dictionary from `(key, value)` pairs.
    pub fn dictionary<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Dictionary(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Builds a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Looks up `key` if this value is a dictionary.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Dictionary(map) => map.get(key),
            _ => None,
        }
    }

    /// Reads an integer. Reals are rejected, not truncated.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Reads a real number. Integers are accepted, since peers may send whole
    /// numbers without a fractional part.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(r) => Some(*r),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Borrows the text of a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrows the elements of an array value.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the `Command` tag of a dictionary message.
    pub fn command_tag(&self) -> Option<&str> {
        self.get("Command").and_then(Value::as_str)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

/// A type with a lossless wire encoding.
pub trait WireMessage: Sized {
    /// Encodes `self`. Never fails.
    fn to_value(&self) -> Value;

    /// Decodes a value, returning `None` on any structural mismatch.
    fn from_value(value: &Value) -> Option<Self>;
}
