//! The decoded BSER value tree (§3.1).

use indexmap::IndexMap;
use serde::Serialize;

/// An object's entries, keyed by their decoded String value.
///
/// Built as an `IndexMap` regardless of key-ordering policy (§4.4): under
/// `Unsorted` entries are inserted in wire order, under `Sorted` entries
/// are sorted by key before insertion. Either way iteration order is the
/// map's insertion order, so a single container type covers both policies.
pub type Object = IndexMap<String, Value>;

/// A decoded BSER value (§3.1).
///
/// Integer variants are preserved at their declared wire width; an
/// `Int8` does not get promoted to `Int32` just because a consumer might
/// expect a wider type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Real(f64),
    String(String),
    Array(Vec<Value>),
    Object(Object),
}

impl Value {
    /// Returns the decoded string if this value is `Value::String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the decoded array if this value is `Value::Array`.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Returns the decoded object if this value is `Value::Object`.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(m) => Some(m),
            _ => None,
        }
    }

    /// Widens any integer variant to `i64`, for callers that don't care
    /// about the declared wire width.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int8(v) => Some(v as i64),
            Value::Int16(v) => Some(v as i64),
            Value::Int32(v) => Some(v as i64),
            Value::Int64(v) => Some(v),
            _ => None,
        }
    }
}
