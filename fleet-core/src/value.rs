//! Record values and the wide-integer normalizer.
//!
//! The storage layer represents auto-increment keys as wide integers
//! (`BigInt`). Numeric UI contexts work in double precision, so every
//! query result is passed through [`normalize`] before it leaves the
//! access layer.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A tree-shaped query-result value.
///
/// Rows, nested relations, and scalar columns are all expressed in this
/// one type; database results are trees, never graphs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecordValue {
    Null,
    Bool(bool),
    /// Wide-integer identifier as stored by the backend.
    BigInt(i64),
    Number(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    List(Vec<RecordValue>),
    Map(BTreeMap<String, RecordValue>),
}

impl RecordValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RecordValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            RecordValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_big_int(&self) -> Option<i64> {
        match self {
            RecordValue::BigInt(n) => Some(*n),
            _ => None,
        }
    }

    /// Field lookup on a `Map` value.
    pub fn get(&self, key: &str) -> Option<&RecordValue> {
        match self {
            RecordValue::Map(m) => m.get(key),
            _ => None,
        }
    }
}

impl From<bool> for RecordValue {
    fn from(v: bool) -> Self {
        RecordValue::Bool(v)
    }
}

impl From<i64> for RecordValue {
    fn from(v: i64) -> Self {
        RecordValue::BigInt(v)
    }
}

impl From<f64> for RecordValue {
    fn from(v: f64) -> Self {
        RecordValue::Number(v)
    }
}

impl From<&str> for RecordValue {
    fn from(v: &str) -> Self {
        RecordValue::Text(v.to_string())
    }
}

impl From<String> for RecordValue {
    fn from(v: String) -> Self {
        RecordValue::Text(v)
    }
}

impl From<DateTime<Utc>> for RecordValue {
    fn from(v: DateTime<Utc>) -> Self {
        RecordValue::Timestamp(v)
    }
}

/// Deep-convert every wide integer in `value` to a plain number.
///
/// Timestamps pass through untouched (returned as-is, never traversed or
/// reformatted); everything else that is not a `BigInt` is left alone.
/// Normalizing an already-normalized tree is a no-op.
///
/// Callers must uphold the range precondition: identifiers are assumed to
/// fit the exactly-representable integer range of `f64`. No range check
/// is performed; values outside it lose precision silently.
pub fn normalize(value: RecordValue) -> RecordValue {
    match value {
        RecordValue::BigInt(v) => RecordValue::Number(v as f64),
        RecordValue::List(items) => RecordValue::List(items.into_iter().map(normalize).collect()),
        RecordValue::Map(map) => {
            RecordValue::Map(map.into_iter().map(|(k, v)| (k, normalize(v))).collect())
        }
        other => other,
    }
}
