//! Session message extraction from FIT files
//!
//! Decoding is delegated to `fitparser`; this module only finds the first
//! `session` message and flattens its fields into a name-keyed map. Later
//! session messages in the same file are ignored.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDateTime;
use fitparser::profile::MesgNum;
use fitparser::{FitDataRecord, Value};

use crate::error::{PerfLabError, Result};

/// A raw field value taken from a FIT message
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Timestamp as a naive UTC datetime
    Timestamp(NaiveDateTime),
    Float(f64),
    Integer(i64),
    Text(String),
    Array(Vec<FieldValue>),
    Null,
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Best-effort numeric coercion; anything non-numeric is `None`
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            FieldValue::Float(v) => *v,
            FieldValue::Integer(v) => *v as f64,
            FieldValue::Text(s) => s.trim().parse::<f64>().ok()?,
            FieldValue::Timestamp(_) | FieldValue::Array(_) | FieldValue::Null => return None,
        };
        value.is_finite().then_some(value)
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// String form used for categorical fields such as sport
    pub fn to_label(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Integer(v) => Some(v.to_string()),
            FieldValue::Float(v) => Some(v.to_string()),
            FieldValue::Timestamp(ts) => Some(ts.format("%Y-%m-%d %H:%M:%S").to_string()),
            FieldValue::Array(items) => {
                let parts: Vec<String> = items.iter().filter_map(FieldValue::to_label).collect();
                Some(format!("[{}]", parts.join(", ")))
            }
            FieldValue::Null => None,
        }
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Timestamp(ts) => FieldValue::Timestamp(ts.naive_utc()),
            Value::Byte(v) | Value::Enum(v) | Value::UInt8(v) | Value::UInt8z(v) => {
                FieldValue::Integer(i64::from(*v))
            }
            Value::SInt8(v) => FieldValue::Integer(i64::from(*v)),
            Value::SInt16(v) => FieldValue::Integer(i64::from(*v)),
            Value::UInt16(v) | Value::UInt16z(v) => FieldValue::Integer(i64::from(*v)),
            Value::SInt32(v) => FieldValue::Integer(i64::from(*v)),
            Value::UInt32(v) | Value::UInt32z(v) => FieldValue::Integer(i64::from(*v)),
            Value::SInt64(v) => FieldValue::Integer(*v),
            Value::UInt64(v) | Value::UInt64z(v) => i64::try_from(*v)
                .map(FieldValue::Integer)
                .unwrap_or(FieldValue::Float(*v as f64)),
            Value::Float32(v) => FieldValue::Float(f64::from(*v)),
            Value::Float64(v) => FieldValue::Float(*v),
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Array(items) => FieldValue::Array(items.iter().map(FieldValue::from).collect()),
            #[allow(unreachable_patterns)]
            _ => FieldValue::Null,
        }
    }
}

/// Flat field-name to value map of one session message
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSession {
    fields: HashMap<String, FieldValue>,
}

impl RawSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// First value among `keys` that is present and not null, in key order
    pub fn first_present(&self, keys: &[&str]) -> Option<&FieldValue> {
        keys.iter()
            .filter_map(|key| self.fields.get(*key))
            .find(|value| !value.is_null())
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for RawSession {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        let mut session = RawSession::new();
        for (name, value) in iter {
            session.insert(name, value);
        }
        session
    }
}

/// Read a FIT file and extract its first session message
pub fn extract_session(path: &Path) -> Result<RawSession> {
    let bytes = std::fs::read(path).map_err(|e| PerfLabError::UnreadableFile(e.to_string()))?;
    extract_session_from_bytes(&bytes)
}

/// Extract the first session message from in-memory FIT data
pub fn extract_session_from_bytes(bytes: &[u8]) -> Result<RawSession> {
    let records = fitparser::from_bytes(bytes).map_err(|e| PerfLabError::malformed(e.to_string()))?;
    session_from_records(&records)
}

fn session_from_records(records: &[FitDataRecord]) -> Result<RawSession> {
    let session = records
        .iter()
        .find(|record| matches!(record.kind(), MesgNum::Session))
        .ok_or(PerfLabError::NoSessionRecord)?;

    Ok(session
        .fields()
        .iter()
        .map(|field| (field.name().to_string(), FieldValue::from(field.value())))
        .collect())
}
