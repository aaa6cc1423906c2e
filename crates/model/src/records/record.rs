use crate::{core::timestamp::Timestamp, error::ModelError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One log entry as returned by the remote API.
///
/// The fields are opaque apart from the log type's time key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogRecord(Map<String, Value>);

impl LogRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        LogRecord(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Replaces string fields that hold an encoded JSON object or array
    /// (VeloCloud's `detail`, for one) with the decoded value, at any depth.
    /// Other strings are left alone, including ones that look like numbers.
    pub fn expand_embedded_json(self) -> Self {
        LogRecord(
            self.0
                .into_iter()
                .map(|(key, value)| (key, expand_value(value)))
                .collect(),
        )
    }

    /// Reads `key` as a [`Timestamp`]. `Ok(None)` when the field is absent.
    pub fn time(&self, key: &str) -> Result<Option<Timestamp>, ModelError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) => Timestamp::parse(raw).map(Some),
            Some(other) => Err(ModelError::InvalidTimestamp {
                value: other.to_string(),
                reason: "expected a string".to_string(),
            }),
        }
    }
}

fn expand_value(value: Value) -> Value {
    match value {
        Value::String(raw) => {
            if !raw.trim_start().starts_with(['{', '[']) {
                return Value::String(raw);
            }
            match serde_json::from_str::<Value>(&raw) {
                Ok(parsed @ (Value::Object(_) | Value::Array(_))) => expand_value(parsed),
                _ => Value::String(raw),
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(expand_value).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(key, value)| (key, expand_value(value)))
                .collect(),
        ),
        other => other,
    }
}

impl From<Map<String, Value>> for LogRecord {
    fn from(fields: Map<String, Value>) -> Self {
        LogRecord(fields)
    }
}
