//! Payload envelope: converted record plus conversion timestamp.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConvertError, Result};

/// Fixed-precision local time format for the `timestamp.convert` field.
pub const CONVERT_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.3f";

/// Timestamp sub-object attached to every published record.
///
/// `register` stays empty in the relay; it is populated downstream when the
/// record is registered by the receiving side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timestamp {
    pub convert: String,
    pub register: String,
}

/// Wrap a converted record with its conversion timestamp and serialize it
/// into the final payload bytes.
///
/// The record fields stay at the top level; the timestamp lands under a
/// `timestamp` key next to them.
pub fn seal(record: Value, converted_at: DateTime<Local>) -> Result<Vec<u8>> {
    let mut object = match record {
        Value::Object(map) => map,
        other => {
            return Err(ConvertError::validation(format!(
                "converted record must be a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    let timestamp = Timestamp {
        convert: converted_at.format(CONVERT_TIME_FORMAT).to_string(),
        register: String::new(),
    };
    object.insert("timestamp".to_string(), serde_json::to_value(&timestamp)?);

    Ok(serde_json::to_vec(&Value::Object(object))?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
