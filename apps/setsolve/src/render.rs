//! Conversion of store replies to JSON for printing.

use redis::Value;
use serde_json::{Value as Json, json};

/// Convert a reply into JSON.
///
/// Bulk strings become UTF-8 strings (lossy), arrays and sets become arrays,
/// maps become arrays of `[key, value]` pairs.
pub fn to_json(value: &Value) -> Json {
    match value {
        Value::Nil => Json::Null,
        Value::Int(i) => json!(i),
        Value::Double(d) => json!(d),
        Value::Boolean(b) => json!(b),
        Value::Okay => json!("OK"),
        Value::SimpleString(s) => json!(s),
        Value::BulkString(bytes) => json!(String::from_utf8_lossy(bytes)),
        Value::VerbatimString { text, .. } => json!(text),
        Value::Array(items) | Value::Set(items) => Json::Array(items.iter().map(to_json).collect()),
        Value::Map(pairs) => Json::Array(
            pairs
                .iter()
                .map(|(k, v)| json!([to_json(k), to_json(v)]))
                .collect(),
        ),
        other => json!(format!("{other:?}")),
    }
}
