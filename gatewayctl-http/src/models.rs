//! Request bodies and their validation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `POST /plugins/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub id: String,
    /// JSON text, or a JSON object
    #[serde(default)]
    pub extra: Option<Value>,
}

/// `POST /plugins/unregister`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnregisterRequest {
    pub id: String,
}

/// Turn the `extra` field into the document stored in the catalog.
///
/// Absent, `null` or empty string become `{}`. A string must hold valid JSON.
pub fn parse_extra(extra: Option<Value>) -> Result<Value, String> {
    match extra {
        None | Some(Value::Null) => Ok(Value::Object(Map::new())),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(Value::Object(Map::new())),
        Some(Value::String(text)) => {
            serde_json::from_str(&text).map_err(|e| format!("extra is not valid JSON: {e}"))
        }
        Some(value @ Value::Object(_)) => Ok(value),
        Some(_) => Err("extra must be a JSON string or object".to_string()),
    }
}
