//! Runtime values passed to and returned from function plugins
//!
//! Values can be numbers, text, booleans, objects (for records such as
//! statistics summaries), lists, null, or errors. Errors travel as values
//! so a plugin call never panics.

use crate::ShewhartError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;

/// Runtime value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
    Object(HashMap<String, Value>),
    List(Vec<Value>),
    Null,
    Error(ShewhartError),
}

impl Value {
    // ========== Safe Accessors (never panic) ==========

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&ShewhartError> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get field from object. Returns Error value if not found or not an object.
    pub fn get(&self, key: &str) -> Value {
        match self {
            Value::Object(map) => map.get(key).cloned().unwrap_or_else(|| {
                Value::Error(ShewhartError::new(
                    crate::codes::NOT_FOUND,
                    format!("Undefined field: {}", key),
                ))
            }),
            Value::Error(e) => Value::Error(e.clone()),
            _ => Value::Error(ShewhartError::type_error("Object", self.type_name())),
        }
    }

    /// Type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Text(_) => "Text",
            Value::Bool(_) => "Bool",
            Value::Object(_) => "Object",
            Value::List(_) => "List",
            Value::Null => "Null",
            Value::Error(_) => "Error",
        }
    }

    /// Build a list of numbers
    pub fn numbers(values: &[f64]) -> Value {
        Value::List(values.iter().copied().map(Value::Number).collect())
    }

    /// Plain JSON form (numbers stay numbers, errors become `_error` objects)
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Number(n) => json!(n),
            Value::Text(s) => JsonValue::String(s.clone()),
            Value::List(l) => JsonValue::Array(l.iter().map(Value::to_json).collect()),
            Value::Object(o) => {
                JsonValue::Object(o.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
            }
            Value::Error(e) => json!({"_error": {"code": e.code, "message": e.message}}),
        }
    }

    /// Inverse of [`Value::to_json`] for request arguments.
    /// Numeric strings are read as numbers.
    pub fn from_json(json: &JsonValue) -> Value {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => match n.as_f64() {
                Some(f) => Value::Number(f),
                None => Value::Text(n.to_string()),
            },
            JsonValue::String(s) => match s.trim().parse::<f64>() {
                Ok(f) if f.is_finite() => Value::Number(f),
                _ => Value::Text(s.clone()),
            },
            JsonValue::Array(arr) => Value::List(arr.iter().map(Value::from_json).collect()),
            JsonValue::Object(obj) => Value::Object(
                obj.iter().map(|(k, v)| (k.clone(), Value::from_json(v))).collect(),
            ),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Object(obj) => match obj.get("type") {
                Some(Value::Text(t)) => write!(f, "[{}]", t),
                _ => write!(f, "[Object]"),
            },
            Value::List(items) => {
                // Small lists show their contents, large ones their length
                if items.len() <= 5 {
                    let contents: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                    write!(f, "[{}]", contents.join(", "))
                } else {
                    write!(f, "[{}]", items.len())
                }
            }
            Value::Null => write!(f, "null"),
            Value::Error(e) => write!(f, "#ERROR: {}", e.code),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<ShewhartError> for Value {
    fn from(e: ShewhartError) -> Self {
        Value::Error(e)
    }
}
