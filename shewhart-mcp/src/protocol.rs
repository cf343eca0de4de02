//! JSON-RPC message types

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;

#[derive(Debug, Deserialize)]
pub struct McpRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

impl McpRequest {
    /// Requests without an id are notifications and get no response
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

impl McpResponse {
    pub fn from_result(id: Option<JsonValue>, result: Result<JsonValue, McpError>) -> Self {
        match result {
            Ok(r) => Self {
                jsonrpc: "2.0".to_string(),
                id,
                result: Some(r),
                error: None,
            },
            Err(e) => Self {
                jsonrpc: "2.0".to_string(),
                id,
                result: None,
                error: Some(e),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct McpError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

impl McpError {
    pub fn parse_error(details: impl std::fmt::Display) -> Self {
        Self {
            code: PARSE_ERROR,
            message: format!("Parse error: {}", details),
            data: None,
        }
    }

    pub fn invalid_request(details: impl std::fmt::Display) -> Self {
        Self {
            code: INVALID_REQUEST,
            message: format!("Invalid Request: {}", details),
            data: None,
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: METHOD_NOT_FOUND,
            message: format!("Method not found: {}", method),
            data: None,
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: INVALID_PARAMS,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: JsonValue) -> Self {
        self.data = Some(data);
        self
    }
}
