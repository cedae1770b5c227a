//! Structural guard on selected arguments
//!
//! Only the outer shape is checked. Per-parameter types are left to the
//! model, which was instructed to follow each tool's schema.

use crate::bridge::BridgeError;
use crate::types::ValidatedCall;
use serde_json::Value;

/// JSON type name used in user-facing messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Accept the selection only if its arguments are a JSON object
pub fn validate(tool_name: &str, arguments: Value) -> Result<ValidatedCall, BridgeError> {
    match arguments {
        Value::Object(arguments) => Ok(ValidatedCall {
            tool_name: tool_name.to_string(),
            arguments,
        }),
        other => Err(BridgeError::MalformedArguments {
            tool: tool_name.to_string(),
            received: json_type_name(&other),
        }),
    }
}
