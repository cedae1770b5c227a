//! Tool invocation and result normalization

use crate::bridge::BridgeError;
use crate::mcp::ToolTransport;
use crate::types::{ContentItem, ValidatedCall};
use serde_json::Value;
use tracing::{error, info};

pub const NO_CONTENT: &str = "Tool executed successfully but returned no content.";

/// Flatten a tool result into one string.
///
/// Only the first item decides the shape: its text verbatim, a placeholder
/// for binary payloads, or (for anything else) a JSON array of every item.
pub fn normalize_content(items: &[ContentItem]) -> String {
    match items.first() {
        None => NO_CONTENT.to_string(),
        Some(ContentItem::Text { text }) => text.clone(),
        Some(ContentItem::Binary { media_type, .. }) => {
            format!("[Binary data received, type: {}]", media_type)
        }
        Some(ContentItem::Other(_)) => {
            Value::Array(items.iter().map(ContentItem::to_json).collect()).to_string()
        }
    }
}

/// Call the validated tool; transport and tool-side failures become [`BridgeError::Invocation`]
pub async fn invoke(
    call: &ValidatedCall,
    transport: &dyn ToolTransport,
) -> Result<String, BridgeError> {
    info!(tool = %call.tool_name, "Calling MCP tool");

    match transport
        .call_tool(&call.tool_name, call.arguments.clone())
        .await
    {
        Ok(items) => {
            info!(tool = %call.tool_name, items = items.len(), "MCP tool returned");
            Ok(normalize_content(&items))
        }
        Err(e) => {
            error!(tool = %call.tool_name, error = %e, "Error calling MCP tool");
            Err(BridgeError::Invocation {
                tool: call.tool_name.clone(),
                arguments: Value::Object(call.arguments.clone()).to_string(),
                message: e.to_string(),
            })
        }
    }
}
