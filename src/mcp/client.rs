//! MCP client transport
//!
//! The bridge talks to the tool host through two small traits:
//! [`TransportConnector`] opens one connection per turn and
//! [`ToolTransport`] exposes the two RPCs the pipeline needs. The rmcp-backed
//! implementation speaks streamable HTTP or stdio to a spawned child process.

use crate::types::{AppError, ContentItem, JsonObject, RawTool, Result};
use async_trait::async_trait;
use rmcp::{
    model::CallToolRequestParam,
    service::RunningService,
    transport::{StreamableHttpClientTransport, TokioChildProcess},
    RoleClient, ServiceExt,
};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One open connection to a tool host
#[async_trait]
pub trait ToolTransport: Send + Sync {
    /// List the tools the host currently offers
    async fn list_tools(&self) -> Result<Vec<RawTool>>;

    /// Call a tool and return its content items in host order
    async fn call_tool(&self, name: &str, arguments: JsonObject) -> Result<Vec<ContentItem>>;

    /// Release the connection; calling it twice is harmless
    async fn close(&mut self);
}

/// Opens a fresh [`ToolTransport`] for every turn
#[async_trait]
pub trait TransportConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn ToolTransport>>;

    /// Human-readable address of the tool host
    fn target(&self) -> String;
}

/// Where the tool host lives
#[derive(Debug, Clone, PartialEq)]
pub enum McpTarget {
    /// Streamable HTTP endpoint, e.g. `http://127.0.0.1:8080/mcp`
    Http { url: String },
    /// Child process speaking MCP over stdin/stdout
    Stdio { command: String, args: Vec<String> },
}

impl std::fmt::Display for McpTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            McpTarget::Http { url } => write!(f, "{}", url),
            McpTarget::Stdio { command, args } if args.is_empty() => write!(f, "stdio:{}", command),
            McpTarget::Stdio { command, args } => write!(f, "stdio:{} {}", command, args.join(" ")),
        }
    }
}

/// rmcp-backed connector
pub struct McpConnector {
    target: McpTarget,
    timeout: Duration,
}

impl McpConnector {
    pub fn new(target: McpTarget, timeout: Duration) -> Self {
        Self { target, timeout }
    }
}

async fn bounded<T, E, F>(timeout: Duration, what: &str, fut: F) -> Result<T>
where
    E: std::fmt::Display,
    F: Future<Output = std::result::Result<T, E>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(AppError::Transport(format!("{} failed: {}", what, e))),
        Err(_) => Err(AppError::Transport(format!(
            "{} timed out after {}s",
            what,
            timeout.as_secs()
        ))),
    }
}

#[async_trait]
impl TransportConnector for McpConnector {
    async fn connect(&self) -> Result<Box<dyn ToolTransport>> {
        debug!(host = %self.target, "Connecting to MCP server");

        let service = match &self.target {
            McpTarget::Http { url } => {
                let transport = StreamableHttpClientTransport::from_uri(url.clone());
                bounded(self.timeout, "MCP handshake", ().serve(transport)).await?
            }
            McpTarget::Stdio { command, args } => {
                let mut cmd = tokio::process::Command::new(command);
                cmd.args(args);
                let transport = TokioChildProcess::new(cmd).map_err(|e| {
                    AppError::Transport(format!("Failed to spawn '{}': {}", command, e))
                })?;
                bounded(self.timeout, "MCP handshake", ().serve(transport)).await?
            }
        };

        info!(host = %self.target, "Connected to MCP server");
        Ok(Box::new(McpTransport {
            service: Some(service),
            timeout: self.timeout,
        }))
    }

    fn target(&self) -> String {
        self.target.to_string()
    }
}

/// A live rmcp client session
pub struct McpTransport {
    service: Option<RunningService<RoleClient, ()>>,
    timeout: Duration,
}

impl McpTransport {
    fn service(&self) -> Result<&RunningService<RoleClient, ()>> {
        self.service
            .as_ref()
            .ok_or_else(|| AppError::Transport("MCP connection already closed".to_string()))
    }
}

/// Text of every text item, used to report tool-side failures
fn error_text(items: &[ContentItem]) -> String {
    let texts: Vec<&str> = items
        .iter()
        .filter_map(|item| match item {
            ContentItem::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect();

    if texts.is_empty() {
        "tool reported an error without details".to_string()
    } else {
        texts.join("\n")
    }
}

/// Decode a `tools/call` result body into content items, surfacing `isError` results as errors
pub fn decode_call_result(result: Value) -> Result<Vec<ContentItem>> {
    let items: Vec<ContentItem> = result
        .get("content")
        .and_then(Value::as_array)
        .map(|content| content.iter().cloned().map(ContentItem::from_wire).collect())
        .unwrap_or_default();

    if result.get("isError").and_then(Value::as_bool).unwrap_or(false) {
        return Err(AppError::Transport(error_text(&items)));
    }

    Ok(items)
}

#[async_trait]
impl ToolTransport for McpTransport {
    async fn list_tools(&self) -> Result<Vec<RawTool>> {
        let service = self.service()?;
        let tools = bounded(self.timeout, "Listing tools", service.list_all_tools()).await?;

        let raw_tools = tools
            .into_iter()
            .filter_map(|tool| {
                let value = match serde_json::to_value(&tool) {
                    Ok(value) => value,
                    Err(e) => {
                        warn!(tool = %tool.name, error = %e, "Skipping unserializable tool");
                        return None;
                    }
                };
                match RawTool::from_wire(value) {
                    Ok(raw) => Some(raw),
                    Err(e) => {
                        warn!(tool = %tool.name, error = %e, "Skipping malformed tool");
                        None
                    }
                }
            })
            .collect();

        Ok(raw_tools)
    }

    async fn call_tool(&self, name: &str, arguments: JsonObject) -> Result<Vec<ContentItem>> {
        let service = self.service()?;
        let request: CallToolRequestParam = serde_json::from_value(serde_json::json!({
            "name": name,
            "arguments": arguments,
        }))
        .map_err(|e| AppError::Internal(format!("Failed to build tool call: {}", e)))?;

        let result = bounded(self.timeout, "Tool call", service.call_tool(request)).await?;
        let body = serde_json::to_value(&result)
            .map_err(|e| AppError::Internal(format!("Failed to read tool result: {}", e)))?;

        decode_call_result(body)
    }

    async fn close(&mut self) {
        if let Some(service) = self.service.take() {
            match service.cancel().await {
                Ok(reason) => debug!(?reason, "MCP connection closed"),
                Err(e) => warn!(error = %e, "MCP connection did not shut down cleanly"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_target_display() {
        let http = McpTarget::Http {
            url: "http://127.0.0.1:8080/mcp".to_string(),
        };
        assert_eq!(http.to_string(), "http://127.0.0.1:8080/mcp");

        let stdio = McpTarget::Stdio {
            command: "toolbridge".to_string(),
            args: vec!["serve".to_string()],
        };
        assert_eq!(stdio.to_string(), "stdio:toolbridge serve");
    }

    #[test]
    fn test_decode_call_result_content_order() {
        let items = decode_call_result(json!({
            "content": [
                {"type": "text", "text": "first"},
                {"type": "text", "text": "second"}
            ],
            "isError": false
        }))
        .unwrap();
        assert_eq!(items, vec![ContentItem::text("first"), ContentItem::text("second")]);
    }

    #[test]
    fn test_decode_call_result_missing_content_is_empty() {
        assert!(decode_call_result(json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_decode_call_result_error_flag() {
        let err = decode_call_result(json!({
            "content": [{"type": "text", "text": "quota exceeded"}],
            "isError": true
        }))
        .unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let result: Result<()> = bounded(Duration::from_millis(10), "Slow call", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<(), AppError>(())
        })
        .await;
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Slow call timed out"));
    }
}
