//! Mock implementations for testing.
//!
//! Scripted language model and in-memory tool host shared by the
//! integration tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use toolbridge::llm::LLMClient;
use toolbridge::mcp::{ToolTransport, TransportConnector};
use toolbridge::types::{AppError, ContentItem, JsonObject, RawTool, Result};

/// One recorded completion request
#[derive(Debug, Clone)]
pub struct LlmCall {
    pub system: String,
    pub prompt: String,
}

/// Mock LLM client that replays scripted replies in order.
///
/// Once the script is exhausted every further request gets the fallback
/// reply. Every request is recorded so tests can inspect the prompts.
///
/// # Examples
///
/// ```ignore
/// let llm = MockLLMClient::scripted(&[r#"{"tool_name": null}"#, "Paris."]);
/// let failing = MockLLMClient::failing();
/// let narration_fails = MockLLMClient::failing_after(&[r#"{"tool_name": "tavily_search"}"#]);
/// ```
#[derive(Clone)]
pub struct MockLLMClient {
    replies: Arc<Mutex<VecDeque<String>>>,
    fallback: String,
    /// Requests from this (zero-based) index on fail
    fail_from: Option<usize>,
    calls: Arc<Mutex<Vec<LlmCall>>>,
}

impl MockLLMClient {
    /// Create a client that always returns `response`.
    pub fn new(response: &str) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            fallback: response.to_string(),
            fail_from: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a client that returns `replies` in order.
    pub fn scripted(replies: &[&str]) -> Self {
        let client = Self::new("(script exhausted)");
        client
            .replies
            .lock()
            .extend(replies.iter().map(|r| r.to_string()));
        client
    }

    /// Create a client whose every request fails.
    pub fn failing() -> Self {
        Self::failing_after(&[])
    }

    /// Create a client that returns `replies` in order, then fails every further request.
    pub fn failing_after(replies: &[&str]) -> Self {
        Self {
            fail_from: Some(replies.len()),
            ..Self::scripted(replies)
        }
    }

    pub fn calls(&self) -> Vec<LlmCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        let index = {
            let mut calls = self.calls.lock();
            calls.push(LlmCall {
                system: system.to_string(),
                prompt: prompt.to_string(),
            });
            calls.len() - 1
        };

        if self.fail_from.is_some_and(|from| index >= from) {
            return Err(AppError::LLM("Mock LLM failure".to_string()));
        }

        Ok(self
            .replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone()))
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// What the mock tool host saw across all connections
#[derive(Debug, Default)]
pub struct HostLog {
    pub connects: usize,
    pub lists: usize,
    pub calls: Vec<(String, JsonObject)>,
    pub closes: usize,
}

/// In-memory tool host.
///
/// `tools: None` makes listing fail; `call_result: Err(..)` makes every
/// call fail with that message.
#[derive(Clone)]
pub struct MockToolHost {
    tools: Option<Vec<RawTool>>,
    call_result: std::result::Result<Vec<ContentItem>, String>,
    connect_error: Option<String>,
    log: Arc<Mutex<HostLog>>,
}

impl MockToolHost {
    pub fn new(tools: Vec<RawTool>) -> Self {
        Self {
            tools: Some(tools),
            call_result: Ok(Vec::new()),
            connect_error: None,
            log: Arc::new(Mutex::new(HostLog::default())),
        }
    }

    /// A host whose `tools/list` fails
    pub fn unlistable() -> Self {
        Self {
            tools: None,
            ..Self::new(Vec::new())
        }
    }

    /// A host that cannot be reached at all
    pub fn unreachable(message: &str) -> Self {
        Self {
            connect_error: Some(message.to_string()),
            ..Self::new(Vec::new())
        }
    }

    pub fn returning(mut self, items: Vec<ContentItem>) -> Self {
        self.call_result = Ok(items);
        self
    }

    pub fn failing_calls(mut self, message: &str) -> Self {
        self.call_result = Err(message.to_string());
        self
    }

    pub fn log(&self) -> parking_lot::MutexGuard<'_, HostLog> {
        self.log.lock()
    }
}

#[async_trait]
impl TransportConnector for MockToolHost {
    async fn connect(&self) -> Result<Box<dyn ToolTransport>> {
        if let Some(message) = &self.connect_error {
            return Err(AppError::Transport(message.clone()));
        }
        self.log.lock().connects += 1;
        Ok(Box::new(MockTransport {
            host: self.clone(),
            closed: false,
        }))
    }

    fn target(&self) -> String {
        "mock://tools".to_string()
    }
}

/// One connection to a [`MockToolHost`]
pub struct MockTransport {
    host: MockToolHost,
    closed: bool,
}

#[async_trait]
impl ToolTransport for MockTransport {
    async fn list_tools(&self) -> Result<Vec<RawTool>> {
        self.host.log.lock().lists += 1;
        self.host
            .tools
            .clone()
            .ok_or_else(|| AppError::Transport("tools/list failed".to_string()))
    }

    async fn call_tool(&self, name: &str, arguments: JsonObject) -> Result<Vec<ContentItem>> {
        self.host
            .log
            .lock()
            .calls
            .push((name.to_string(), arguments));
        self.host.call_result.clone().map_err(AppError::Transport)
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.host.log.lock().closes += 1;
        }
    }
}

/// The Tavily search tool as a remote host would advertise it
pub fn search_tool() -> RawTool {
    RawTool::new("tavily_search")
        .with_description("Search the web for current information")
        .with_input_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"},
                "max_results": {"type": "integer"},
                "search_depth": {"type": "string"}
            },
            "required": ["query"]
        }))
}

/// Parse the catalog block out of a selection prompt
pub fn catalog_in_prompt(prompt: &str) -> Value {
    let start = prompt.find('[').unwrap_or(0);
    let end = prompt.rfind(']').map(|i| i + 1).unwrap_or(prompt.len());
    serde_json::from_str(&prompt[start..end]).unwrap_or(Value::Null)
}
