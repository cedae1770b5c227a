//! Result narration
//!
//! Always produces a string: model failures are embedded in the reply.

use crate::llm::{ask, LLMClient};
use crate::types::JsonObject;
use serde_json::Value;
use std::sync::Arc;

pub const NARRATION_SYSTEM_PROMPT: &str = "You are an AI assistant. A tool was executed to help answer a user's query. Explain the tool's output to the user in a friendly and concise way.";

pub const FALLBACK_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

/// Prefix marking replies produced without any tool
pub const NO_TOOL_MARKER: &str = "(No specific tool was used by the LLM for your query)";

pub fn narration_prompt(query: &str, tool_name: &str, arguments: &JsonObject, tool_output: &str) -> String {
    format!(
        "The user originally asked: \"{}\"\nThe tool \"{}\" was called with arguments {}.\nThe tool returned the following output:\n---\n{}\n---\nPlease give the user a natural language answer based on this.",
        query,
        tool_name,
        Value::Object(arguments.clone()),
        tool_output
    )
}

pub fn fallback_prompt(query: &str) -> String {
    format!(
        "The user asked: '{}'. No specific tool was chosen. Please provide a helpful general response.",
        query
    )
}

/// Turns tool output, or the lack of a tool, into the final reply
pub struct ResultNarrator {
    llm: Arc<dyn LLMClient>,
}

impl ResultNarrator {
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self { llm }
    }

    /// Explain `tool_output` when a tool ran; otherwise answer `query` directly
    /// and mark the reply as tool-less
    pub async fn narrate(
        &self,
        query: &str,
        tool_name: Option<&str>,
        arguments: &JsonObject,
        tool_output: Option<&str>,
    ) -> String {
        match tool_name {
            Some(tool_name) => {
                let prompt =
                    narration_prompt(query, tool_name, arguments, tool_output.unwrap_or_default());
                ask(self.llm.as_ref(), NARRATION_SYSTEM_PROMPT, &prompt).await
            }
            None => {
                let answer =
                    ask(self.llm.as_ref(), FALLBACK_SYSTEM_PROMPT, &fallback_prompt(query)).await;
                format!("{}\nLLM: {}", NO_TOOL_MARKER, answer)
            }
        }
    }
}
