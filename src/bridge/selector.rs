//! Tool selection
//!
//! The model sees the query and the whole catalog and answers with a single
//! JSON object naming at most one tool. Argument types are the model's
//! responsibility; the prompt asks for schema-typed values but nothing
//! downstream enforces them.

use crate::bridge::BridgeError;
use crate::llm::{ask, LLMClient};
use crate::types::{JsonObject, ToolCatalog, ToolSelection};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const SELECTION_SYSTEM_PROMPT: &str = r#"You select the right tool, and the arguments to pass to it, for a user's query.
You are given the available tools as JSON: each has a name, a description and a JSON schema for its parameters.
Choose at most one tool from that list.

Respond ONLY with a JSON object of this form:
{
  "tool_name": "name_of_the_tool_to_use",
  "arguments": { "param1": "value1", "param2": "value2" }
}

If none of the tools fits the query, respond with:
{
  "tool_name": null,
  "arguments": {}
}

Argument values must match the types declared in the tool's parameter schema:
- a parameter of type 'integer' gets an integer, not a string
- a parameter of type 'string' gets a string
- a parameter of type 'object' gets a nested JSON object with its properties
- a parameter of type 'array' gets a JSON array
Do not write anything before or after the JSON object."#;

/// Context block: the literal query and the indented catalog
pub fn selection_prompt(query: &str, catalog_json: &str) -> String {
    format!(
        "User query: \"{}\"\n\nAvailable tools:\n{}\n\nWhich tool should be used for this query, and with what arguments?\nRespond only with the JSON object.",
        query, catalog_json
    )
}

/// Parse the model's raw reply strictly.
///
/// `tool_name` that is missing, `null` or `""` means no tool; missing
/// `arguments` becomes `{}`. Anything that is not a JSON object with a
/// string-or-null `tool_name` is a [`BridgeError::SelectionParse`].
pub fn parse_selection(raw: &str) -> Result<ToolSelection, BridgeError> {
    let parse_error = |reason: String| BridgeError::SelectionParse {
        reason,
        raw: raw.to_string(),
    };

    let value: Value = serde_json::from_str(raw.trim()).map_err(|e| parse_error(e.to_string()))?;

    let Value::Object(mut object) = value else {
        return Err(parse_error("expected a JSON object".to_string()));
    };

    let tool_name = match object.remove("tool_name") {
        None | Some(Value::Null) => None,
        Some(Value::String(name)) if name.is_empty() => None,
        Some(Value::String(name)) => Some(name),
        Some(_) => return Err(parse_error("tool_name must be a string or null".to_string())),
    };

    let arguments = object
        .remove("arguments")
        .unwrap_or_else(|| Value::Object(JsonObject::new()));

    Ok(ToolSelection {
        tool_name,
        arguments,
    })
}

/// Picks the tool for a turn
pub struct ToolSelector {
    llm: Arc<dyn LLMClient>,
}

impl ToolSelector {
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self { llm }
    }

    /// Ask the model once and parse its decision
    pub async fn select(
        &self,
        query: &str,
        catalog: &ToolCatalog,
    ) -> Result<ToolSelection, BridgeError> {
        let catalog_json = catalog.to_prompt_json().map_err(|e| BridgeError::SelectionParse {
            reason: e.to_string(),
            raw: String::new(),
        })?;

        let prompt = selection_prompt(query, &catalog_json);
        let raw = ask(self.llm.as_ref(), SELECTION_SYSTEM_PROMPT, &prompt).await;
        debug!(raw = %raw, "Tool selection reply");

        let selection = parse_selection(&raw).inspect_err(|e| {
            if let BridgeError::SelectionParse { reason, .. } = e {
                warn!(%reason, "Unparseable tool selection");
            }
        })?;
        info!(tool = ?selection.tool_name, "Tool selected");
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_parse_full_selection() {
        let selection = parse_selection(
            r#"{"tool_name":"tavily_search","arguments":{"query":"recent AI news","max_results":5}}"#,
        )
        .unwrap();
        assert_eq!(selection.tool_name.as_deref(), Some("tavily_search"));
        assert_eq!(selection.arguments["max_results"], 5);
    }

    #[rstest]
    #[case(r#"{"tool_name": null, "arguments": {}}"#)]
    #[case(r#"{"tool_name": "", "arguments": {}}"#)]
    #[case(r#"{"arguments": {}}"#)]
    fn test_no_tool_variants(#[case] raw: &str) {
        let selection = parse_selection(raw).unwrap();
        assert!(selection.tool_name.is_none());
    }

    #[test]
    fn test_missing_arguments_default_to_empty_object() {
        let selection = parse_selection(r#"{"tool_name": "ping"}"#).unwrap();
        assert_eq!(selection.arguments, json!({}));
    }

    #[test]
    fn test_non_object_arguments_are_kept_for_the_validator() {
        let selection = parse_selection(r#"{"tool_name": "x", "arguments": "not-an-object"}"#).unwrap();
        assert_eq!(selection.arguments, json!("not-an-object"));
    }

    #[rstest]
    #[case("Sure! I'd use the search tool.")]
    #[case("```json\n{\"tool_name\": null}\n```")]
    #[case("[1, 2, 3]")]
    #[case(r#"{"tool_name": 42, "arguments": {}}"#)]
    fn test_invalid_replies_carry_raw_text(#[case] raw: &str) {
        match parse_selection(raw) {
            Err(BridgeError::SelectionParse { raw: carried, .. }) => assert_eq!(carried, raw),
            other => panic!("Expected SelectionParse, got {:?}", other),
        }
    }

    #[test]
    fn test_selection_prompt_embeds_query_and_catalog() {
        let prompt = selection_prompt("find rust jobs", "[\n  {\"name\": \"search\"}\n]");
        assert!(prompt.contains("User query: \"find rust jobs\""));
        assert!(prompt.contains("\"name\": \"search\""));
    }

    #[test]
    fn test_system_prompt_describes_reply_shape() {
        assert!(SELECTION_SYSTEM_PROMPT.contains("\"tool_name\": null"));
        assert!(SELECTION_SYSTEM_PROMPT.contains("at most one tool"));
        assert!(SELECTION_SYSTEM_PROMPT.contains("'integer'"));
    }
}
