use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON object as carried by tool schemas and tool arguments.
pub type JsonObject = Map<String, Value>;

// ============= Tool Types =============

/// Canonical description of one callable tool.
///
/// Serialized for the language model as `{"name", "description", "parameters_schema"}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "parameters_schema")]
    pub parameter_schema: JsonObject,
}

/// Schema found under a tool's `parameters` attribute
#[derive(Debug, Clone)]
pub enum RawParameters {
    /// Schema derived from a Rust type, e.g. `schemars::schema_for!(SearchParams)`
    Typed(schemars::Schema),
    /// Whatever JSON the tool host sent
    Json(Value),
}

/// A tool record as reported by a tool host, before normalization.
///
/// Hosts disagree on where the parameter schema lives, so both the direct
/// `inputSchema` attribute and the older `parameters` attribute are kept.
#[derive(Debug, Clone, Default)]
pub struct RawTool {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Option<Value>,
    pub parameters: Option<RawParameters>,
}

#[derive(Deserialize)]
struct WireTool {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "inputSchema", alias = "input_schema")]
    input_schema: Option<Value>,
    #[serde(default)]
    parameters: Option<Value>,
}

impl RawTool {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_input_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }

    pub fn with_parameters(mut self, parameters: RawParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Parse a tool record from its JSON wire form (MCP `tools/list` entry)
    pub fn from_wire(value: Value) -> Result<Self> {
        let wire: WireTool = serde_json::from_value(value)
            .map_err(|e| AppError::InvalidInput(format!("Malformed tool record: {}", e)))?;

        Ok(Self {
            name: wire.name,
            description: wire.description,
            input_schema: wire.input_schema,
            parameters: wire.parameters.map(RawParameters::Json),
        })
    }
}

/// Ordered tool catalog, in the order the tool host reported the tools.
///
/// Duplicate names are passed through untouched; [`ToolCatalog::get`] returns
/// the first tool with a matching name.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct ToolCatalog {
    tools: Vec<ToolDescriptor>,
}

impl ToolCatalog {
    pub fn new(tools: Vec<ToolDescriptor>) -> Self {
        Self { tools }
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.iter()
    }

    /// First tool registered under `name`
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    /// Indented JSON rendering handed to the selector prompt
    pub fn to_prompt_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.tools)
            .map_err(|e| AppError::Internal(format!("Failed to serialize tool catalog: {}", e)))
    }
}

impl From<Vec<ToolDescriptor>> for ToolCatalog {
    fn from(tools: Vec<ToolDescriptor>) -> Self {
        Self::new(tools)
    }
}

/// The selector's decision for one turn.
///
/// `arguments` stays an untyped JSON value until the validator has checked
/// its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSelection {
    pub tool_name: Option<String>,
    pub arguments: Value,
}

impl ToolSelection {
    /// The "no tool applicable" decision
    pub fn none() -> Self {
        Self {
            tool_name: None,
            arguments: Value::Object(JsonObject::new()),
        }
    }
}

/// A selection whose arguments are known to be a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCall {
    pub tool_name: String,
    pub arguments: JsonObject,
}

/// One unit of a tool's invocation result.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentItem {
    Text {
        text: String,
    },
    /// Base64 payload as delivered by the tool host, with its declared type
    Binary {
        data: String,
        media_type: String,
    },
    Other(Value),
}

impl ContentItem {
    pub fn text(text: impl Into<String>) -> Self {
        ContentItem::Text { text: text.into() }
    }

    /// Best-effort JSON view of the item
    pub fn to_json(&self) -> Value {
        match self {
            ContentItem::Text { text } => serde_json::json!({ "type": "text", "text": text }),
            ContentItem::Binary { data, media_type } => serde_json::json!({
                "type": "binary",
                "mimeType": media_type,
                "size": data.len(),
            }),
            ContentItem::Other(value) => value.clone(),
        }
    }

    /// Interpret one MCP content object (`{"type": "text", ...}`, `{"type": "image", ...}`, ...)
    pub fn from_wire(value: Value) -> Self {
        let kind = value.get("type").and_then(Value::as_str).unwrap_or_default();
        match kind {
            "text" => match value.get("text").and_then(Value::as_str) {
                Some(text) => ContentItem::text(text),
                None => ContentItem::Other(value),
            },
            "image" | "audio" => match value.get("data").and_then(Value::as_str) {
                Some(data) => ContentItem::Binary {
                    data: data.to_string(),
                    media_type: value
                        .get("mimeType")
                        .and_then(Value::as_str)
                        .unwrap_or("application/octet-stream")
                        .to_string(),
                },
                None => ContentItem::Other(value),
            },
            _ => ContentItem::Other(value),
        }
    }
}

// ============= Conversation Types =============

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationTurn {
    pub user_message: String,
    pub assistant_message: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(user_message: impl Into<String>, assistant_message: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            assistant_message: assistant_message.into(),
            timestamp: Utc::now(),
        }
    }
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
