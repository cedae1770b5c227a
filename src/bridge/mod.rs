//! Tool selection and invocation pipeline
//!
//! One user turn flows through these stages, each in its own module:
//!
//! 1. [`catalog`] - fetch and normalize the tool host's catalog
//! 2. [`selector`] - ask the model which tool (if any) to call and with what arguments
//! 3. [`validator`] - check the arguments are a JSON object
//! 4. [`invoker`] - call the tool and flatten its content into one string
//! 5. [`narrator`] - explain the result (or answer directly when no tool fits)
//!
//! [`orchestrator::ToolBridge`] sequences the stages and turns every failure
//! into the turn's reply.

pub mod catalog;
pub mod invoker;
pub mod narrator;
pub mod orchestrator;
pub mod selector;
pub mod validator;

pub use orchestrator::{ToolBridge, TurnStage};

/// Terminal failures of a turn.
///
/// The `Display` form of each variant is exactly what the user sees.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BridgeError {
    /// The transport detail is logged, not shown
    #[error("Error: Could not connect to the MCP server. Is it running and accessible?")]
    Connection(String),

    #[error("Error: Could not retrieve tools from the MCP server.")]
    CatalogUnavailable,

    /// `reason` is logged, not shown
    #[error("Error: LLM did not provide a valid JSON response for tool selection. LLM response:\n{raw}")]
    SelectionParse { reason: String, raw: String },

    #[error("Error: LLM provided arguments in an incorrect format for tool '{tool}'. Expected a JSON object, got {received}.")]
    MalformedArguments { tool: String, received: &'static str },

    #[error("Error executing tool '{tool}' with arguments {arguments} on MCP server: {message}")]
    Invocation {
        tool: String,
        arguments: String,
        message: String,
    },
}
