//! # toolbridge
//!
//! A conversational bridge between a language model and the tools of a
//! Model Context Protocol (MCP) server.
//!
//! ## Overview
//!
//! For every user message toolbridge:
//!
//! 1. fetches the tool catalog from the MCP server,
//! 2. asks the model to pick at most one tool and its arguments,
//! 3. checks the arguments are a JSON object,
//! 4. calls the tool and flattens its output to text,
//! 5. asks the model to explain the output in plain language.
//!
//! Every failure along the way becomes the reply text; a turn never panics
//! or returns an error to the caller.
//!
//! toolbridge can be used in two ways:
//!
//! 1. **As a CLI** - Run the `toolbridge` binary (`chat`, `ask`, `tools`, `serve`)
//! 2. **As a library** - Drive [`ToolBridge`] from your own Rust code
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use std::{sync::Arc, time::Duration};
//! use toolbridge::{McpConnector, McpTarget, ModelParams, Provider, ToolBridge};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let llm = Provider::OpenAI {
//!         api_key: std::env::var("OPENAI_API_KEY")?,
//!         api_base: "https://api.openai.com/v1".to_string(),
//!         model: "gpt-4.1-mini".to_string(),
//!         params: ModelParams::default(),
//!     }
//!     .create_client()?;
//!
//!     let connector = McpConnector::new(
//!         McpTarget::Http { url: "http://127.0.0.1:8080/mcp".to_string() },
//!         Duration::from_secs(30),
//!     );
//!
//!     let bridge = ToolBridge::new(Arc::from(llm), Arc::new(connector));
//!     println!("{}", bridge.respond("search for recent AI news").await);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ollama` | Ollama local inference |
//!
//! ## Modules
//!
//! - [`bridge`] - The per-turn pipeline
//! - [`llm`] - Language model clients
//! - [`mcp`] - MCP client transport and the bundled search server
//! - [`tools`] - Provider clients behind the bundled server's tools
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration loading

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// Tool selection and invocation pipeline.
pub mod bridge;
/// Command-line parsing and terminal output.
pub mod cli;
/// LLM provider clients and abstractions.
pub mod llm;
/// Model Context Protocol client and server.
pub mod mcp;
/// Provider clients for the bundled tools.
pub mod tools;
/// Core types (catalog, selections, content, errors).
pub mod types;
/// Configuration utilities (TOML, environment).
pub mod utils;

// Re-export commonly used types
pub use bridge::{BridgeError, ToolBridge, TurnStage};
pub use llm::{LLMClient, ModelParams, Provider};
pub use mcp::{McpConnector, McpTarget, ToolTransport, TransportConnector};
pub use types::{AppError, ContentItem, ConversationTurn, RawTool, Result, ToolCatalog};
pub use utils::BridgeConfig;
