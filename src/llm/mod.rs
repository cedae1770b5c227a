//! LLM Provider Clients and Abstractions
//!
//! The language model is used twice per turn: once to pick a tool and its
//! arguments, once to narrate the result. Both uses go through
//! [`LLMClient::generate_with_system`], wrapped by [`client::ask`] so that a
//! provider failure turns into text instead of an error.
//!
//! # Supported Providers
//!
//! - OpenAI and OpenAI-compatible endpoints (always available)
//! - Azure OpenAI deployments (always available)
//! - `ollama` - Local Ollama server
//!
//! # Example
//!
//! ```ignore
//! use toolbridge::llm::{ModelParams, Provider};
//!
//! let provider = Provider::OpenAI {
//!     api_key: std::env::var("OPENAI_API_KEY")?,
//!     api_base: "https://api.openai.com/v1".to_string(),
//!     model: "gpt-4.1-mini".to_string(),
//!     params: ModelParams::default(),
//! };
//! let client = provider.create_client()?;
//! let answer = client.generate_with_system("Be brief.", "What is MCP?").await?;
//! ```

/// Core LLM client trait and provider selection.
pub mod client;
/// OpenAI and Azure OpenAI chat completions.
pub mod openai;

#[cfg(feature = "ollama")]
pub mod ollama;

pub use client::{ask, LLMClient, ModelParams, Provider};
