//! Tools served by the bundled MCP server
//!
//! The bridge itself never calls these directly: it discovers them through
//! the MCP transport like any other remote tool. This module only holds the
//! provider clients the server wraps.
//!
//! # Available Tools
//!
//! ## Web Search
//! ```ignore
//! let client = TavilyClient::new(api_key)?;
//! let request = SearchParams { query: "rust mcp".into(), max_results: Some(5), search_depth: None }
//!     .normalized()?;
//! let response = client.search(&request).await?;
//! ```

/// Tavily web search client.
pub mod search;

pub use search::{SearchParams, TavilyClient};
