//! Model Context Protocol plumbing
//!
//! - [`client`] - the tool host transport the bridge consumes each turn
//! - [`server`] - an MCP server (streamable HTTP or stdio) exposing the Tavily search tool

pub mod client;
pub mod server;

pub use client::{McpConnector, McpTarget, ToolTransport, TransportConnector};
pub use server::{serve_http, start_http_server, start_stdio_server, SearchMcpServer};
