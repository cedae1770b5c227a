use crate::tools::search::{format_results, SearchParams, TavilyClient};
use crate::types::AppError;
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

/// MCP server exposing web search to the bridge (or any other MCP client)
#[derive(Clone)]
pub struct SearchMcpServer {
    client: Arc<TavilyClient>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SearchMcpServer {
    pub fn new(client: TavilyClient) -> Self {
        Self {
            client: Arc::new(client),
            tool_router: Self::tool_router(),
        }
    }

    /// Search the web and return titled, scored results plus an AI answer when available
    #[tool(
        description = "Performs web searches and returns relevant results with titles, URLs, content snippets and relevance scores, plus an AI-generated answer when available. max_results is 1-20 (default 5); search_depth is \"basic\" (default) or \"advanced\"."
    )]
    async fn tavily_search(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let entries = self.run_search(&params.0).await;
        let text = serde_json::to_string_pretty(&entries)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

impl SearchMcpServer {
    /// Run a search and shape the outcome into result entries; failures become
    /// a single `{"error": ...}` entry
    pub async fn run_search(&self, params: &SearchParams) -> Vec<Value> {
        let request = match params.normalized() {
            Ok(request) => request,
            Err(AppError::InvalidInput(msg)) => return vec![json!({ "error": msg })],
            Err(e) => return vec![json!({ "error": e.to_string() })],
        };

        match self.client.search(&request).await {
            Ok(response) => format_results(&request.query, &response),
            Err(e) => {
                error!(error = %e, "Tavily search error");
                vec![json!({ "error": format!("Search failed: {}", e) })]
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for SearchMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "toolbridge-search".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some("toolbridge MCP server - provides Tavily web search".into()),
        }
    }
}

/// Serve the search tool over streamable HTTP at `/mcp` on `listener` until `shutdown` resolves
pub async fn serve_http<F>(
    client: TavilyClient,
    listener: tokio::net::TcpListener,
    shutdown: F,
) -> crate::types::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    use rmcp::transport::streamable_http_server::{
        session::local::LocalSessionManager, StreamableHttpService,
    };

    let server = SearchMcpServer::new(client);
    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );
    let router = axum::Router::new().nest_service("/mcp", service);

    if let Ok(address) = listener.local_addr() {
        info!(%address, "Search MCP server listening on /mcp");
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::Internal(format!("MCP server error: {}", e)))?;

    info!("Search MCP server stopped");
    Ok(())
}

/// Bind `address` and serve over streamable HTTP until Ctrl-C
pub async fn start_http_server(
    client: TavilyClient,
    address: std::net::SocketAddr,
) -> crate::types::Result<()> {
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind {}: {}", address, e)))?;

    serve_http(client, listener, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
        }
    })
    .await
}

/// Start the MCP server with stdio transport and serve until the client disconnects
pub async fn start_stdio_server(client: TavilyClient) -> crate::types::Result<()> {
    use rmcp::{transport::io::stdio, ServiceExt};

    info!("Starting search MCP server on stdio");

    let service = SearchMcpServer::new(client)
        .serve(stdio())
        .await
        .map_err(|e| AppError::Internal(format!("MCP server error: {}", e)))?;

    let reason = service
        .waiting()
        .await
        .map_err(|e| AppError::Internal(format!("MCP server error: {}", e)))?;

    info!(?reason, "Search MCP server stopped");
    Ok(())
}
