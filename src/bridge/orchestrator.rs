//! Turn orchestration
//!
//! Sequences the pipeline stages over one fresh transport per turn.

use crate::bridge::{catalog, invoker, validator, BridgeError};
use crate::bridge::narrator::ResultNarrator;
use crate::bridge::selector::ToolSelector;
use crate::llm::LLMClient;
use crate::mcp::{ToolTransport, TransportConnector};
use crate::types::{ConversationTurn, JsonObject};
use std::sync::Arc;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

/// Where a turn is in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    Start,
    CatalogFetched,
    Selected,
    Validated,
    Invoked,
    Narrated,
    NarratedFallback,
}

/// Runs user turns through catalog → selection → validation → invocation → narration.
///
/// Holds no per-turn state: every turn opens its own transport, so one
/// `ToolBridge` can serve concurrent sessions.
///
/// # Example
///
/// ```ignore
/// let bridge = ToolBridge::new(llm, Arc::new(McpConnector::new(target, timeout)));
/// let reply = bridge.respond("search for recent AI news").await;
/// ```
pub struct ToolBridge {
    connector: Arc<dyn TransportConnector>,
    selector: ToolSelector,
    narrator: ResultNarrator,
}

impl ToolBridge {
    pub fn new(llm: Arc<dyn LLMClient>, connector: Arc<dyn TransportConnector>) -> Self {
        Self {
            connector,
            selector: ToolSelector::new(llm.clone()),
            narrator: ResultNarrator::new(llm),
        }
    }

    /// Answer one message with a fresh connection, closed on every exit path
    pub async fn respond(&self, message: &str) -> String {
        let turn_id = Uuid::new_v4();
        let span = info_span!("turn", %turn_id);

        async {
            let mut transport = match self.connector.connect().await {
                Ok(transport) => transport,
                Err(e) => {
                    error!(host = %self.connector.target(), error = %e, "Could not connect to MCP server");
                    return BridgeError::Connection(e.to_string()).to_string();
                }
            };

            let reply = self.process_query(message, transport.as_ref()).await;
            transport.close().await;
            reply
        }
        .instrument(span)
        .await
    }

    /// Answer one message and append the exchange to `history`
    pub async fn chat(
        &self,
        message: &str,
        mut history: Vec<ConversationTurn>,
    ) -> (String, Vec<ConversationTurn>) {
        let reply = self.respond(message).await;
        history.push(ConversationTurn::new(message, reply.clone()));
        (reply, history)
    }

    /// Run the pipeline over an already open transport; every failure becomes the reply
    pub async fn process_query(&self, query: &str, transport: &dyn ToolTransport) -> String {
        match self.run_turn(query, transport).await {
            Ok(reply) => reply,
            Err(e) => {
                info!(error = %e, "Turn ended early");
                e.to_string()
            }
        }
    }

    async fn run_turn(
        &self,
        query: &str,
        transport: &dyn ToolTransport,
    ) -> std::result::Result<String, BridgeError> {
        info!(stage = ?TurnStage::Start, "Processing query");

        let catalog = catalog::fetch_catalog(transport).await;
        if catalog.is_empty() {
            return Err(BridgeError::CatalogUnavailable);
        }
        info!(stage = ?TurnStage::CatalogFetched, tools = catalog.len());

        let selection = self.selector.select(query, &catalog).await?;
        info!(stage = ?TurnStage::Selected, tool = ?selection.tool_name);

        let Some(tool_name) = selection.tool_name else {
            let reply = self
                .narrator
                .narrate(query, None, &JsonObject::new(), None)
                .await;
            info!(stage = ?TurnStage::NarratedFallback);
            return Ok(reply);
        };

        let call = validator::validate(&tool_name, selection.arguments)?;
        info!(stage = ?TurnStage::Validated, tool = %call.tool_name);

        let output = invoker::invoke(&call, transport).await?;
        info!(stage = ?TurnStage::Invoked, tool = %call.tool_name, chars = output.len());

        let reply = self
            .narrator
            .narrate(query, Some(&call.tool_name), &call.arguments, Some(&output))
            .await;
        info!(stage = ?TurnStage::Narrated);
        Ok(reply)
    }
}
