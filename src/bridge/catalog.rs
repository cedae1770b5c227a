//! Tool catalog normalization
//!
//! Tool hosts expose parameter schemas under different attributes and in
//! different shapes. Normalization picks the first usable one and degrades
//! to an empty schema instead of rejecting the tool.

use crate::mcp::{ToolTransport, TransportConnector};
use crate::types::{JsonObject, RawParameters, RawTool, Result, ToolCatalog, ToolDescriptor};
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// Parameter schema of one raw tool.
///
/// Order: the direct `inputSchema` attribute when present, else the
/// `parameters` attribute, else `{}`. A present but non-object direct schema
/// yields `{}` without consulting `parameters`.
pub fn extract_schema(tool: &RawTool) -> JsonObject {
    if let Some(schema) = &tool.input_schema {
        return match schema {
            Value::Object(map) => map.clone(),
            other => {
                warn!(tool = %tool.name, kind = json_kind(other), "inputSchema is not an object; using empty schema");
                JsonObject::new()
            }
        };
    }

    match &tool.parameters {
        Some(RawParameters::Typed(schema)) => match schema.as_object() {
            Some(map) => map.clone(),
            None => {
                warn!(tool = %tool.name, "typed parameters schema is a boolean schema; using empty schema");
                JsonObject::new()
            }
        },
        Some(RawParameters::Json(Value::Object(map))) => map.clone(),
        Some(RawParameters::Json(other)) => {
            warn!(tool = %tool.name, kind = json_kind(other), "parameters is not a schema object; using empty schema");
            JsonObject::new()
        }
        None => {
            debug!(tool = %tool.name, "no parameter schema found");
            JsonObject::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    crate::bridge::validator::json_type_name(value)
}

/// Normalize raw tool records, keeping discovery order and duplicates
pub fn normalize(raw_tools: Vec<RawTool>) -> ToolCatalog {
    raw_tools
        .into_iter()
        .map(|tool| {
            let parameter_schema = extract_schema(&tool);
            ToolDescriptor {
                name: tool.name,
                description: tool.description.unwrap_or_default(),
                parameter_schema,
            }
        })
        .collect::<Vec<_>>()
        .into()
}

/// List and normalize the host's tools; a failed listing yields an empty catalog
pub async fn fetch_catalog(transport: &dyn ToolTransport) -> ToolCatalog {
    match transport.list_tools().await {
        Ok(raw_tools) => {
            let catalog = normalize(raw_tools);
            info!(count = catalog.len(), "Tool catalog fetched");
            catalog
        }
        Err(e) => {
            error!(error = %e, "Error listing MCP tools");
            ToolCatalog::default()
        }
    }
}

/// Open a connection, fetch the catalog and close again
pub async fn load(connector: &dyn TransportConnector) -> Result<ToolCatalog> {
    let mut transport = connector.connect().await?;
    let catalog = fetch_catalog(transport.as_ref()).await;
    transport.close().await;
    Ok(catalog)
}
