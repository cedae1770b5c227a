//! Config file loading tests.

use std::io::Write;
use tempfile::NamedTempFile;
use toolbridge::mcp::McpTarget;
use toolbridge::utils::config::{LlmProviderKind, McpTransportKind};
use toolbridge::{AppError, BridgeConfig};

#[test]
fn test_load_explicit_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
log_level = "debug"

[llm]
provider = "openai"
api_base = "http://localhost:4000/v1"
temperature = 0.0

[mcp]
transport = "stdio"
command = "toolbridge"
args = ["serve"]
timeout_secs = 10

[search]
base_url = "http://localhost:9000"
"#
    )
    .unwrap();

    let config = BridgeConfig::load(Some(file.path())).unwrap();

    assert_eq!(config.llm.provider, LlmProviderKind::OpenAI);
    assert_eq!(config.llm.api_base, "http://localhost:4000/v1");
    assert_eq!(config.llm.temperature, 0.0);
    assert_eq!(config.search.base_url, "http://localhost:9000");
    assert_eq!(config.mcp.timeout_secs, 10);

    // An override of the MCP URL would switch the transport back to HTTP
    if std::env::var("TOOLBRIDGE_MCP_URL").is_err() {
        assert_eq!(config.mcp.transport, McpTransportKind::Stdio);
        assert_eq!(
            config.mcp.target().unwrap(),
            McpTarget::Stdio {
                command: "toolbridge".to_string(),
                args: vec!["serve".to_string()],
            }
        );
    }
}

#[test]
fn test_missing_explicit_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    let err = BridgeConfig::load(Some(&missing)).unwrap_err();

    assert!(matches!(err, AppError::Config(_)));
    assert!(err.to_string().contains("Config file not found"));
}

#[test]
fn test_unknown_provider_is_rejected() {
    let err = BridgeConfig::from_toml_str("[llm]\nprovider = \"bard\"\n").unwrap_err();
    assert!(err.to_string().contains("Invalid config"));
}
