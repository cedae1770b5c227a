//! Configuration for toolbridge
//!
//! Loaded once at startup from an optional `toolbridge.toml`, then adjusted by
//! environment variables (a `.env` file is honoured). Secrets never live in
//! the file: it only names the environment variables that hold them.

use crate::llm::{ModelParams, Provider};
use crate::mcp::McpTarget;
use crate::tools::TavilyClient;
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "toolbridge.toml";

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BridgeConfig {
    pub log_level: String,
    pub llm: LlmConfig,
    pub mcp: McpConfig,
    pub search: SearchConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            llm: LlmConfig::default(),
            mcp: McpConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

// ============= LLM Configuration =============

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderKind {
    #[default]
    OpenAI,
    Azure,
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProviderKind,
    /// Model name (OpenAI, Ollama) or deployment name (Azure)
    pub model: String,
    /// Base URL for OpenAI-compatible APIs
    pub api_base: String,
    /// Environment variable holding the OpenAI API key
    pub api_key_env: String,
    /// Environment variable holding the Azure endpoint URL
    pub azure_endpoint_env: String,
    /// Environment variable holding the Azure API key
    pub azure_api_key_env: String,
    pub azure_api_version: String,
    pub ollama_url: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderKind::OpenAI,
            model: "gpt-4.1-mini".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            azure_endpoint_env: "AZURE_OPENAI_ENDPOINT".to_string(),
            azure_api_key_env: "AZURE_OPENAI_API_KEY".to_string(),
            azure_api_version: "2025-01-01-preview".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            temperature: 0.2,
            timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    pub fn params(&self) -> ModelParams {
        ModelParams {
            temperature: self.temperature,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    /// Build the provider, reading secrets through `lookup`
    pub fn provider_with<F>(&self, lookup: F) -> Result<Provider>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| {
                    AppError::Config(format!("{} environment variable is required", name))
                })
        };

        match self.provider {
            LlmProviderKind::OpenAI => Ok(Provider::OpenAI {
                api_key: require(&self.api_key_env)?,
                api_base: self.api_base.clone(),
                model: self.model.clone(),
                params: self.params(),
            }),
            LlmProviderKind::Azure => Ok(Provider::AzureOpenAI {
                api_key: require(&self.azure_api_key_env)?,
                endpoint: require(&self.azure_endpoint_env)?,
                deployment: self.model.clone(),
                api_version: self.azure_api_version.clone(),
                params: self.params(),
            }),
            #[cfg(feature = "ollama")]
            LlmProviderKind::Ollama => Ok(Provider::Ollama {
                base_url: self.ollama_url.clone(),
                model: self.model.clone(),
                params: self.params(),
            }),
            #[cfg(not(feature = "ollama"))]
            LlmProviderKind::Ollama => Err(AppError::Config(
                "Ollama provider requires building with the `ollama` feature".to_string(),
            )),
        }
    }

    /// Build the provider from the process environment
    pub fn provider(&self) -> Result<Provider> {
        self.provider_with(|name| std::env::var(name).ok())
    }
}

// ============= MCP Configuration =============

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum McpTransportKind {
    #[default]
    Http,
    Stdio,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct McpConfig {
    pub transport: McpTransportKind,
    /// Streamable HTTP endpoint of the tool host
    pub url: String,
    /// Command spawned for the stdio transport
    pub command: Option<String>,
    pub args: Vec<String>,
    /// Bound on connect, list and call operations
    pub timeout_secs: u64,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            transport: McpTransportKind::Http,
            url: "http://127.0.0.1:8080/mcp".to_string(),
            command: None,
            args: Vec::new(),
            timeout_secs: 30,
        }
    }
}

impl McpConfig {
    pub fn target(&self) -> Result<McpTarget> {
        match self.transport {
            McpTransportKind::Http => Ok(McpTarget::Http {
                url: self.url.clone(),
            }),
            McpTransportKind::Stdio => {
                let command = self.command.clone().ok_or_else(|| {
                    AppError::Config("mcp.command is required for the stdio transport".to_string())
                })?;
                Ok(McpTarget::Stdio {
                    command,
                    args: self.args.clone(),
                })
            }
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============= Search Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Environment variable holding the Tavily API key
    pub api_key_env: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key_env: "TAVILY_API_KEY".to_string(),
            base_url: crate::tools::search::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl SearchConfig {
    pub fn api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AppError::Config(format!("{} environment variable is required", self.api_key_env))
            })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn client(&self) -> Result<TavilyClient> {
        TavilyClient::with_base_url(self.api_key()?, self.base_url.clone(), self.timeout())
    }
}

// ============= Loading =============

impl BridgeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(format!("Invalid config: {}", e)))
    }

    /// Read `path` (or `toolbridge.toml` when `None`) and apply environment overrides.
    ///
    /// A missing default file means defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let (path, explicit) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                AppError::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;
            debug!(path = %path.display(), "Loaded config file");
            Self::from_toml_str(&content)?
        } else if explicit {
            return Err(AppError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        } else {
            Self::default()
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Apply `TOOLBRIDGE_*` overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("TOOLBRIDGE_MODEL") {
            self.llm.model = model;
        }
        if let Some(url) = lookup("TOOLBRIDGE_MCP_URL") {
            self.mcp.transport = McpTransportKind::Http;
            self.mcp.url = url;
        }
        if let Some(level) = lookup("TOOLBRIDGE_LOG_LEVEL") {
            self.log_level = level;
        }
    }
}
