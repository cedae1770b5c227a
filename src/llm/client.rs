//! LLM Client abstractions and provider management
//!
//! The bridge only ever asks the model for a single completion given a system
//! instruction block and a user content block, so the client surface is kept
//! to exactly that:
//! - **OpenAI**: chat completions against api.openai.com or any compatible endpoint
//! - **Azure OpenAI**: chat completions against an Azure deployment
//! - **Ollama**: local inference (behind the `ollama` feature)

use crate::types::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error};

/// Generic LLM client trait for provider abstraction
///
/// All LLM providers implement this trait, allowing for easy swapping
/// between providers without changing the bridge.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate with system prompt
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Sampling and transport parameters shared by every provider
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParams {
    /// Kept low so the same query and catalog select the same tool
    pub temperature: f32,
    /// Upper bound on a single completion request
    pub timeout: Duration,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Provider enum for runtime selection
#[derive(Debug, Clone)]
pub enum Provider {
    /// OpenAI API provider (including compatible APIs)
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::OpenAI {
    ///     api_key: "sk-...".to_string(),
    ///     api_base: "https://api.openai.com/v1".to_string(),
    ///     model: "gpt-4.1-mini".to_string(),
    ///     params: ModelParams::default(),
    /// };
    /// ```
    OpenAI {
        api_key: String,
        api_base: String,
        model: String,
        params: ModelParams,
    },

    /// Azure OpenAI deployment
    ///
    /// Requests go to `{endpoint}/openai/deployments/{deployment}/chat/completions`.
    AzureOpenAI {
        api_key: String,
        endpoint: String,
        deployment: String,
        api_version: String,
        params: ModelParams,
    },

    /// Ollama local LLM provider
    #[cfg(feature = "ollama")]
    Ollama {
        base_url: String,
        model: String,
        params: ModelParams,
    },
}

impl Provider {
    /// Create a client instance for this provider
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn create_client(&self) -> Result<Box<dyn LLMClient>> {
        match self {
            Provider::OpenAI {
                api_key,
                api_base,
                model,
                params,
            } => Ok(Box::new(super::openai::OpenAIClient::new(
                api_key.clone(),
                api_base.clone(),
                model.clone(),
                params.clone(),
            )?)),

            Provider::AzureOpenAI {
                api_key,
                endpoint,
                deployment,
                api_version,
                params,
            } => Ok(Box::new(super::openai::OpenAIClient::azure(
                api_key.clone(),
                endpoint.clone(),
                deployment.clone(),
                api_version.clone(),
                params.clone(),
            )?)),

            #[cfg(feature = "ollama")]
            Provider::Ollama {
                base_url,
                model,
                params,
            } => Ok(Box::new(super::ollama::OllamaClient::new(
                base_url.clone(),
                model.clone(),
                params.clone(),
            )?)),
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "OpenAI",
            Provider::AzureOpenAI { .. } => "Azure OpenAI",
            #[cfg(feature = "ollama")]
            Provider::Ollama { .. } => "Ollama",
        }
    }
}

/// Ask the model for a completion, folding any failure into the returned text.
///
/// Callers that parse the answer (tool selection) see the error text as an
/// unparseable reply; callers that show it (narration) pass it straight on.
pub async fn ask(llm: &dyn LLMClient, system: &str, prompt: &str) -> String {
    match llm.generate_with_system(system, prompt).await {
        Ok(text) => {
            debug!(model = llm.model_name(), chars = text.len(), "LLM completion received");
            text
        }
        Err(e) => {
            error!(model = llm.model_name(), error = %e, "LLM completion failed");
            format!("Error: Could not contact the language model - {}", e)
        }
    }
}
