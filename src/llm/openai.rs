use crate::llm::client::{LLMClient, ModelParams};
use crate::types::{AppError, Result};
use async_openai::{
    config::{AzureConfig, Config, OpenAIConfig},
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;

/// Chat completions client for OpenAI-compatible endpoints and Azure deployments
pub struct OpenAIClient<C: Config = OpenAIConfig> {
    client: Client<C>,
    model: String,
    temperature: f32,
}

fn http_client(params: &ModelParams) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(params.timeout)
        .build()
        .map_err(|e| AppError::LLM(format!("Failed to build HTTP client: {}", e)))
}

impl OpenAIClient<OpenAIConfig> {
    pub fn new(
        api_key: String,
        api_base: String,
        model: String,
        params: ModelParams,
    ) -> Result<Self> {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base.trim_end_matches('/'));

        Ok(Self {
            client: Client::with_config(config).with_http_client(http_client(&params)?),
            model,
            temperature: params.temperature,
        })
    }
}

impl OpenAIClient<AzureConfig> {
    /// Client for an Azure deployment; the deployment name doubles as the model name
    pub fn azure(
        api_key: String,
        endpoint: String,
        deployment: String,
        api_version: String,
        params: ModelParams,
    ) -> Result<Self> {
        let config = AzureConfig::new()
            .with_api_base(endpoint.trim_end_matches('/'))
            .with_api_key(api_key)
            .with_deployment_id(deployment.clone())
            .with_api_version(api_version);

        Ok(Self {
            client: Client::with_config(config).with_http_client(http_client(&params)?),
            model: deployment,
            temperature: params.temperature,
        })
    }
}

impl<C: Config> OpenAIClient<C> {
    async fn complete(&self, messages: Vec<ChatCompletionRequestMessage>) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| AppError::LLM(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::LLM(format!("OpenAI API error: {}", e)))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::LLM("No response from OpenAI".to_string()))
    }
}

#[async_trait]
impl<C: Config + Send + Sync> LLMClient for OpenAIClient<C> {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.complete(vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage::from(prompt.to_string()),
        )])
        .await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.complete(vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage::from(
                system.to_string(),
            )),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage::from(
                prompt.to_string(),
            )),
        ])
        .await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
