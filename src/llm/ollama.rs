use crate::llm::client::{LLMClient, ModelParams};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use ollama_rs::{
    generation::chat::{request::ChatMessageRequest, ChatMessage},
    models::ModelOptions,
    Ollama,
};
use std::time::Duration;

pub struct OllamaClient {
    client: Ollama,
    model: String,
    temperature: f32,
    timeout: Duration,
}

/// Split `http://host:port` into (`http://host`, port), defaulting to 11434.
fn split_host_port(base_url: &str) -> (String, u16) {
    let (scheme, rest) = base_url
        .split_once("://")
        .unwrap_or(("http", base_url));
    let rest = rest.trim_end_matches('/');
    match rest.rsplit_once(':') {
        Some((host, port)) => (
            format!("{}://{}", scheme, host),
            port.parse().unwrap_or(11434),
        ),
        None => (format!("{}://{}", scheme, rest), 11434),
    }
}

impl OllamaClient {
    pub fn new(base_url: String, model: String, params: ModelParams) -> Result<Self> {
        let (host, port) = split_host_port(&base_url);

        Ok(Self {
            client: Ollama::new(host, port),
            model,
            temperature: params.temperature,
            timeout: params.timeout,
        })
    }

    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let request = ChatMessageRequest::new(self.model.clone(), messages)
            .options(ModelOptions::default().temperature(self.temperature));

        let response = tokio::time::timeout(self.timeout, self.client.send_chat_messages(request))
            .await
            .map_err(|_| AppError::LLM(format!("Ollama request timed out after {:?}", self.timeout)))?
            .map_err(|e| AppError::LLM(format!("Ollama error: {}", e)))?;

        Ok(response.message.content)
    }
}

#[async_trait]
impl LLMClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.chat(vec![ChatMessage::user(prompt.to_string())]).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.chat(vec![
            ChatMessage::system(system.to_string()),
            ChatMessage::user(prompt.to_string()),
        ])
        .await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_parsing_full() {
        assert_eq!(
            split_host_port("http://localhost:11434"),
            ("http://localhost".to_string(), 11434)
        );
    }

    #[test]
    fn test_url_parsing_no_port() {
        assert_eq!(
            split_host_port("http://localhost"),
            ("http://localhost".to_string(), 11434)
        );
    }

    #[test]
    fn test_url_parsing_custom_port() {
        assert_eq!(
            split_host_port("http://192.168.1.100:8080/"),
            ("http://192.168.1.100".to_string(), 8080)
        );
    }
}
