use async_trait::async_trait;
use crate::config::*;
use crate::error::{LLMError, Result};
use crate::providers::trait_impl::ChatProvider;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

const MAX_ERROR_BODY: usize = 500;

/// Ollama `/api/chat` client, non-streaming with JSON output mode
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(config: &LLMConfig) -> Result<Self> {
        config.validate().map_err(LLMError::Config)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let body = json!({
            "model": self.model,
            "messages": request.messages,
            "stream": false,
            "format": "json",
            "options": { "temperature": request.temperature },
        });

        let url = format!("{}/api/chat", self.base_url);
        tracing::debug!(
            "Sending {} messages to {} (temperature {})",
            request.messages.len(),
            url,
            request.temperature
        );

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text: String = text.chars().take(MAX_ERROR_BODY).collect();
            return Err(LLMError::Provider(format!("Ollama error {}: {}", status, text)));
        }

        let json: serde_json::Value = response.json().await?;
        let content = json
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .unwrap_or("")
            .to_string();

        Ok(ChatResponse {
            content,
            model: json["model"].as_str().unwrap_or(&self.model).to_string(),
        })
    }
}
