//! Engine backed by an external TTS service

use crate::config::SpeechRequest;
use crate::engines::TtsEngine;
use crate::error::SpeechError;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const MAX_ERROR_BODY: usize = 500;

/// POSTs `{text, voice, speed, pitch}` to `{endpoint}/api/tts` and returns the body as audio
pub struct HttpTtsEngine {
    client: Client,
    endpoint: String,
}

impl HttpTtsEngine {
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self, SpeechError> {
        let endpoint = endpoint.trim().trim_end_matches('/');
        if endpoint.is_empty() {
            return Err(SpeechError::Config("TTS endpoint cannot be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SpeechError::Engine(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TtsEngine for HttpTtsEngine {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Bytes, SpeechError> {
        let url = format!("{}/api/tts", self.endpoint);
        let body = json!({
            "text": request.text,
            "voice": request.voice,
            "speed": request.speed,
            "pitch": request.pitch,
        });

        debug!("Requesting {} chars of speech from {}", request.text.chars().count(), url);
        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text: String = text.chars().take(MAX_ERROR_BODY).collect();
            return Err(SpeechError::Api(format!("TTS error {}: {}", status, text)));
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(SpeechError::Api("TTS service returned no audio".to_string()));
        }
        Ok(audio)
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "http"
    }
}
