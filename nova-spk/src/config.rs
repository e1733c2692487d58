//! Configuration for speech synthesis

use serde::{Deserialize, Serialize};

/// Speech synthesis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Which engine serves requests
    pub engine: EngineKind,

    /// Root URL of the external TTS service (`{endpoint}/api/tts`).
    /// Without it the HTTP engine is not built and every request gets placeholder audio.
    pub endpoint: Option<String>,

    /// Per-request timeout for the external service
    pub timeout_secs: u64,

    /// Sample rate of locally generated audio (tone and placeholder)
    pub sample_rate: u32,

    /// Longest accepted text, in bytes
    pub max_text_length: usize,
}

/// TTS engine selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// External HTTP service at `endpoint`
    #[default]
    Http,
    /// Local sine stub
    Tone,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::Http,
            endpoint: None,
            timeout_secs: 30,
            sample_rate: 22_050,
            max_text_length: 100_000,
        }
    }
}

impl SpeechConfig {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref endpoint) = self.endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(format!("TTS endpoint must be an http(s) URL, got '{}'", endpoint));
            }
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs cannot be 0".to_string());
        }
        if !(8_000..=96_000).contains(&self.sample_rate) {
            return Err(format!("sample_rate must be 8000-96000 Hz, got {}", self.sample_rate));
        }
        if self.max_text_length == 0 {
            return Err("max_text_length cannot be 0".to_string());
        }
        Ok(())
    }
}

/// One synthesis request, matching the `/api/tts` body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub pitch: Option<f64>,
}

impl SpeechRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Carry over the voice hints of a directive
    pub fn with_hints(mut self, hints: &nova_core::TtsHints) -> Self {
        self.voice = hints.voice.clone();
        self.speed = hints.speed;
        self.pitch = hints.pitch;
        self
    }
}
