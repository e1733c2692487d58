use serde::{Deserialize, Serialize};

/// Language-model and pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    /// Ollama-compatible chat endpoint root
    pub base_url: String,
    pub model: String,
    /// Decoding temperature of the first attempt
    pub temperature: f32,
    /// Decoding temperature of every retry
    pub retry_temperature: f32,
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Turns retained per session (even, so user/assistant pairs stay together)
    pub max_history: usize,
    pub timeout_secs: u64,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "gpt-oss:20b".to_string(),
            temperature: 0.7,
            retry_temperature: 0.2,
            max_attempts: 2,
            max_history: 8,
            timeout_secs: 120,
        }
    }
}

impl LLMConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(format!("base_url must be an http(s) URL, got '{}'", self.base_url));
        }
        if self.model.trim().is_empty() {
            return Err("model cannot be empty".to_string());
        }
        for (name, value) in [
            ("temperature", self.temperature),
            ("retry_temperature", self.retry_temperature),
        ] {
            if !value.is_finite() || !(0.0..=2.0).contains(&value) {
                return Err(format!("{} must be between 0.0 and 2.0", name));
            }
        }
        if !(1..=5).contains(&self.max_attempts) {
            return Err("max_attempts must be between 1 and 5".to_string());
        }
        if self.max_history < 2 || self.max_history % 2 != 0 {
            return Err("max_history must be an even number >= 2".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs cannot be 0".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: MessageRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: MessageRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: MessageRole::Assistant, content: content.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
    pub model: String,
}
