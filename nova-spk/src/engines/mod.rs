//! TTS engine implementations

pub mod http;
pub mod tone;

use crate::config::SpeechRequest;
use crate::error::SpeechError;
use async_trait::async_trait;
use bytes::Bytes;

/// Trait for TTS engines
#[async_trait]
pub trait TtsEngine: Send + Sync {
    /// Synthesize the request into encoded audio bytes
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Bytes, SpeechError>;

    /// Check if engine is available
    fn is_available(&self) -> bool;

    /// Get engine name
    fn name(&self) -> &str;
}
