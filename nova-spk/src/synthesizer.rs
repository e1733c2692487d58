//! Speech synthesizer with silent-placeholder fallback

use crate::config::{EngineKind, SpeechConfig, SpeechRequest};
use crate::engines::http::HttpTtsEngine;
use crate::engines::tone::ToneTtsEngine;
use crate::engines::TtsEngine;
use crate::error::SpeechError;
use crate::placeholder::placeholder_wav;
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const WAV_CONTENT_TYPE: &str = "audio/wav";

/// Encoded audio ready to hand to a player
#[derive(Debug, Clone)]
pub struct SpeechAudio {
    pub bytes: Bytes,
    pub content_type: &'static str,
    /// True when `bytes` is the silent substitute rather than engine output
    pub placeholder: bool,
}

pub struct SpeechSynthesizer {
    config: Arc<SpeechConfig>,
    engine: Option<Arc<dyn TtsEngine>>,
}

impl SpeechSynthesizer {
    /// Build the engine named by the configuration.
    ///
    /// The HTTP engine needs an endpoint; without one the synthesizer still works
    /// and answers every request with placeholder audio.
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Config)?;

        let engine: Option<Arc<dyn TtsEngine>> = match (config.engine, config.endpoint.as_deref()) {
            (EngineKind::Http, Some(endpoint)) => {
                Some(Arc::new(HttpTtsEngine::new(endpoint, config.timeout_secs)?))
            }
            (EngineKind::Http, None) => None,
            (EngineKind::Tone, _) => Some(Arc::new(ToneTtsEngine::new(config.sample_rate))),
        };

        match engine {
            Some(ref engine) => info!("Speech synthesis using '{}' engine", engine.name()),
            None => info!("No TTS endpoint configured, speech will use placeholder audio"),
        }

        Ok(Self {
            config: Arc::new(config),
            engine,
        })
    }

    /// Use a caller-supplied engine
    pub fn with_engine(config: SpeechConfig, engine: Arc<dyn TtsEngine>) -> Result<Self, SpeechError> {
        config.validate().map_err(SpeechError::Config)?;
        Ok(Self {
            config: Arc::new(config),
            engine: Some(engine),
        })
    }

    pub fn engine_name(&self) -> Option<&str> {
        self.engine.as_ref().map(|engine| engine.name())
    }

    pub fn config(&self) -> &SpeechConfig {
        &self.config
    }

    /// Synthesize speech, substituting placeholder audio when the engine is
    /// missing, unavailable or failing. Only invalid input is an error.
    pub async fn synthesize(&self, request: &SpeechRequest) -> Result<SpeechAudio, SpeechError> {
        self.check_input(&request.text)?;

        let engine = match self.engine {
            Some(ref engine) if engine.is_available() => engine,
            _ => return self.placeholder(&request.text),
        };

        match engine.synthesize(request).await {
            Ok(bytes) => {
                debug!("'{}' engine produced {} bytes", engine.name(), bytes.len());
                Ok(SpeechAudio {
                    bytes,
                    content_type: WAV_CONTENT_TYPE,
                    placeholder: false,
                })
            }
            Err(e) => {
                warn!("TTS engine '{}' failed, using placeholder audio: {}", engine.name(), e);
                self.placeholder(&request.text)
            }
        }
    }

    fn check_input(&self, text: &str) -> Result<(), SpeechError> {
        if text.is_empty() {
            return Err(SpeechError::InvalidInput("text is required".to_string()));
        }
        if text.len() > self.config.max_text_length {
            return Err(SpeechError::InvalidInput(format!(
                "text too long (max {} bytes)",
                self.config.max_text_length
            )));
        }
        Ok(())
    }

    fn placeholder(&self, text: &str) -> Result<SpeechAudio, SpeechError> {
        Ok(SpeechAudio {
            bytes: placeholder_wav(text, self.config.sample_rate)?,
            content_type: WAV_CONTENT_TYPE,
            placeholder: true,
        })
    }
}
