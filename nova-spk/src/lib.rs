//! nova-spk: speech audio for the avatar
//!
//! Provides text-to-speech with:
//! - An HTTP engine for an external TTS service
//! - A local tone engine producing a deterministic test signal
//! - A silent placeholder WAV whenever no engine is configured or the engine fails

pub mod config;
pub mod engines;
pub mod error;
pub mod placeholder;
pub mod synthesizer;


pub use config::{EngineKind, SpeechConfig, SpeechRequest};
pub use engines::http::HttpTtsEngine;
pub use engines::tone::ToneTtsEngine;
pub use engines::TtsEngine;
pub use error::SpeechError;
pub use placeholder::{placeholder_duration, placeholder_wav};
pub use synthesizer::{SpeechAudio, SpeechSynthesizer, WAV_CONTENT_TYPE};
