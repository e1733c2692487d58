//! Error types for nova-sc

use nova_core::Error as CoreError;
use thiserror::Error;

/// Audio decoding and analysis errors
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Audio format error: {0}")]
    Format(String),

    #[error("WAV decode error: {0}")]
    Decode(#[from] hound::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<AudioError> for CoreError {
    fn from(err: AudioError) -> Self {
        CoreError::Audio(format!("Audio error: {}", err))
    }
}
