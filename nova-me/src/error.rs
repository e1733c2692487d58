//! Error types for nova-me

use nova_core::Error as CoreError;
use thiserror::Error;

/// Avatar controller errors
#[derive(Error, Debug)]
pub enum AvatarError {
    #[error("Model load failed: {0}")]
    Load(String),

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<AvatarError> for CoreError {
    fn from(err: AvatarError) -> Self {
        CoreError::Driver(format!("Avatar error: {}", err))
    }
}
