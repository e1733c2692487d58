use nova_llm::LLMError;
use nova_spk::SpeechError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Llm(#[from] LLMError),

    #[error(transparent)]
    Speech(#[from] SpeechError),
}

impl From<ServerError> for nova_core::Error {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::Llm(err) => err.into(),
            ServerError::Speech(err) => err.into(),
            other => nova_core::Error::Configuration(other.to_string()),
        }
    }
}
