use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Directive error: {0}")]
    Directive(#[from] crate::directive::DirectiveError),

    #[error("Upstream service error: {0}")]
    Upstream(String),

    #[error("Render driver error: {0}")]
    Driver(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
