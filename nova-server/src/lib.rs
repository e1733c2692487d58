pub mod config;
pub mod error;
pub mod http;
pub mod static_files;

#[cfg(test)]
mod config_tests;

pub use config::{Cli, ServerConfig};
pub use error::ServerError;
pub use http::{create_router, ApiState, ChatResponse};
