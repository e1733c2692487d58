//! Server configuration
//!
//! Layers, lowest precedence first: built-in defaults, an optional TOML file,
//! environment variables (after `.env` has been read), command-line flags.

use crate::error::ServerError;
use clap::Parser;
use nova_llm::LLMConfig;
use nova_spk::{EngineKind, SpeechConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Built front-end (`index.html` plus assets)
    pub static_dir: PathBuf,
    /// Largest accepted request body, bytes
    pub body_limit_bytes: usize,
    pub llm: LLMConfig,
    pub speech: SpeechConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: PathBuf::from("front/dist"),
            body_limit_bytes: DEFAULT_BODY_LIMIT,
            llm: LLMConfig::default(),
            speech: SpeechConfig::default(),
        }
    }
}

/// Command-line flags
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "nova-server", version, about = "N:OVA avatar server")]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory holding the built front-end
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Ollama base URL
    #[arg(long)]
    pub ollama_url: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    /// External TTS service root
    #[arg(long)]
    pub tts_url: Option<String>,

    /// Serve speech from the local tone generator instead of an external service
    #[arg(long)]
    pub tone: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ServerError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ServerError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Full layered load for the binary
    pub fn load(cli: &Cli) -> Result<Self, ServerError> {
        let mut config = match cli.config {
            Some(ref path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Overlay environment variables read through `lookup`. Empty values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(port) = var("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ServerError::Config(format!("PORT must be a port number, got '{}'", port)))?;
        }
        if let Some(url) = var("OLLAMA_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = var("OLLAMA_MODEL") {
            self.llm.model = model;
        }
        if let Some(url) = var("PY_TTS_URL") {
            self.speech.endpoint = Some(url);
        }
        if let Some(dir) = var("NOVA_STATIC_DIR") {
            self.static_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(ref host) = cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(ref dir) = cli.static_dir {
            self.static_dir = dir.clone();
        }
        if let Some(ref url) = cli.ollama_url {
            self.llm.base_url = url.clone();
        }
        if let Some(ref model) = cli.model {
            self.llm.model = model.clone();
        }
        if let Some(ref url) = cli.tts_url {
            self.speech.endpoint = Some(url.clone());
        }
        if cli.tone {
            self.speech.engine = EngineKind::Tone;
        }
    }

    pub fn validate(&self) -> Result<(), ServerError> {
        if self.host.trim().is_empty() {
            return Err(ServerError::Config("host cannot be empty".to_string()));
        }
        if self.body_limit_bytes == 0 {
            return Err(ServerError::Config("body_limit_bytes cannot be 0".to_string()));
        }
        self.llm.validate().map_err(ServerError::Config)?;
        self.speech.validate().map_err(ServerError::Config)?;
        Ok(())
    }
}
