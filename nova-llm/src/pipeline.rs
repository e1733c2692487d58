//! Directive generation: user text in, validated directive out, never an error.

use crate::config::{LLMConfig, Message};
use crate::error::{LLMError, Result};
use crate::prompt;
use crate::providers::ChatProvider;
use crate::session::SessionStore;
use nova_core::{Directive, DirectiveError};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Why the fallback directive was returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The model service was unreachable or answered with a non-success status
    RequestFailed,
    /// Every attempt produced unparsable or schema-invalid output
    InvalidOutput,
}

/// Result of one `generate` call
#[derive(Debug, Clone)]
pub struct Generation {
    pub directive: Directive,
    /// `Some` when `directive` is the fixed fallback
    pub fallback: Option<FallbackReason>,
    /// Model requests sent for this call
    pub attempts: u32,
}

impl Generation {
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

pub struct DirectivePipeline {
    provider: Arc<dyn ChatProvider>,
    sessions: Arc<SessionStore>,
    config: Arc<LLMConfig>,
}

impl DirectivePipeline {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        sessions: Arc<SessionStore>,
        config: LLMConfig,
    ) -> Result<Self> {
        config.validate().map_err(LLMError::Config)?;
        Ok(Self {
            provider,
            sessions,
            config: Arc::new(config),
        })
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Generate a directive for `user_text`, recording the exchange in the session.
    ///
    /// Upstream and malformed-output failures are absorbed here; the caller always
    /// receives a valid directive and learns about fallbacks through
    /// [`Generation::fallback`].
    pub async fn generate(&self, user_text: &str, session_id: &str) -> Generation {
        let history = self.sessions.get(session_id);
        let (outcome, attempts) = self.run_attempts(user_text, &history).await;

        let generation = match outcome {
            Ok(directive) => Generation {
                directive,
                fallback: None,
                attempts,
            },
            Err(reason) => {
                warn!(
                    "Session {}: using fallback directive after {} attempt(s) ({:?})",
                    session_id, attempts, reason
                );
                Generation {
                    directive: Directive::fallback(),
                    fallback: Some(reason),
                    attempts,
                }
            }
        };

        self.sessions
            .record_exchange(session_id, user_text, &generation.directive.spoken_text);
        generation
    }

    async fn run_attempts(
        &self,
        user_text: &str,
        history: &[Message],
    ) -> (std::result::Result<Directive, FallbackReason>, u32) {
        let mut attempts = 0;

        while attempts < self.config.max_attempts {
            let attempt = attempts;
            attempts += 1;

            let request = prompt::build_request(history, user_text, attempt, &self.config);
            let raw = match self.provider.chat(request).await {
                Ok(response) => response.content,
                Err(e) => {
                    warn!("{} request failed on attempt {}: {}", self.provider.name(), attempt, e);
                    return (Err(FallbackReason::RequestFailed), attempts);
                }
            };

            match parse_candidate(&raw) {
                Ok(directive) => {
                    if attempt > 0 {
                        info!("Directive recovered on retry {}", attempt);
                    }
                    return (Ok(directive), attempts);
                }
                Err(e) => {
                    let kind = if e.is_parse() { "parse" } else { "validation" };
                    warn!("Attempt {} produced an unusable directive ({}): {}", attempt, kind, e);
                    debug!("Raw model output: {}", raw);
                }
            }
        }

        (Err(FallbackReason::InvalidOutput), attempts)
    }
}

/// Slice from the first `{` to the last `}`, ignoring any prose around the object
pub fn extract_json(text: &str) -> Option<&str> {
    let first = text.find('{')?;
    let last = text.rfind('}')?;
    if last <= first {
        return None;
    }
    Some(&text[first..=last])
}

/// Brace-bound the raw reply (falling back to the whole text) then parse and validate
pub fn parse_candidate(raw: &str) -> std::result::Result<Directive, DirectiveError> {
    let candidate = extract_json(raw).unwrap_or(raw);
    Directive::from_json_str(candidate)
}
