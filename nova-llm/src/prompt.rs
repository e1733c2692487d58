//! Prompt framing for directive generation

use crate::config::{ChatRequest, LLMConfig, Message};

pub const SYSTEM_PROMPT: &str = r#"You are N:OVA, a friendly virtual avatar.
Respond ONLY with a single JSON object that matches the AvatarDirective schema.
Do not include markdown, code fences, or any extra text.

AvatarDirective schema:
{
  spokenText: string,
  emotion: "neutral"|"happy"|"sad"|"angry"|"shy"|"excited"|"tired"|"surprised",
  intensity: number (0.0-1.0),
  gesture: { motion: string|null, priority: "idle"|"normal"|"force" },
  expression: string|null,
  microTimeline: [
    { t: number, params: [ { id: string, value: number, fade: number } ] }
  ],
  tts: { voice: string|null, speed: number|null, pitch: number|null }
}
"#;

/// Appended to the system instruction on every retry
pub const RETRY_NOTE: &str = "JSON only. Ensure every field exists and types are correct.";

pub fn system_instruction(attempt: u32) -> String {
    if attempt == 0 {
        SYSTEM_PROMPT.to_string()
    } else {
        format!("{}\n{}", SYSTEM_PROMPT, RETRY_NOTE)
    }
}

pub fn temperature_for(attempt: u32, config: &LLMConfig) -> f32 {
    if attempt == 0 {
        config.temperature
    } else {
        config.retry_temperature
    }
}

/// System instruction, then history, then the new user turn
pub fn build_request(
    history: &[Message],
    user_text: &str,
    attempt: u32,
    config: &LLMConfig,
) -> ChatRequest {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(system_instruction(attempt)));
    messages.extend(history.iter().cloned());
    messages.push(Message::user(user_text));

    ChatRequest {
        messages,
        temperature: temperature_for(attempt, config),
    }
}
