pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod providers;
pub mod session;


pub use config::*;
pub use error::*;
pub use pipeline::{DirectivePipeline, FallbackReason, Generation};
pub use providers::{ChatProvider, OllamaProvider};
pub use session::SessionStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_config_default() {
        let config = LLMConfig::default();
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.retry_temperature, 0.2);
        assert_eq!(config.max_attempts, 2);
        assert_eq!(config.max_history, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_llm_config_rejects_odd_history() {
        let config = LLMConfig {
            max_history: 7,
            ..LLMConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_llm_config_rejects_bad_url() {
        let config = LLMConfig {
            base_url: "localhost:11434".to_string(),
            ..LLMConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_message_role_wire_names() {
        let json = serde_json::to_value(Message::assistant("hi")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn test_retry_prompt_is_stricter() {
        let config = LLMConfig::default();
        let first = prompt::build_request(&[], "hello", 0, &config);
        let retry = prompt::build_request(&[], "hello", 1, &config);

        assert_eq!(first.temperature, 0.7);
        assert_eq!(retry.temperature, 0.2);
        assert!(!first.messages[0].content.contains(prompt::RETRY_NOTE));
        assert!(retry.messages[0].content.contains(prompt::RETRY_NOTE));
    }

    #[test]
    fn test_request_layout() {
        let config = LLMConfig::default();
        let history = vec![Message::user("a"), Message::assistant("b")];
        let request = prompt::build_request(&history, "c", 0, &config);

        let roles: Vec<MessageRole> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![MessageRole::System, MessageRole::User, MessageRole::Assistant, MessageRole::User]
        );
        assert_eq!(request.messages[3].content, "c");
    }
}
