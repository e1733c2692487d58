#[cfg(test)]
mod config_tests {
    use crate::config::{Cli, ServerConfig, DEFAULT_BODY_LIMIT};
    use clap::Parser;
    use nova_spk::EngineKind;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.static_dir, PathBuf::from("front/dist"));
        assert_eq!(config.body_limit_bytes, DEFAULT_BODY_LIMIT);
        assert_eq!(config.llm.base_url, "http://localhost:11434");
        assert_eq!(config.llm.model, "gpt-oss:20b");
        assert!(config.speech.endpoint.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_sections() {
        let config = ServerConfig::from_toml_str(
            r#"
            port = 8080

            [llm]
            model = "llama3"
            max_history = 4

            [speech]
            engine = "tone"
            sample_rate = 16000
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.llm.max_history, 4);
        assert_eq!(config.llm.temperature, 0.7);
        assert_eq!(config.speech.engine, EngineKind::Tone);
        assert_eq!(config.speech.sample_rate, 16_000);
    }

    #[test]
    fn test_toml_rejects_wrong_types() {
        assert!(ServerConfig::from_toml_str("port = \"many\"").is_err());
    }

    #[test]
    fn test_env_overlay() {
        let mut config = ServerConfig::default();
        config
            .apply_env(env(&[
                ("PORT", "4000"),
                ("OLLAMA_BASE_URL", "http://ollama:11434"),
                ("OLLAMA_MODEL", "mistral"),
                ("PY_TTS_URL", "http://tts:5000"),
                ("NOVA_STATIC_DIR", "/srv/front"),
            ]))
            .unwrap();

        assert_eq!(config.port, 4000);
        assert_eq!(config.llm.base_url, "http://ollama:11434");
        assert_eq!(config.llm.model, "mistral");
        assert_eq!(config.speech.endpoint.as_deref(), Some("http://tts:5000"));
        assert_eq!(config.static_dir, PathBuf::from("/srv/front"));
    }

    #[test]
    fn test_empty_env_values_are_unset() {
        let mut config = ServerConfig::default();
        config.apply_env(env(&[("PY_TTS_URL", ""), ("PORT", "  ")])).unwrap();
        assert!(config.speech.endpoint.is_none());
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_bad_port_env() {
        let mut config = ServerConfig::default();
        assert!(config.apply_env(env(&[("PORT", "http")])).is_err());
    }

    #[test]
    fn test_cli_wins_over_env() {
        let mut config = ServerConfig::default();
        config.apply_env(env(&[("PORT", "4000"), ("OLLAMA_MODEL", "mistral")])).unwrap();

        let cli = Cli::try_parse_from(["nova-server", "--port", "5000", "--tone"]).unwrap();
        config.apply_cli(&cli);

        assert_eq!(config.port, 5000);
        assert_eq!(config.llm.model, "mistral");
        assert_eq!(config.speech.engine, EngineKind::Tone);
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_validate_delegates_to_sections() {
        let mut config = ServerConfig::default();
        config.speech.endpoint = Some("tts:5000".to_string());
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.llm.max_history = 3;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.body_limit_bytes = 0;
        assert!(config.validate().is_err());
    }
}
