//! Ollama client contract tests
//!
//! Verify the request body sent to `/api/chat` and how replies and error
//! statuses are mapped, against a local mock server.

use nova_core::FALLBACK_SPOKEN_TEXT;
use nova_llm::{
    ChatProvider, ChatRequest, DirectivePipeline, FallbackReason, LLMConfig, LLMError, Message,
    OllamaProvider, SessionStore,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VALID: &str = r#"{"spokenText":"Hi there!","emotion":"happy","intensity":0.8,"gesture":{"motion":null,"priority":"idle"},"expression":null,"microTimeline":[],"tts":{"voice":null,"speed":1.1,"pitch":null}}"#;

fn config_for(server: &MockServer) -> LLMConfig {
    LLMConfig {
        base_url: server.uri(),
        model: "test-model".to_string(),
        timeout_secs: 5,
        ..LLMConfig::default()
    }
}

fn ollama_reply(content: &str) -> serde_json::Value {
    json!({
        "model": "test-model",
        "created_at": "2024-01-01T00:00:00Z",
        "message": {"role": "assistant", "content": content},
        "done": true
    })
}

#[tokio::test]
async fn test_request_body_layout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "stream": false,
            "format": "json",
            "options": {"temperature": 0.7},
            "messages": [{"role": "user", "content": "Hello"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ollama_reply("{}")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OllamaProvider::new(&config_for(&mock_server)).unwrap();
    let request = ChatRequest {
        messages: vec![Message::user("Hello")],
        temperature: 0.7,
    };

    let response = provider.chat(request).await.unwrap();
    assert_eq!(response.content, "{}");
    assert_eq!(response.model, "test-model");
}

#[tokio::test]
async fn test_missing_content_reads_as_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": true})))
        .mount(&mock_server)
        .await;

    let provider = OllamaProvider::new(&config_for(&mock_server)).unwrap();
    let request = ChatRequest {
        messages: vec![Message::user("Hello")],
        temperature: 0.7,
    };

    let response = provider.chat(request).await.unwrap();
    assert_eq!(response.content, "");
    assert_eq!(response.model, "test-model");
}

#[tokio::test]
async fn test_error_status_maps_to_provider_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&mock_server)
        .await;

    let provider = OllamaProvider::new(&config_for(&mock_server)).unwrap();
    let request = ChatRequest {
        messages: vec![Message::user("Hello")],
        temperature: 0.7,
    };

    match provider.chat(request).await {
        Err(LLMError::Provider(message)) => {
            assert!(message.contains("500"));
            assert!(message.contains("model not loaded"));
        }
        other => panic!("expected provider error, got {:?}", other.map(|r| r.content)),
    }
}

#[tokio::test]
async fn test_pipeline_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ollama_reply(VALID)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server);
    let provider = Arc::new(OllamaProvider::new(&config).unwrap());
    let sessions = Arc::new(SessionStore::new(config.max_history));
    let pipeline = DirectivePipeline::new(provider, sessions.clone(), config).unwrap();

    let generation = pipeline.generate("hello", "abc").await;
    assert!(!generation.is_fallback());
    assert_eq!(generation.directive.spoken_text, "Hi there!");
    assert_eq!(generation.directive.tts.speed, Some(1.1));
    assert_eq!(sessions.len("abc"), 2);
}

#[tokio::test]
async fn test_pipeline_falls_back_when_service_down() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server);
    let provider = Arc::new(OllamaProvider::new(&config).unwrap());
    let sessions = Arc::new(SessionStore::new(config.max_history));
    let pipeline = DirectivePipeline::new(provider, sessions.clone(), config).unwrap();

    let generation = pipeline.generate("hello", "abc").await;
    assert_eq!(generation.fallback, Some(FallbackReason::RequestFailed));
    assert_eq!(generation.directive.spoken_text, FALLBACK_SPOKEN_TEXT);
}
