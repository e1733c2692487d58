//! Router tests: every route driven in-process with `oneshot`, upstream
//! services replaced by mock servers.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use nova_core::FALLBACK_SPOKEN_TEXT;
use nova_server::{create_router, ApiState, ServerConfig};
use serde_json::{json, Value};
use std::path::Path;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VALID: &str = r#"{"spokenText":"Nice to meet you!","emotion":"happy","intensity":0.6,"gesture":{"motion":"wave","priority":"normal"},"expression":null,"microTimeline":[],"tts":{"voice":null,"speed":null,"pitch":null}}"#;

fn config(ollama: Option<&MockServer>, tts: Option<&MockServer>, static_dir: &Path) -> ServerConfig {
    let mut config = ServerConfig::default();
    if let Some(server) = ollama {
        config.llm.base_url = server.uri();
    }
    config.llm.timeout_secs = 5;
    config.speech.endpoint = tts.map(|server| server.uri());
    config.speech.timeout_secs = 5;
    config.static_dir = static_dir.to_path_buf();
    config
}

fn app(config: &ServerConfig) -> Router {
    let state = ApiState::from_config(config).unwrap();
    create_router(state, &config.static_dir, config.body_limit_bytes)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::ACCEPT, "text/html")
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

async fn mount_ollama(server: &MockServer, status: u16, content: &str) {
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "model": "gpt-oss:20b",
            "message": {"role": "assistant", "content": content},
            "done": true
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(&config(None, None, dir.path()))
        .oneshot(get("/api/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"ok": true}));
}

#[tokio::test]
async fn test_chat_requires_user_text() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(None, None, dir.path());

    for body in [json!({}), json!({"userText": 42}), json!({"userText": ""})] {
        let response = app(&config).oneshot(post_json("/api/chat", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "userText is required"}));
    }
}

#[tokio::test]
async fn test_chat_returns_directive() {
    let ollama = MockServer::start().await;
    mount_ollama(&ollama, 200, VALID).await;
    let dir = tempfile::tempdir().unwrap();

    let response = app(&config(Some(&ollama), None, dir.path()))
        .oneshot(post_json("/api/chat", json!({"sessionId": "abc", "userText": "Hello"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["sessionId"], "abc");
    assert_eq!(body["directive"]["spokenText"], "Nice to meet you!");
    assert_eq!(body["directive"]["gesture"]["motion"], "wave");
    assert!(body.get("warning").is_none());
}

#[tokio::test]
async fn test_chat_generates_session_id() {
    let ollama = MockServer::start().await;
    mount_ollama(&ollama, 200, VALID).await;
    let dir = tempfile::tempdir().unwrap();
    let config = config(Some(&ollama), None, dir.path());

    for body in [json!({"userText": "Hello"}), json!({"userText": "Hello", "sessionId": 12})] {
        let response = app(&config).oneshot(post_json("/api/chat", body)).await.unwrap();
        let body = body_json(response).await;
        let id = body["sessionId"].as_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok(), "not a uuid: {}", id);
    }
}

#[tokio::test]
async fn test_chat_history_carries_across_requests() {
    let ollama = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "system"},
                {"role": "user", "content": "first"},
                {"role": "assistant", "content": "Nice to meet you!"},
                {"role": "user", "content": "second"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"role": "assistant", "content": VALID}
        })))
        .expect(1)
        .mount(&ollama)
        .await;
    mount_ollama(&ollama, 200, VALID).await;

    let dir = tempfile::tempdir().unwrap();
    let router = app(&config(Some(&ollama), None, dir.path()));

    let first = router
        .clone()
        .oneshot(post_json("/api/chat", json!({"sessionId": "s1", "userText": "first"})))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = router
        .oneshot(post_json("/api/chat", json!({"sessionId": "s1", "userText": "second"})))
        .await
        .unwrap();
    let body = body_json(second).await;
    assert!(body.get("warning").is_none());
}

#[tokio::test]
async fn test_chat_falls_back_when_model_is_down() {
    let ollama = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(503).set_body_string("loading"))
        .mount(&ollama)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let response = app(&config(Some(&ollama), None, dir.path()))
        .oneshot(post_json("/api/chat", json!({"userText": "Hello"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["warning"], "fallback");
    assert_eq!(body["directive"]["spokenText"], FALLBACK_SPOKEN_TEXT);
    assert_eq!(body["directive"]["emotion"], "neutral");
}

#[tokio::test]
async fn test_chat_falls_back_on_invalid_output() {
    let ollama = MockServer::start().await;
    mount_ollama(&ollama, 200, "I am not JSON at all").await;
    let dir = tempfile::tempdir().unwrap();

    let response = app(&config(Some(&ollama), None, dir.path()))
        .oneshot(post_json("/api/chat", json!({"userText": "Hello"})))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["warning"], "fallback");
    assert_eq!(body["directive"]["spokenText"], FALLBACK_SPOKEN_TEXT);
}

#[tokio::test]
async fn test_tts_requires_text() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(None, None, dir.path());

    for body in [json!({}), json!({"text": 1}), json!({"text": ""})] {
        let response = app(&config).oneshot(post_json("/api/tts", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "text is required"}));
    }
}

#[tokio::test]
async fn test_tts_placeholder_without_service() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(&config(None, None, dir.path()))
        .oneshot(post_json("/api/tts", json!({"text": "hello"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/wav");
    let wav = body_bytes(response).await;
    assert_eq!(&wav[..4], b"RIFF");
    assert_eq!(&wav[8..12], b"WAVE");
    // one second of 16-bit mono silence at 22050 Hz
    assert!(wav.len() >= 44_100);
    assert!(wav[44..].iter().all(|b| *b == 0));
}

#[tokio::test]
async fn test_tts_forwards_to_service() {
    let tts = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tts"))
        .and(body_partial_json(json!({"text": "hi", "voice": "alto", "speed": 1.2, "pitch": null})))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"RIFFfake".to_vec()))
        .expect(1)
        .mount(&tts)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let response = app(&config(None, Some(&tts), dir.path()))
        .oneshot(post_json("/api/tts", json!({"text": "hi", "voice": "alto", "speed": 1.2})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/wav");
    assert_eq!(body_bytes(response).await, b"RIFFfake".to_vec());
}

#[tokio::test]
async fn test_tts_placeholder_when_service_fails() {
    let tts = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&tts)
        .await;
    let dir = tempfile::tempdir().unwrap();

    let response = app(&config(None, Some(&tts), dir.path()))
        .oneshot(post_json("/api/tts", json!({"text": "hello there"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let wav = body_bytes(response).await;
    assert_eq!(&wav[..4], b"RIFF");
}

#[tokio::test]
async fn test_unknown_api_route() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(None, None, dir.path());

    for uri in ["/api/nope", "/api/chat/extra", "/api"] {
        let response = app(&config).oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body_json(response).await, json!({"error": "Not found"}));
    }
}

#[tokio::test]
async fn test_front_end_files_and_spa_fallback() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>nova</html>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log(1)").unwrap();
    let config = config(None, None, dir.path());

    let response = app(&config).oneshot(get("/app.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"console.log(1)".to_vec());

    for uri in ["/", "/chat", "/settings/voice"] {
        let response = app(&config).oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        assert_eq!(body_bytes(response).await, b"<html>nova</html>".to_vec());
    }

    let response = app(&config).oneshot(get("/missing.png")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json_only = Request::builder()
        .uri("/chat")
        .header(header::ACCEPT, "application/json")
        .body(Body::empty())
        .unwrap();
    let response = app(&config).oneshot(json_only).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_front_end_not_built() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(&config(None, None, dir.path()))
        .oneshot(get("/chat"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(text.contains("not built"));
}

#[tokio::test]
async fn test_cors_is_permissive() {
    let dir = tempfile::tempdir().unwrap();
    let request = Request::builder()
        .uri("/api/health")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();

    let response = app(&config(None, None, dir.path())).oneshot(request).await.unwrap();
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_body_limit() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(None, None, dir.path());
    config.body_limit_bytes = 64;

    let response = app(&config)
        .oneshot(post_json("/api/tts", json!({"text": "x".repeat(200)})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
