//! HTTP API: chat directives, speech audio, health, and the front-end fallback

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::static_files;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    handler::HandlerWithoutStateExt,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Json, Router,
};
use nova_core::Directive;
use nova_llm::{DirectivePipeline, OllamaProvider, SessionStore};
use nova_spk::{SpeechRequest, SpeechSynthesizer};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct ApiState {
    pub pipeline: Arc<DirectivePipeline>,
    pub synthesizer: Arc<SpeechSynthesizer>,
}

impl ApiState {
    /// Wire the Ollama-backed pipeline and the configured speech engine
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        let provider = Arc::new(OllamaProvider::new(&config.llm)?);
        let sessions = Arc::new(SessionStore::new(config.llm.max_history));
        let pipeline = DirectivePipeline::new(provider, sessions, config.llm.clone())?;
        let synthesizer = SpeechSynthesizer::new(config.speech.clone())?;

        info!(
            "Using model '{}' at {}; speech engine: {}",
            config.llm.model,
            config.llm.base_url,
            synthesizer.engine_name().unwrap_or("placeholder only")
        );

        Ok(Self {
            pipeline: Arc::new(pipeline),
            synthesizer: Arc::new(synthesizer),
        })
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub session_id: String,
    pub directive: Directive,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

/// Create the HTTP router with all API routes and the front-end fallback
pub fn create_router(state: ApiState, static_dir: &Path, body_limit: usize) -> Router {
    let index_html = static_files::index_path(static_dir);
    let spa = move |uri: Uri, headers: HeaderMap| {
        let index_html = index_html.clone();
        async move { static_files::spa_fallback(&index_html, &uri, &headers).await }
    };
    let front_end = ServeDir::new(static_dir).fallback(spa.into_service());

    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .route("/api/tts", post(tts_handler))
        .route("/api", any(api_not_found_handler))
        .route("/api/*rest", any(api_not_found_handler))
        .fallback_service(front_end)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

/// POST /api/chat `{sessionId?, userText}`
async fn chat_handler(State(state): State<ApiState>, body: Bytes) -> Response {
    let payload = parse_body(&body);

    let user_text = match non_empty_str(&payload, "userText") {
        Some(text) => text,
        None => return error_response(StatusCode::BAD_REQUEST, "userText is required"),
    };
    let session_id = match non_empty_str(&payload, "sessionId") {
        Some(id) => id.to_string(),
        None => Uuid::new_v4().to_string(),
    };

    let generation = state.pipeline.generate(user_text, &session_id).await;
    debug!(
        "Session {}: {} directive after {} attempt(s){}",
        session_id,
        generation.directive.emotion,
        generation.attempts,
        if generation.is_fallback() { " (fallback)" } else { "" }
    );

    Json(ChatResponse {
        session_id,
        warning: generation.fallback.map(|_| "fallback"),
        directive: generation.directive,
    })
    .into_response()
}

/// POST /api/tts `{text, voice?, speed?, pitch?}`
async fn tts_handler(State(state): State<ApiState>, body: Bytes) -> Response {
    let payload = parse_body(&body);

    let text = match non_empty_str(&payload, "text") {
        Some(text) => text,
        None => return error_response(StatusCode::BAD_REQUEST, "text is required"),
    };
    let request = SpeechRequest {
        text: text.to_string(),
        voice: payload.get("voice").and_then(Value::as_str).map(str::to_string),
        speed: payload.get("speed").and_then(Value::as_f64),
        pitch: payload.get("pitch").and_then(Value::as_f64),
    };

    match state.synthesizer.synthesize(&request).await {
        Ok(audio) => ([(header::CONTENT_TYPE, audio.content_type)], audio.bytes).into_response(),
        Err(err) if err.is_invalid_input() => {
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
        Err(err) => {
            error!("Speech synthesis failed: {}", err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Speech synthesis failed")
        }
    }
}

async fn api_not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

/// Anything that is not a JSON document reads as `null`, so required fields come up missing
fn parse_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

fn non_empty_str<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}
