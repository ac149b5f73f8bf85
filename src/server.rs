use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use tower_http::trace::TraceLayer;

use tracing::info;

use crate::AppState;
use crate::chat::{ChatService, DEFAULT_SESSION_ID};
use crate::config::AppConfig;
use crate::error::ChatError;
use crate::llm::{GeminiDriver, LlmSettings};
use crate::session::InMemorySessionStore;

/// Body of `GET /`.
pub const SERVICE_UP: &str = "Aiplonex Gemini AI Agent is running";

/// Body of `GET /chat`.
pub const CHAT_USAGE: &str = "Send a POST request with {session_id, message}";

/// Build the application router over the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/chat", get(chat_usage).post(api_chat))
        .route("/chat/sessions/{id}/messages", get(api_get_messages))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>, settings: LlmSettings) -> anyhow::Result<()> {
    info!(
        name: "llm.config.loaded",
        base_url = %settings.base_url,
        model = %settings.model,
        temperature = settings.temperature,
        "LLM configuration loaded"
    );

    let driver = Arc::new(GeminiDriver::new(settings));
    let sessions = Arc::new(InMemorySessionStore::new());
    let chat = ChatService::new(driver, sessions, config.llm.system_instruction());

    let app = build_router(AppState::new(chat));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
}

/// GET / - Liveness message.
async fn index_handler() -> Json<StatusResponse> {
    Json(StatusResponse { status: SERVICE_UP })
}

/// GET /chat - Usage hint.
async fn chat_usage() -> Json<StatusResponse> {
    Json(StatusResponse { status: CHAT_USAGE })
}

/// Request body for chat API.
#[derive(Debug, Deserialize)]
struct ChatRequest {
    /// Conversation key; `default_user` when absent.
    #[serde(default)]
    session_id: Option<String>,
    /// User message content.
    #[serde(default)]
    message: Option<String>,
}

/// Response from chat API.
#[derive(Debug, Serialize)]
struct ChatResponse {
    reply: String,
}

/// POST /chat - Run one exchange and return the model's reply.
async fn api_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ChatError> {
    let Json(req) = payload.map_err(|rejection| ChatError::InvalidRequest(rejection.body_text()))?;

    let session_id = req
        .session_id
        .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());
    let message = req.message.unwrap_or_default();

    info!(
        name: "chat.received",
        session_id = %session_id,
        message_length = message.len(),
        "Received chat request"
    );

    let reply = state.chat.send(&session_id, &message).await?;
    Ok(Json(ChatResponse { reply }))
}

/// Message DTO for API responses.
#[derive(Debug, Serialize)]
struct MessageDto {
    role: &'static str,
    content: String,
}

/// GET /chat/sessions/{id}/messages - Get session messages.
async fn api_get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<MessageDto>>, ChatError> {
    let session = state
        .chat
        .sessions()
        .get(&id)
        .ok_or(ChatError::SessionNotFound(id))?;

    let messages = session
        .messages()
        .into_iter()
        .map(|m| MessageDto {
            role: m.role.as_str(),
            content: m.content,
        })
        .collect();
    Ok(Json(messages))
}
