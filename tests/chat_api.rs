//! HTTP-level tests for the chat routes.
//!
//! The model is replaced by a scripted driver so every scenario runs offline.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use aiplonex_agent::AppState;
use aiplonex_agent::chat::{ChatService, DEFAULT_SESSION_ID};
use aiplonex_agent::error::GenerationError;
use aiplonex_agent::llm::{LlmDriver, Message, PromptContext};
use aiplonex_agent::server::build_router;
use aiplonex_agent::session::{ConversationStore, InMemorySessionStore};
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};

// =============================================================================
// Test Utilities
// =============================================================================

/// Pops one scripted outcome per call; replies "ok" once the script runs out.
#[derive(Default)]
struct ScriptedDriver {
    script: Mutex<VecDeque<Result<String, String>>>,
}

impl ScriptedDriver {
    fn with(outcomes: Vec<Result<&str, &str>>) -> Self {
        Self {
            script: Mutex::new(
                outcomes
                    .into_iter()
                    .map(|o| o.map(String::from).map_err(String::from))
                    .collect(),
            ),
        }
    }
}

#[async_trait::async_trait]
impl LlmDriver for ScriptedDriver {
    async fn generate(&self, _prompt: &PromptContext) -> Result<String, GenerationError> {
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(GenerationError::Api {
                status: 429,
                message,
            }),
            None => Ok("ok".to_string()),
        }
    }
}

fn setup(driver: ScriptedDriver) -> (TestServer, Arc<InMemorySessionStore>) {
    let store = Arc::new(InMemorySessionStore::new());
    let chat = ChatService::new(Arc::new(driver), store.clone(), "You are a test agent.");
    let server = TestServer::new(build_router(AppState::new(chat))).expect("test server");
    (server, store)
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_hello_scenario() {
    let (server, store) = setup(ScriptedDriver::with(vec![Ok("Namaskar! How can I help?")]));

    let response = server
        .post("/chat")
        .json(&json!({ "session_id": "u1", "message": "Hello" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({ "reply": "Namaskar! How can I help?" })
    );
    assert_eq!(
        store.get("u1").unwrap().messages(),
        vec![
            Message::user("Hello"),
            Message::assistant("Namaskar! How can I help?")
        ]
    );
}

#[tokio::test]
async fn test_empty_message_scenario() {
    let (server, store) = setup(ScriptedDriver::default());

    for body in [
        json!({ "message": "" }),
        json!({ "session_id": "u1", "message": "   " }),
        json!({ "session_id": "u1" }),
        json!({ "session_id": "u1", "message": null }),
    ] {
        let response = server.post("/chat").json(&body).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({ "error": "Message is required" })
        );
    }

    assert!(store.is_empty());
}

#[tokio::test]
async fn test_upstream_failure_scenario() {
    let (server, store) = setup(ScriptedDriver::with(vec![
        Ok("first reply"),
        Err("Resource has been exhausted (e.g. check quota)."),
    ]));

    server
        .post("/chat")
        .json(&json!({ "session_id": "u1", "message": "Hello" }))
        .await
        .assert_status_ok();

    let response = server
        .post("/chat")
        .json(&json!({ "session_id": "u1", "message": "Still there?" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "API error (429): Resource has been exhausted (e.g. check quota)." })
    );
    assert_eq!(store.get("u1").unwrap().message_count(), 2);
}

#[tokio::test]
async fn test_default_session_is_shared() {
    let (server, store) = setup(ScriptedDriver::with(vec![Ok("one"), Ok("two")]));

    server
        .post("/chat")
        .json(&json!({ "message": "first" }))
        .await
        .assert_status_ok();
    server
        .post("/chat")
        .json(&json!({ "message": "second" }))
        .await
        .assert_status_ok();

    assert_eq!(store.len(), 1);
    let history = store.get(DEFAULT_SESSION_ID).unwrap().messages();
    assert_eq!(
        history,
        vec![
            Message::user("first"),
            Message::assistant("one"),
            Message::user("second"),
            Message::assistant("two"),
        ]
    );
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let (server, store) = setup(ScriptedDriver::default());

    server
        .post("/chat")
        .json(&json!({ "session_id": "u1", "message": "Hi" }))
        .await
        .assert_status_ok();
    server
        .post("/chat")
        .json(&json!({ "session_id": "u2", "message": "Hi too" }))
        .await
        .assert_status_ok();

    assert_eq!(store.get("u1").unwrap().message_count(), 2);
    assert_eq!(store.get("u2").unwrap().message_count(), 2);

    let response = server.get("/chat/sessions/u2/messages").await;
    assert_eq!(
        response.json::<Value>(),
        json!([
            { "role": "user", "content": "Hi too" },
            { "role": "assistant", "content": "ok" }
        ])
    );
}

#[tokio::test]
async fn test_message_is_trimmed_before_recording() {
    let (server, store) = setup(ScriptedDriver::default());

    server
        .post("/chat")
        .json(&json!({ "session_id": "", "message": "  spaced out \n" }))
        .await
        .assert_status_ok();

    // An empty session_id is a key of its own, not the default session.
    assert!(store.get(DEFAULT_SESSION_ID).is_none());
    assert_eq!(
        store.get("").unwrap().messages()[0],
        Message::user("spaced out")
    );
}

#[tokio::test]
async fn test_status_routes() {
    let (server, _store) = setup(ScriptedDriver::default());

    let root = server.get("/").await;
    root.assert_status_ok();
    assert_eq!(
        root.json::<Value>(),
        json!({ "status": "Aiplonex Gemini AI Agent is running" })
    );

    let chat = server.get("/chat").await;
    chat.assert_status_ok();
    assert_eq!(
        chat.json::<Value>()["status"],
        "Send a POST request with {session_id, message}"
    );
}
