//! Google Generative Language API driver.
//!
//! This module implements the [`LlmDriver`] trait for the Gemini
//! `models/{model}:generateContent` endpoint. One request per call, no
//! streaming, no retries.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

use super::{LlmDriver, LlmSettings, MessageRole, PromptContext};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Driver
// ─────────────────────────────────────────────────────────────────────────────

/// Driver for the Gemini `generateContent` API.
#[derive(Clone)]
pub struct GeminiDriver {
    http: reqwest::Client,
    settings: LlmSettings,
}

impl std::fmt::Debug for GeminiDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiDriver")
            .field("settings", &self.settings)
            .finish()
    }
}

impl GeminiDriver {
    /// Create a new driver with a default HTTP client.
    #[must_use]
    pub fn new(settings: LlmSettings) -> Self {
        Self::with_client(reqwest::Client::new(), settings)
    }

    /// Create a driver sharing an existing HTTP client.
    #[must_use]
    pub fn with_client(http: reqwest::Client, settings: LlmSettings) -> Self {
        Self { http, settings }
    }

    #[must_use]
    pub fn settings(&self) -> &LlmSettings {
        &self.settings
    }
}

#[async_trait::async_trait]
impl LlmDriver for GeminiDriver {
    async fn generate(&self, prompt: &PromptContext) -> Result<String, GenerationError> {
        let url = generate_url(&self.settings.base_url, &self.settings.model);
        let body = build_request(&self.settings, prompt);

        tracing::debug!(
            url = %url,
            turns = body.contents.len(),
            "Sending generateContent request"
        );

        let resp = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.settings.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&text).map_err(|e| GenerationError::Decode(e.to_string()))?;
        extract_reply(parsed)
    }
}

/// Build the `generateContent` URL, adding the `models/` prefix when missing.
fn generate_url(base_url: &str, model: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let model = model.trim_start_matches('/');
    if model.starts_with("models/") {
        format!("{base}/v1beta/{model}:generateContent")
    } else {
        format!("{base}/v1beta/models/{model}:generateContent")
    }
}

fn build_request<'a>(settings: &LlmSettings, prompt: &'a PromptContext) -> GenerateContentRequest<'a> {
    let contents = prompt
        .turns()
        .map(|(role, text)| Content {
            role: Some(match role {
                MessageRole::User => "user",
                MessageRole::Assistant => "model",
            }),
            parts: vec![Part { text }],
        })
        .collect();

    GenerateContentRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: &prompt.system_instruction,
            }],
        },
        contents,
        generation_config: GenerationConfig {
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
        },
    }
}

/// Prefer the provider's `error.message`; fall back to the raw body.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "empty error body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

fn extract_reply(resp: GenerateContentResponse) -> Result<String, GenerationError> {
    let Some(candidate) = resp.candidates.into_iter().next() else {
        let reason = resp
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map_or_else(
                || "no candidates returned".to_string(),
                |r| format!("prompt blocked ({r})"),
            );
        return Err(GenerationError::EmptyResponse(reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let finish = candidate.finish_reason.as_deref().unwrap_or("unknown");
        return Err(GenerationError::EmptyResponse(format!(
            "candidate has no text (finish reason: {finish})"
        )));
    }

    Ok(text)
}
