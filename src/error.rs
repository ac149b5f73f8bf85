//! Error types for the chat service.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failure of a single generation call.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The request never produced an HTTP response.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider error message, or the raw body.
        message: String,
    },

    /// A success status whose body could not be decoded.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// The provider returned no candidate text.
    #[error("No response from model: {0}")]
    EmptyResponse(String),
}

/// Errors surfaced by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    UpstreamFailure(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),
}

impl From<GenerationError> for ChatError {
    fn from(err: GenerationError) -> Self {
        Self::UpstreamFailure(err.to_string())
    }
}

impl ChatError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

/// Startup configuration failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required env var: {0}")]
    MissingEnv(&'static str),

    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ::config::ConfigError),

    #[error("{0}")]
    Cli(#[from] clap::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status() {
        assert_eq!(
            ChatError::InvalidRequest("Message is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ChatError::UpstreamFailure("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ChatError::SessionNotFound("u1".into()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_upstream_keeps_description() {
        let err: ChatError = GenerationError::Api {
            status: 403,
            message: "API key not valid".into(),
        }
        .into();
        assert_eq!(err.to_string(), "API error (403): API key not valid");
    }

    #[tokio::test]
    async fn test_error_into_response_body() {
        let response = ChatError::InvalidRequest("Message is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Message is required" }));
    }
}
