//! Error types for supabase-client

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors surfaced by the Supabase client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure, including malformed base URLs
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Supabase answered with a non-success status
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Rejected before any request was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Response body did not have the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Create an Api error from a response status and body
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        Self::Api {
            status: status.as_u16(),
            message: api_error_message(status, body),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// HTTP status reported by Supabase, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Pull a readable message out of a GoTrue or PostgREST error body.
///
/// Anything else (proxy HTML pages, plain text) is replaced by the status
/// reason so that foreign bodies never reach callers.
fn api_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        for field in ["msg", "message", "error_description", "error"] {
            if let Some(message) = json.get(field).and_then(Value::as_str) {
                if !message.is_empty() {
                    return message.to_string();
                }
            }
        }
    }

    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
