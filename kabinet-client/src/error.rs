//! Error types for the API client layer.
//!
//! Network failures, 4xx and 5xx responses all surface uniformly as a
//! status plus the server-supplied message; the client never retries.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of an API operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: no response was received at all.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status. `message` is present
    /// only when the response body carried one; display strings fall back
    /// to the status line.
    #[error("{status}: {msg}", msg = message.as_deref().unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed")))]
    Http {
        status: StatusCode,
        message: Option<String>,
    },

    /// A 2xx response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status of the response, when one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Network(err) => err.status(),
            ApiError::Decode(_) => None,
        }
    }

    /// Message the server attached to a non-2xx response body.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

/// Extract the `message` field from an error response body.
///
/// The service reports `{"message": "..."}`; validation failures carry an
/// array of messages instead, which collapses into one comma-separated
/// string. Bodies without a message field yield `None` — callers decide
/// their own fallback, matching how the screen treats a missing
/// `error.data.message`.
pub(crate) fn extract_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    match value.get("message")? {
        serde_json::Value::String(message) if !message.is_empty() => {
            Some(message.clone())
        }
        serde_json::Value::Array(messages) => {
            let joined = messages
                .iter()
                .filter_map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            (!joined.is_empty()).then_some(joined)
        }
        _ => None,
    }
}
