//! Error taxonomy of the REST client.
//!
//! Every failure of a backend call is one of these variants; callers never see
//! a raw `reqwest::Error`.

use thiserror::Error;

/// Message shown for any failure that never reached (or never heard back from) the server.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response. `message` is the server-supplied `message` field, if any.
    #[error("request rejected with status {status}: {}", message.as_deref().unwrap_or("no message"))]
    Rejected { status: u16, message: Option<String> },

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("malformed response: {0}")]
    Decode(String),

    /// A privileged call was attempted without a stored bearer token.
    #[error("authentication required")]
    Unauthenticated,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for failures where the server's answer is unknown.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::Network(_) | ApiError::Timeout | ApiError::Decode(_)
        )
    }

    /// The text a toast should show for this error.
    ///
    /// Server messages are surfaced verbatim; `fallback` covers rejections
    /// without a message.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Rejected { message: None, .. } => fallback.to_string(),
            ApiError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            ApiError::Timeout => "The server took too long to respond. Please try again.".to_string(),
            ApiError::Decode(_) => "Unexpected response from the server.".to_string(),
            ApiError::Unauthenticated => "Please log in to continue.".to_string(),
            ApiError::InvalidRequest(reason) => reason.clone(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if e.is_builder() {
            ApiError::InvalidRequest(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}
