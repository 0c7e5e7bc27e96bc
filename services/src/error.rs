use client::{ApiError, error::NETWORK_ERROR_MESSAGE};
use thiserror::Error;

/// Outcome error of a user flow (redeem, visa, predictions, hotels, payments).
///
/// The display text is what the user is shown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// Input blocked before any request was made.
    #[error("{0}")]
    Validation(String),

    /// The flow needs a logged-in user.
    #[error("{0}")]
    NotAuthenticated(String),

    /// The server refused; the message is shown verbatim.
    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Network(String),
}

impl FlowError {
    /// Maps a client error, using `fallback` for rejections without a message.
    pub fn from_api(err: &ApiError, fallback: &str) -> Self {
        match err {
            ApiError::Network(_) | ApiError::Timeout => FlowError::Network(err.user_message(fallback)),
            ApiError::Unauthenticated => FlowError::NotAuthenticated(err.user_message(fallback)),
            ApiError::InvalidRequest(_) => FlowError::Validation(err.user_message(fallback)),
            ApiError::Decode(_) => FlowError::Network(NETWORK_ERROR_MESSAGE.to_string()),
            ApiError::Rejected { .. } => FlowError::Rejected(err.user_message(fallback)),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            FlowError::Validation(m)
            | FlowError::NotAuthenticated(m)
            | FlowError::Rejected(m)
            | FlowError::Network(m) => m,
        }
    }
}
