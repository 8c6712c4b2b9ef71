//! Errors surfaced by weather providers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider answered with its own error envelope.
    #[error("Provider error {code}: {message}")]
    Provider { code: i64, message: String },

    #[error("Failed to parse provider response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Provider returned no forecast data")]
    EmptyResult,
}

impl ApiError {
    /// Short message for the screen's error state.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Network error. Check your connection.".to_string(),
            Self::Status { status, .. } => format!("Weather service responded with {status}."),
            Self::Provider { message, .. } => message.clone(),
            Self::Decode(_) => "Unexpected response from the weather service.".to_string(),
            Self::EmptyResult => "No forecast available for this location.".to_string(),
        }
    }

    /// Whether the failure came from the transport rather than the payload.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
