use thiserror::Error;

/// Failure talking to the judging backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("no message"))]
    Status {
        status: u16,
        /// `message` field of the error body, when the backend sent one.
        message: Option<String>,
    },

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message the backend wants shown to the user, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status {
                message: Some(m), ..
            } if !m.trim().is_empty() => Some(m),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum SmokeError {
    #[error("Container listing failed: {0}")]
    Lister(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl From<std::io::Error> for SmokeError {
    fn from(e: std::io::Error) -> Self {
        SmokeError::Lister(e.to_string())
    }
}
