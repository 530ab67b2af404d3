//! Error types for question acquisition.

use thiserror::Error;
use tutor_model::ModelError;

/// Errors that can occur while fetching, reading or parsing a question bank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SourceError {
    /// The server answered with a non-success status.
    #[error("HTTP error! status: {status} - {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// `message` from the error body, or a placeholder.
        message: String,
    },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// I/O error reading or writing a bank file.
    #[error("I/O error: {0}")]
    Io(String),

    /// The body was not the expected JSON shape.
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// The JSON parsed but the questions did not form a valid bank.
    #[error("invalid question bank: {0}")]
    InvalidBank(#[from] ModelError),

    /// Remote fetching is turned off in the configuration.
    #[error("remote question source is disabled")]
    Disabled,
}

impl SourceError {
    /// Short message for the error indicator in the UI.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) => "Could not reach the question server. Using the questions already loaded.",
            Self::Http { .. } => "The question server reported an error. Using the questions already loaded.",
            Self::JsonParse(_) | Self::InvalidBank(_) => {
                "The question server sent data that could not be used."
            }
            Self::Io(_) => "Could not read or write the question file.",
            Self::Disabled => "Remote questions are turned off.",
        }
    }

    /// Whether the next scheduled refresh may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Io(_) => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            Self::JsonParse(_) | Self::InvalidBank(_) | Self::Disabled => false,
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::JsonParse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse(err.to_string())
    }
}

/// Result type alias for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_errors_read_like_the_server_reply() {
        let err = SourceError::Http {
            status: 503,
            message: "Server error".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error! status: 503 - Server error");
        assert!(err.is_retryable());
    }

    #[test]
    fn retryable() {
        assert!(SourceError::Network("timeout".to_string()).is_retryable());
        assert!(
            !SourceError::Http {
                status: 404,
                message: "not found".to_string()
            }
            .is_retryable()
        );
        assert!(!SourceError::InvalidBank(ModelError::EmptyBank).is_retryable());
    }

    #[test]
    fn user_messages() {
        let err = SourceError::Network("connection refused".to_string());
        assert!(err.user_message().contains("already loaded"));
        assert!(SourceError::Disabled.user_message().contains("turned off"));
    }
}
