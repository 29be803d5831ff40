//! Error types for notemaker-core

use thiserror::Error;

/// Result type alias using notemaker-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in notemaker-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Backend could not be reached (connect failure, timeout, dropped socket)
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// Backend refused the credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Note not found (stale id)
    #[error("Note not found: {0}")]
    NotFound(String),

    /// Backend rejected the operation
    #[error("Backend rejected the request: {0}")]
    Validation(String),

    /// Malformed response or realtime frame
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// WebSocket error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(error.to_string())
    }
}

/// Coarse failure classes used to pick a recovery path in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NetworkUnreachable,
    BackendValidation,
    NotFound,
    Unauthorized,
    Other,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Unreachable(_) | Self::WebSocket(_) => FailureKind::NetworkUnreachable,
            Self::Unauthorized(_) => FailureKind::Unauthorized,
            Self::NotFound(_) => FailureKind::NotFound,
            Self::Validation(_) => FailureKind::BackendValidation,
            Self::Http(error) => {
                if error.is_connect() || error.is_timeout() {
                    FailureKind::NetworkUnreachable
                } else if error.status().is_some_and(|status| {
                    status == reqwest::StatusCode::UNAUTHORIZED
                        || status == reqwest::StatusCode::FORBIDDEN
                }) {
                    FailureKind::Unauthorized
                } else {
                    FailureKind::Other
                }
            }
            Self::Protocol(_)
            | Self::Serialization(_)
            | Self::InvalidInput(_)
            | Self::Config(_) => FailureKind::Other,
        }
    }

    /// Short message suitable for a transient notice.
    pub fn user_notice(&self) -> String {
        match self.kind() {
            FailureKind::NetworkUnreachable => {
                "Can't reach the notes service. Check your connection.".to_string()
            }
            FailureKind::Unauthorized => "You're signed out. Sign in again to continue.".to_string(),
            FailureKind::NotFound => "That note no longer exists.".to_string(),
            FailureKind::BackendValidation | FailureKind::Other => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_classifies_domain_variants() {
        assert_eq!(
            Error::Unreachable("down".into()).kind(),
            FailureKind::NetworkUnreachable
        );
        assert_eq!(
            Error::Unauthorized("expired".into()).kind(),
            FailureKind::Unauthorized
        );
        assert_eq!(Error::NotFound("7".into()).kind(), FailureKind::NotFound);
        assert_eq!(
            Error::Validation("bad input".into()).kind(),
            FailureKind::BackendValidation
        );
        assert_eq!(Error::Protocol("frame".into()).kind(), FailureKind::Other);
    }

    #[test]
    fn user_notice_keeps_backend_message() {
        let notice = Error::Validation("note must not be empty".into()).user_notice();
        assert!(notice.contains("note must not be empty"));
    }

    #[test]
    fn user_notice_hides_transport_details() {
        let notice = Error::Unreachable("tcp connect error: 10.0.0.1:443".into()).user_notice();
        assert!(!notice.contains("10.0.0.1"));
    }
}
