//! Error types for the SharePoint backend.

use std::fmt;

use folder_picker_core::TransportError;

/// Network-specific errors.
#[derive(Debug, Clone)]
pub enum NetworkError {
    /// HTTP request failed.
    Request(String),
    /// Invalid URL provided.
    InvalidUrl(String),
    /// Request timed out.
    Timeout,
    /// Connection refused or failed.
    Connection(String),
    /// JSON serialization/deserialization error.
    Json(String),
    /// Invalid response body.
    InvalidBody(String),
    /// HTTP error status (4xx or 5xx).
    HttpStatus {
        /// The HTTP status code.
        status: u16,
        /// Optional error message from the response body.
        message: Option<String>,
    },
    /// Redirect limit exceeded.
    TooManyRedirects,
    /// Site configuration could not be loaded.
    Config(String),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(msg) => write!(f, "HTTP request error: {msg}"),
            Self::InvalidUrl(msg) => write!(f, "Invalid URL: {msg}"),
            Self::Timeout => write!(f, "Request timed out"),
            Self::Connection(msg) => write!(f, "Connection error: {msg}"),
            Self::Json(msg) => write!(f, "JSON error: {msg}"),
            Self::InvalidBody(msg) => write!(f, "Invalid response body: {msg}"),
            Self::HttpStatus { status, message } => {
                if let Some(msg) = message {
                    write!(f, "HTTP {status}: {msg}")
                } else {
                    write!(f, "HTTP {status}")
                }
            }
            Self::TooManyRedirects => write!(f, "Too many redirects"),
            Self::Config(msg) => write!(f, "Site configuration error: {msg}"),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_redirect() {
            Self::TooManyRedirects
        } else if err.is_decode() || err.is_body() {
            Self::InvalidBody(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for NetworkError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<toml::de::Error> for NetworkError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.message().to_string())
    }
}

impl From<NetworkError> for TransportError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::HttpStatus { status, message } => Self::Status { status, message },
            NetworkError::Connection(msg) => Self::Connection(msg),
            NetworkError::Timeout => Self::Timeout,
            NetworkError::Json(msg) | NetworkError::InvalidBody(msg) => Self::InvalidResponse(msg),
            other => Self::Other(other.to_string()),
        }
    }
}

/// A specialized Result type for network operations.
pub type Result<T> = std::result::Result<T, NetworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_mapping() {
        let status = NetworkError::HttpStatus {
            status: 503,
            message: Some("Server busy".into()),
        };
        assert_eq!(
            TransportError::from(status),
            TransportError::Status {
                status: 503,
                message: Some("Server busy".into())
            }
        );
        assert_eq!(TransportError::from(NetworkError::Timeout), TransportError::Timeout);
        assert_eq!(
            TransportError::from(NetworkError::Json("expected value".into())),
            TransportError::InvalidResponse("expected value".into())
        );
        assert!(matches!(
            TransportError::from(NetworkError::InvalidUrl("relative URL without a base".into())),
            TransportError::Other(msg) if msg.contains("relative URL")
        ));
    }

    #[test]
    fn test_display() {
        let err = NetworkError::HttpStatus {
            status: 404,
            message: None,
        };
        assert_eq!(err.to_string(), "HTTP 404");
    }
}
