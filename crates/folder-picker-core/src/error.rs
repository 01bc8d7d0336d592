//! Error types for the folder picker.

use std::fmt;

/// The main error type for folder picker construction and configuration.
///
/// User actions never return errors; failures that happen while browsing are
/// captured into [`BrowseState`](crate::BrowseState) instead.
#[derive(Debug)]
pub enum PickerError {
    /// No tokio runtime handle was supplied and none is active on this thread.
    NoRuntime,
    /// Configuration could not be parsed or is invalid.
    Config(ConfigError),
}

impl fmt::Display for PickerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRuntime => write!(
                f,
                "No async runtime available. Build the picker inside a tokio runtime or pass a handle"
            ),
            Self::Config(err) => write!(f, "Configuration error: {err}"),
        }
    }
}

impl std::error::Error for PickerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::NoRuntime => None,
        }
    }
}

impl From<ConfigError> for PickerError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Configuration-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A folder path contains characters that cannot appear in a server-relative URL.
    InvalidPath {
        /// The offending input.
        path: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// The configuration document could not be parsed.
    Parse(String),
    /// A numeric setting is outside its allowed range.
    OutOfRange {
        /// The setting name.
        field: &'static str,
        /// The rejected value.
        value: u64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPath { path, reason } => {
                write!(f, "Invalid folder path '{path}': {reason}")
            }
            Self::Parse(msg) => write!(f, "Failed to parse configuration: {msg}"),
            Self::OutOfRange { field, value } => {
                write!(f, "Setting '{field}' is out of range: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Failure of a folder listing request.
///
/// "Folder not found" is not an error: listers return an empty page for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The service answered with a non-success status.
    Status {
        /// The HTTP status code.
        status: u16,
        /// Optional error text from the response body.
        message: Option<String>,
    },
    /// The connection could not be established.
    Connection(String),
    /// The request timed out.
    Timeout,
    /// The response body could not be decoded.
    InvalidResponse(String),
    /// The request was cancelled before it completed.
    Cancelled,
    /// Any other transport failure.
    Other(String),
}

impl TransportError {
    /// Whether retrying the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Connection(_) | Self::Timeout => true,
            Self::InvalidResponse(_) | Self::Cancelled | Self::Other(_) => false,
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { status, message } => {
                if let Some(msg) = message {
                    write!(f, "Folder service returned HTTP {status}: {msg}")
                } else {
                    write!(f, "Folder service returned HTTP {status}")
                }
            }
            Self::Connection(msg) => write!(f, "Connection error: {msg}"),
            Self::Timeout => write!(f, "Folder request timed out"),
            Self::InvalidResponse(msg) => write!(f, "Invalid folder response: {msg}"),
            Self::Cancelled => write!(f, "Folder request was cancelled"),
            Self::Other(msg) => write!(f, "Folder request failed: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// A specialized Result type for folder picker operations.
pub type Result<T> = std::result::Result<T, PickerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(TransportError::Timeout.is_transient());
        assert!(TransportError::Status { status: 503, message: None }.is_transient());
        assert!(!TransportError::Status { status: 403, message: None }.is_transient());
        assert!(!TransportError::InvalidResponse("eof".into()).is_transient());
    }

    #[test]
    fn test_display_includes_status_message() {
        let err = TransportError::Status {
            status: 500,
            message: Some("boom".into()),
        };
        assert_eq!(err.to_string(), "Folder service returned HTTP 500: boom");
    }

    #[test]
    fn test_config_error_converts_into_picker_error() {
        let err: PickerError = ConfigError::OutOfRange { field: "page_size", value: 0 }.into();
        assert!(matches!(err, PickerError::Config(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
