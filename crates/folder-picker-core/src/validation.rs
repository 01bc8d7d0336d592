//! Host validation of confirmed values.
//!
//! Hosts may attach an error-message function that inspects a candidate value
//! and answers either right away or later. Both answers are represented by
//! [`ErrorMessage`] and resolved through the same `await`, so the picker has
//! one completion path regardless of which variant the host returns.
//!
//! An empty or absent message means the value is valid.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use parking_lot::Mutex;

/// The answer of a host validation function.
pub enum ErrorMessage {
    /// The message is known immediately.
    Immediate(Option<String>),
    /// The message will be produced by a future.
    Deferred(BoxFuture<'static, Option<String>>),
}

impl ErrorMessage {
    /// A valid result.
    pub fn valid() -> Self {
        Self::Immediate(None)
    }

    /// An immediate rejection.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Immediate(Some(message.into()))
    }

    /// A result that resolves later.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Option<String>> + Send + 'static,
    {
        Self::Deferred(Box::pin(future))
    }

    /// Wait for the message. Empty messages resolve to `None`.
    pub async fn resolve(self) -> Option<String> {
        let message = match self {
            Self::Immediate(message) => message,
            Self::Deferred(future) => future.await,
        };
        message.filter(|m| !m.is_empty())
    }
}

impl fmt::Debug for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate(message) => f.debug_tuple("Immediate").field(message).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<String> for ErrorMessage {
    fn from(message: String) -> Self {
        Self::Immediate(Some(message))
    }
}

impl From<&str> for ErrorMessage {
    fn from(message: &str) -> Self {
        Self::Immediate(Some(message.to_string()))
    }
}

impl From<Option<String>> for ErrorMessage {
    fn from(message: Option<String>) -> Self {
        Self::Immediate(message)
    }
}

/// Host function returning an error message for a candidate value.
pub type ErrorMessageFn = Arc<dyn Fn(&str) -> ErrorMessage + Send + Sync>;

/// What a validation run decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The value is valid and the host should be notified.
    Accepted,
    /// The host validator rejected the value with this message.
    Rejected(String),
    /// The value was already validated last time; nothing to do.
    Unchanged,
}

/// Runs the host validator and skips repeated values.
#[derive(Default)]
pub struct ValidationGate {
    validator: Option<ErrorMessageFn>,
    last_validated: Mutex<Option<String>>,
}

impl ValidationGate {
    /// Create a gate around an optional host validator.
    pub fn new(validator: Option<ErrorMessageFn>) -> Self {
        Self {
            validator,
            last_validated: Mutex::new(None),
        }
    }

    /// Whether a host validator is configured.
    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }

    /// The value most recently handed to the host validator.
    pub fn last_validated(&self) -> Option<String> {
        self.last_validated.lock().clone()
    }

    /// Validate `value`.
    ///
    /// Without a host validator every value is accepted. With one, a value
    /// equal to the last validated value is reported as
    /// [`ValidationOutcome::Unchanged`] without calling the host again.
    ///
    /// The value is recorded once the validator has answered; a run dropped
    /// while awaiting a deferred message leaves the record untouched.
    pub async fn run(&self, value: &str) -> ValidationOutcome {
        let Some(validator) = self.validator.clone() else {
            return ValidationOutcome::Accepted;
        };

        if self.last_validated.lock().as_deref() == Some(value) {
            tracing::debug!(target: "folder_picker_core::validation", value, "value already validated");
            return ValidationOutcome::Unchanged;
        }

        let outcome = match validator(value).resolve().await {
            None => ValidationOutcome::Accepted,
            Some(message) => ValidationOutcome::Rejected(message),
        };
        *self.last_validated.lock() = Some(value.to_string());
        outcome
    }
}

impl fmt::Debug for ValidationGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationGate")
            .field("has_validator", &self.has_validator())
            .field("last_validated", &self.last_validated())
            .finish()
    }
}
