//! Error types for assistant operations.

use thiserror::Error;

/// Errors that can occur while serving an authoring operation.
///
/// Only [`AssistError::InvalidInput`] ever reaches the caller of the
/// assistant facade. The remaining variants are produced by gateways and the
/// response parser and are absorbed by routing the call to the fallback path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssistError {
    /// The model could not be reached (no credential, transport or remote error).
    #[error("model unavailable: {0}")]
    Unavailable(String),

    /// The model answered but the answer could not be used.
    #[error("malformed model response: {0}")]
    Malformed(String),

    /// The caller supplied input the operation cannot accept.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A component could not be configured (e.g. the HTTP client).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The model did not answer before the deadline.
    #[error("model request timed out")]
    Timeout,
}

impl AssistError {
    /// Short, stable name of the taxonomy class, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::Malformed(_) => "malformed",
            Self::InvalidInput(_) => "invalid_input",
            Self::Configuration(_) => "configuration",
            Self::Timeout => "timeout",
        }
    }

    /// Whether this error signals a programming error on the caller's side.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
