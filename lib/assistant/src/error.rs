//! Error types for the assistant crate.

use std::fmt;

/// Errors from the generative backend.
///
/// These never reach chat callers directly; the assistant maps each failure
/// mode to a canned user-facing warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// The endpoint could not be reached.
    Unreachable { reason: String },
    /// The request timed out; treated as a network failure.
    Timeout,
    /// The endpoint answered with a non-success status.
    RequestFailed { status: u16 },
    /// The endpoint answered but produced no usable text.
    EmptyCompletion,
    /// The response body could not be parsed.
    ResponseParseFailed { reason: String },
    /// The backend configuration is unusable.
    InvalidConfig { reason: String },
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable { reason } => {
                write!(f, "generative endpoint unreachable: {reason}")
            }
            Self::Timeout => write!(f, "generative request timed out"),
            Self::RequestFailed { status } => {
                write!(f, "generative endpoint returned status {status}")
            }
            Self::EmptyCompletion => write!(f, "generative endpoint returned no completion"),
            Self::ResponseParseFailed { reason } => {
                write!(f, "failed to parse generative response: {reason}")
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid generative backend configuration: {reason}")
            }
        }
    }
}

impl std::error::Error for LlmError {}
