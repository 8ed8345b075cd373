//! Error taxonomy shared by every codec entry point.

use thiserror::Error;

/// Result type returned by every decode and encode operation.
pub type Result<T> = std::result::Result<T, KineticError>;

/// Errors that can occur while decoding telemetry or building commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KineticError {
    /// The SDK was never launched with an API key
    #[error("Kinetic SDK has not been launched")]
    NotInitialized,

    /// The API key was explicitly rejected
    #[error("API key has been rejected")]
    Unauthorized,

    /// Input buffer does not have the fixed size of its characteristic
    #[error("Invalid {what} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A raw field does not map onto its closed set of values
    #[error("Invalid {field} in payload: {reason}")]
    InvalidPayload { field: &'static str, reason: String },

    /// A command parameter is outside its documented range
    #[error("Invalid parameter {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },
}

impl KineticError {
    /// Stable numeric code for the error kind.
    ///
    /// 102 is the code the vendor SDK reports for a rejected API key.
    pub fn code(&self) -> u16 {
        match self {
            KineticError::NotInitialized => 101,
            KineticError::Unauthorized => 102,
            KineticError::InvalidLength { .. } => 103,
            KineticError::InvalidPayload { .. } => 104,
            KineticError::InvalidParameter { .. } => 105,
        }
    }

    pub(crate) fn length(what: &'static str, expected: usize, actual: usize) -> Self {
        KineticError::InvalidLength {
            what,
            expected,
            actual,
        }
    }

    pub(crate) fn payload(field: &'static str, reason: impl Into<String>) -> Self {
        KineticError::InvalidPayload {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn parameter(field: &'static str, reason: impl Into<String>) -> Self {
        KineticError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}
