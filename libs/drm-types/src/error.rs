//! Error types for identifier parsing.

use thiserror::Error;

/// Errors that can occur when parsing identifiers or error-type codes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// The integer is not one of the known error-type codes.
    #[error("unknown error type code: {0}")]
    UnknownErrorType(i32),

    /// The error-type name does not match any known error type.
    #[error("unknown error type name: '{0}'")]
    UnknownErrorTypeName(String),

    /// The session ID string is not a valid integer.
    #[error("invalid session ID: '{0}'")]
    InvalidSessionId(String),
}

impl TypeError {
    /// Returns true if this error came from an unrecognized error type.
    pub fn is_unknown_error_type(&self) -> bool {
        matches!(
            self,
            TypeError::UnknownErrorType(_) | TypeError::UnknownErrorTypeName(_)
        )
    }
}
