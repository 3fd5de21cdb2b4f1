//! Error types for error event handling.

use drm_types::TypeError;
use thiserror::Error;

/// Errors that can occur when building, mutating or traversing an error event.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    /// An attribute key or value was rejected. The event is left unchanged.
    #[error("invalid attribute '{key}': {reason}")]
    InvalidArgument { key: String, reason: String },

    /// A cursor was advanced past the last attribute.
    #[error("cursor out of bounds: position {position}, attribute count {count}")]
    OutOfBounds { position: usize, count: usize },

    /// The attributes changed after the cursor was created.
    #[error("stale cursor at position {position}: attributes were modified after it was created")]
    StaleCursor { position: usize },

    /// A required builder field was not set.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// An identifier or error-type code was invalid.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A configuration value could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl EventError {
    /// Returns true if this error rejected an attribute.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, EventError::InvalidArgument { .. })
    }

    /// Returns true if a cursor was advanced past the end.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, EventError::OutOfBounds { .. })
    }

    pub(crate) fn invalid_argument(key: &str, reason: impl Into<String>) -> Self {
        EventError::InvalidArgument {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for EventError {
    fn from(err: serde_json::Error) -> Self {
        EventError::Serialization(err.to_string())
    }
}
