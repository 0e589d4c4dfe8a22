//! Core error types

use thiserror::Error;

/// Errors that can occur in the capture core
#[derive(Error, Debug)]
pub enum CaptureError {
    /// An extension id was registered twice for the same capability
    #[error("Duplicate listener id '{id}' for capability '{capability}'")]
    DuplicateListener {
        /// Capability the registration targeted
        capability: String,
        /// The offending extension id
        id: String,
    },

    /// A hook body failed; promoted to the fatal path by the dispatcher
    #[error("Hook '{event}' failed: {detail}")]
    HookFailed {
        /// Name of the hook entry point
        event: String,
        /// Human-readable failure detail
        detail: String,
    },

    /// A persisted property could not be interpreted
    #[error("Invalid value for property '{key}': {value}")]
    InvalidProperty {
        /// Property key
        key: String,
        /// The rejected value
        value: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl CaptureError {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        CaptureError::Other(msg.into())
    }

    /// Create a hook failure error
    pub fn hook_failed(event: impl Into<String>, detail: impl Into<String>) -> Self {
        CaptureError::HookFailed {
            event: event.into(),
            detail: detail.into(),
        }
    }
}

/// Result type alias for capture-core operations
pub type CaptureResult<T> = Result<T, CaptureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CaptureError::DuplicateListener {
            capability: "ChatListener".into(),
            id: "mapper".into(),
        };
        assert_eq!(
            err.to_string(),
            "Duplicate listener id 'mapper' for capability 'ChatListener'"
        );

        let err = CaptureError::hook_failed("tick", "boom");
        assert_eq!(err.to_string(), "Hook 'tick' failed: boom");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CaptureError = io_err.into();
        assert!(matches!(err, CaptureError::Io(_)));
    }
}
