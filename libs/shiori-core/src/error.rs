//! Error types for bridge and protocol operations

use thiserror::Error;

use crate::protocol::StatusCode;

/// SHIORI bridge error types
#[derive(Debug, Error)]
pub enum ShioriError {
    /// Operation requires a prior `initialize`
    #[error("bridge is not initialized")]
    NotInitialized,

    /// Operation requires a loaded ghost
    #[error("no ghost is loaded")]
    NotLoaded,

    /// Null, empty, or otherwise unusable path
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Unknown text-encoding code
    #[error("unknown charset code: {0}")]
    UnknownCharset(i32),

    /// Request text could not be parsed as SHIORI/3.0
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// Request carried a protocol version this bridge does not speak
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(String),

    /// The response buffer could not be allocated or finalized
    #[error("response allocation failed")]
    AllocationFailed,

    /// Ghost descriptor parse error
    #[error("descriptor parse error: {0}")]
    ParseError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, ShioriError>;

impl ShioriError {
    /// Check if this error is a caller contract violation (out-of-order
    /// call or invalid argument) rather than an internal failure.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::NotInitialized
                | Self::NotLoaded
                | Self::InvalidPath(_)
                | Self::UnknownCharset(_)
        )
    }

    /// Map this error to the protocol status used when the bridge answers
    /// a failed request on the wire instead of refusing it.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedRequest(_)
            | Self::UnsupportedVersion(_)
            | Self::NotLoaded => StatusCode::BadRequest,

            _ => StatusCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_violations() {
        assert!(ShioriError::NotInitialized.is_contract_violation());
        assert!(ShioriError::InvalidPath("".into()).is_contract_violation());
        assert!(!ShioriError::AllocationFailed.is_contract_violation());
    }

    #[test]
    fn test_status_mapping() {
        let err = ShioriError::MalformedRequest("no status line".into());
        assert_eq!(err.status(), StatusCode::BadRequest);

        assert_eq!(ShioriError::NotLoaded.status(), StatusCode::BadRequest);
        assert_eq!(
            ShioriError::AllocationFailed.status(),
            StatusCode::InternalServerError
        );
    }
}
