//! Error types for Canopy
//!
//! This module defines the error types used throughout the workspace.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! There are three kinds of failure:
//! - serialization failures (`CanopyError::Serialization`)
//! - store I/O failures, including an expired deadline (`CanopyError::Storage`)
//! - contract violations, which are panics and never appear here
//!
//! A commit whose gate condition did not hold is not an error at all; the
//! engine reports it as a plain boolean.

use std::fmt;

use thiserror::Error;

/// Result type alias for Canopy operations
pub type CanopyResult<T> = std::result::Result<T, CanopyError>;

/// Failures raised by a key-value backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The caller's deadline expired before the operation could run
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The backend has been closed
    #[error("store is closed")]
    Closed,

    /// Any other backend failure (network, poisoned state, ...)
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Encode/decode failures of the entity envelope
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Payload could not be encoded
    #[error("encode failed: {0}")]
    Encode(String),

    /// Payload could not be decoded
    #[error("decode failed: {0}")]
    Decode(String),

    /// Stored kind does not match the target type
    #[error("kind mismatch: expected {expected}, found {found}")]
    KindMismatch {
        /// Kind the reader expected
        expected: String,
        /// Kind found in the envelope
        found: String,
    },

    /// Stored schema version is newer than the reader understands
    #[error("unsupported schema version {found} for {kind} (max {max})")]
    UnsupportedVersion {
        /// Entity kind
        kind: String,
        /// Version found in the envelope
        found: u8,
        /// Highest version this reader supports
        max: u8,
    },
}

/// Top-level error type for Canopy
#[derive(Debug, Error)]
pub enum CanopyError {
    /// An entity could not be encoded or decoded
    #[error("Serialization error for {kind} '{key}': {source}")]
    Serialization {
        /// Entity kind
        kind: String,
        /// Storage key of the entity
        key: String,
        /// Underlying codec failure
        source: CodecError,
    },

    /// The store failed to serve a read or a commit
    #[error("Storage error at {location} (key '{key}'): {source}")]
    Storage {
        /// Caller-supplied location tag
        location: String,
        /// Key the operation was about
        key: String,
        /// Underlying backend failure
        source: BackendError,
    },

    /// Malformed input (configuration, keys, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Failure outside the store (config file I/O, ...)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CanopyError {
    /// Wrap a codec failure with the entity kind and key
    pub fn serialization(kind: impl Into<String>, key: impl Into<String>, source: CodecError) -> Self {
        CanopyError::Serialization {
            kind: kind.into(),
            key: key.into(),
            source,
        }
    }

    /// Wrap a backend failure with the caller location and key
    pub fn storage(location: impl Into<String>, key: impl fmt::Display, source: BackendError) -> Self {
        CanopyError::Storage {
            location: location.into(),
            key: key.to_string(),
            source,
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CanopyError::InvalidInput(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        CanopyError::Internal(message.into())
    }

    /// Returns true if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, CanopyError::Serialization { .. })
    }

    /// Returns true if this is a storage error
    pub fn is_storage(&self) -> bool {
        matches!(self, CanopyError::Storage { .. })
    }

    /// Returns true if the store reported an expired deadline
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(
            self,
            CanopyError::Storage {
                source: BackendError::DeadlineExceeded,
                ..
            }
        )
    }
}
