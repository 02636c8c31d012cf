//! Error types for store operations.

use std::io;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Another handle holds the store's advisory lock.
    #[error("store locked: another process has access to \"{id}\"")]
    LockHeld {
        /// Identifier of the contended store.
        id: String,
    },

    /// The store identifier is empty.
    #[error("store identifier cannot be empty")]
    EmptyId,

    /// The log file header or a record is malformed.
    #[error("invalid store format: {message}")]
    InvalidFormat {
        /// Description of the format issue.
        message: String,
    },

    /// A record's stored checksum doesn't match the computed one.
    #[error("checksum mismatch: expected {expected:08x}, got {actual:08x}")]
    ChecksumMismatch {
        /// Checksum stored in the record.
        expected: u32,
        /// Checksum computed over the record bytes.
        actual: u32,
    },

    /// A key exceeds the framing limit.
    #[error("key too long: {len} bytes exceeds maximum of {max}")]
    KeyTooLong {
        /// Actual key length in bytes.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// A value payload exceeds the framing limit.
    #[error("value too large: {len} bytes exceeds maximum of {max}")]
    ValueTooLarge {
        /// Actual payload length in bytes.
        len: usize,
        /// Maximum allowed length.
        max: u64,
    },

    /// The encryption key has an unsupported length.
    #[error("invalid encryption key length: {len} bytes (expected 1 to {max})")]
    InvalidKeyLength {
        /// Actual key length in bytes.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// Encryption or decryption failed.
    #[error("encryption error: {message}")]
    Encryption {
        /// Description of the failure.
        message: String,
    },
}

impl StoreError {
    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Creates an encryption error.
    pub fn encryption(message: impl Into<String>) -> Self {
        Self::Encryption {
            message: message.into(),
        }
    }
}
