//! Error types for the bridge.

use kivi_store::StoreError;
use thiserror::Error;

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors raised at the bridge boundary.
///
/// Validation errors are raised synchronously at the call site that detected
/// them, before any store mutation. A failed call does not poison the
/// instance; only construction failures prevent an instance from existing at
/// all.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Instance creation failed and the identifier was empty.
    #[error("failed to create store instance: `id` cannot be empty")]
    EmptyIdentifier,

    /// Instance creation failed and the encryption key was oversized.
    #[error(
        "failed to create store instance: `encryptionKey` cannot be longer than 16 bytes (got {len})"
    )]
    EncryptionKeyTooLong {
        /// Length of the rejected key in bytes.
        len: usize,
    },

    /// Instance creation failed for no diagnosable configuration reason.
    #[error("failed to create store instance \"{id}\"")]
    InstanceCreationFailed {
        /// Identifier of the instance that could not be created.
        id: String,
    },

    /// The process-sharing mode tag is not recognized.
    #[error(
        "invalid mode \"{mode}\": expected \"single-process\" or \"multi-process\""
    )]
    InvalidConfiguration {
        /// The rejected mode tag.
        mode: String,
    },

    /// The key argument is not a string.
    #[error("{op}: first argument ('key') has to be of type string (got {actual})")]
    InvalidKeyType {
        /// Operation that rejected the key.
        op: &'static str,
        /// Shape of the rejected argument.
        actual: &'static str,
    },

    /// An argument has the wrong shape for this operation.
    #[error("{op}: argument '{argument}' has to be of type {expected} (got {actual})")]
    InvalidArgumentType {
        /// Operation that rejected the argument.
        op: &'static str,
        /// Name of the offending argument.
        argument: &'static str,
        /// Expected shape.
        expected: &'static str,
        /// Shape that was received.
        actual: &'static str,
    },

    /// The value argument has no typed store mapping.
    #[error(
        "{op}: 'value' argument is not of type boolean, number, string or buffer (got {actual})"
    )]
    UnsupportedValueType {
        /// Operation that rejected the value.
        op: &'static str,
        /// Shape that was received.
        actual: &'static str,
    },

    /// The call carried the wrong number of arguments.
    #[error("{op}: expected {expected} argument(s), but received {actual}")]
    ArityMismatch {
        /// Operation that rejected the call.
        op: &'static str,
        /// Expected argument count.
        expected: usize,
        /// Received argument count.
        actual: usize,
    },

    /// The instance has already been destroyed.
    #[error("store instance \"{id}\" is closed")]
    InstanceClosed {
        /// Identifier of the closed instance.
        id: String,
    },

    /// An engine error surfaced through the bridge.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_failures_are_distinguishable() {
        let empty = BridgeError::EmptyIdentifier.to_string();
        let oversized = BridgeError::EncryptionKeyTooLong { len: 17 }.to_string();
        let generic = BridgeError::InstanceCreationFailed {
            id: "x".to_string(),
        }
        .to_string();

        assert_ne!(empty, oversized);
        assert_ne!(empty, generic);
        assert_ne!(oversized, generic);
        assert!(empty.contains("`id`"));
        assert!(oversized.contains("16 bytes"));
    }

    #[test]
    fn messages_name_the_offending_argument() {
        let err = BridgeError::InvalidKeyType {
            op: "set",
            actual: "number",
        };
        let msg = err.to_string();
        assert!(msg.contains("'key'"));
        assert!(msg.contains("string"));
        assert!(msg.contains("number"));

        let err = BridgeError::InvalidArgumentType {
            op: "recrypt",
            argument: "encryptionKey",
            expected: "string (or undefined)",
            actual: "array",
        };
        let msg = err.to_string();
        assert!(msg.contains("'encryptionKey'"));
        assert!(msg.contains("string (or undefined)"));
    }

    #[test]
    fn arity_mismatch_reports_counts() {
        let msg = BridgeError::ArityMismatch {
            op: "set",
            expected: 2,
            actual: 1,
        }
        .to_string();
        assert!(msg.contains('2'));
        assert!(msg.contains('1'));
    }
}
