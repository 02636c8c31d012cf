//! Error codes and result types.

use kivi_bridge::BridgeError;
use std::cell::RefCell;
use std::ffi::CString;

/// Result code for FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KiviResult {
    /// Operation succeeded.
    Ok = 0,
    /// Generic error.
    Error = 1,
    /// Invalid argument.
    InvalidArgument = 2,
    /// Key not present (or holds a value of another type).
    NotFound = 3,
    /// Instance is closed.
    Closed = 4,
    /// Instance identifier was empty.
    EmptyIdentifier = 5,
    /// Encryption key exceeds the 16-byte limit.
    KeyTooLong = 6,
    /// Instance could not be created.
    CreationFailed = 7,
    /// Unknown process-sharing mode tag.
    InvalidMode = 8,
    /// Value has no typed store mapping.
    UnsupportedValue = 9,
    /// Underlying store error.
    StoreError = 10,
    /// Null pointer.
    NullPointer = 11,
}

impl KiviResult {
    /// Returns true if the result indicates success.
    pub fn is_ok(self) -> bool {
        self == KiviResult::Ok
    }

    /// Returns true if the result indicates an error.
    pub fn is_err(self) -> bool {
        self != KiviResult::Ok
    }
}

/// Error code type for C compatibility.
pub type ErrorCode = i32;

impl From<KiviResult> for ErrorCode {
    fn from(result: KiviResult) -> Self {
        result as ErrorCode
    }
}

/// Maps a bridge error to its FFI code and records its message.
pub(crate) fn report(err: &BridgeError) -> KiviResult {
    set_last_error(err.to_string());
    match err {
        BridgeError::EmptyIdentifier => KiviResult::EmptyIdentifier,
        BridgeError::EncryptionKeyTooLong { .. } => KiviResult::KeyTooLong,
        BridgeError::InstanceCreationFailed { .. } => KiviResult::CreationFailed,
        BridgeError::InvalidConfiguration { .. } => KiviResult::InvalidMode,
        BridgeError::InvalidKeyType { .. }
        | BridgeError::InvalidArgumentType { .. }
        | BridgeError::ArityMismatch { .. } => KiviResult::InvalidArgument,
        BridgeError::UnsupportedValueType { .. } => KiviResult::UnsupportedValue,
        BridgeError::InstanceClosed { .. } => KiviResult::Closed,
        BridgeError::Store(_) => KiviResult::StoreError,
    }
}

// Thread-local storage for last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Sets the last error message.
pub fn set_last_error(message: impl Into<String>) {
    let msg = message.into();
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clears the last error.
pub fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Gets the last error message as a C string.
///
/// Returns null if no error is set.
///
/// # Safety
///
/// The returned pointer is valid until the next FFI call on this thread.
#[no_mangle]
pub extern "C" fn kivi_get_last_error() -> *const std::ffi::c_char {
    LAST_ERROR.with(|e| match e.borrow().as_ref() {
        Some(cstr) => cstr.as_ptr(),
        None => std::ptr::null(),
    })
}

/// Clears the last error message.
#[no_mangle]
pub extern "C" fn kivi_clear_error() {
    clear_last_error();
}
