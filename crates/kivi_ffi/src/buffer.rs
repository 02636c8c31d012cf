//! Carriers that hand owned data across the C boundary.

use kivi_bridge::SharedBuffer;
use std::ffi::{c_char, CString};

/// A binary view handed to the host.
///
/// `data`/`len` describe the payload; the carrier holds a reference on the
/// shared backing storage, so no copy is made at the boundary and the bytes
/// stay valid until `kivi_free_buffer` releases them, independent of the
/// instance or key they came from.
#[repr(C)]
pub struct KiviBuffer {
    /// Pointer to the payload.
    pub data: *const u8,
    /// Payload length in bytes.
    pub len: usize,
    owner: *mut SharedBuffer,
}

impl KiviBuffer {
    /// Wraps a shared view without copying it.
    pub fn from_shared(view: SharedBuffer) -> Self {
        let owner = Box::into_raw(Box::new(view));
        // Safety: the box lives until kivi_free_buffer reclaims it
        let slice = unsafe { (*owner).as_slice() };
        Self {
            data: slice.as_ptr(),
            len: slice.len(),
            owner,
        }
    }

    /// The carrier for "no value present".
    ///
    /// Distinct from a present zero-length buffer, which holds an owner and
    /// a valid (empty) payload.
    pub fn absent() -> Self {
        Self {
            data: std::ptr::null(),
            len: 0,
            owner: std::ptr::null_mut(),
        }
    }

    /// Returns true if this carries no value.
    pub fn is_absent(&self) -> bool {
        self.owner.is_null()
    }
}

/// Releases a buffer returned by `kivi_get_buffer`.
///
/// # Safety
///
/// The buffer must have been produced by this library and must not be used
/// after this call.
#[no_mangle]
pub unsafe extern "C" fn kivi_free_buffer(buffer: KiviBuffer) {
    if !buffer.owner.is_null() {
        drop(Box::from_raw(buffer.owner));
    }
}

/// A null-terminated UTF-8 string handed to the host.
///
/// Owned by Rust; release with `kivi_free_string`.
#[repr(C)]
pub struct KiviString {
    /// Pointer to the null-terminated text.
    pub ptr: *mut c_char,
    /// Text length in bytes, excluding the terminator.
    pub len: usize,
}

impl KiviString {
    /// Moves a string across the boundary.
    ///
    /// Returns `None` if the text contains an interior null byte, which a C
    /// string cannot carry.
    pub fn new(s: &str) -> Option<Self> {
        let len = s.len();
        let text = CString::new(s).ok()?;
        Some(Self {
            ptr: text.into_raw(),
            len,
        })
    }

    /// The carrier for "no value present".
    pub fn absent() -> Self {
        Self {
            ptr: std::ptr::null_mut(),
            len: 0,
        }
    }

    /// Returns true if this carries no value.
    pub fn is_absent(&self) -> bool {
        self.ptr.is_null()
    }

    /// Views the text as a Rust string slice.
    ///
    /// # Safety
    ///
    /// The string must be absent or hold a pointer produced by
    /// [`KiviString::new`].
    pub unsafe fn as_str(&self) -> Option<&str> {
        if self.ptr.is_null() {
            return None;
        }
        std::ffi::CStr::from_ptr(self.ptr).to_str().ok()
    }
}

/// Releases a string returned by this library.
///
/// # Safety
///
/// The string must have been produced by this library and must not be used
/// after this call.
#[no_mangle]
pub unsafe extern "C" fn kivi_free_string(string: KiviString) {
    if !string.ptr.is_null() {
        drop(CString::from_raw(string.ptr));
    }
}

/// An array of strings, used by `kivi_all_keys`.
///
/// Owned by Rust; `kivi_free_string_array` releases the array and every
/// string in it.
#[repr(C)]
pub struct KiviStringArray {
    /// Pointer to the first element.
    pub items: *mut KiviString,
    /// Number of elements.
    pub len: usize,
}

impl KiviStringArray {
    /// Moves a set of keys across the boundary.
    ///
    /// Keys with interior null bytes cannot be carried and are skipped.
    pub fn from_strings(strings: Vec<String>) -> Self {
        let items: Vec<KiviString> = strings
            .iter()
            .filter_map(|s| KiviString::new(s))
            .collect();
        let mut items = items.into_boxed_slice();
        let ptr = items.as_mut_ptr();
        let len = items.len();
        std::mem::forget(items);

        Self { items: ptr, len }
    }

    /// An array carrying no keys.
    pub fn empty() -> Self {
        Self {
            items: std::ptr::null_mut(),
            len: 0,
        }
    }
}

/// Releases a string array returned by this library, including its strings.
///
/// # Safety
///
/// The array must have been produced by this library and must not be used
/// after this call.
#[no_mangle]
pub unsafe extern "C" fn kivi_free_string_array(array: KiviStringArray) {
    if array.items.is_null() {
        return;
    }
    let items = Vec::from_raw_parts(array.items, array.len, array.len);
    for item in items {
        kivi_free_string(item);
    }
}
