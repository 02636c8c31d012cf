//! Instance FFI functions.

use crate::buffer::{KiviBuffer, KiviString, KiviStringArray};
use crate::error::{clear_last_error, report, set_last_error, KiviResult};
use kivi_bridge::{InstanceConfig, StoreInstance};
use std::ffi::{c_char, CStr};

/// Opaque handle to one open store instance.
#[repr(C)]
pub struct KiviHandle {
    _private: [u8; 0],
}

unsafe fn instance<'a>(handle: *mut KiviHandle) -> &'a StoreInstance {
    &*(handle as *mut StoreInstance)
}

unsafe fn cstr_arg<'a>(ptr: *const c_char, what: &str) -> Result<&'a str, KiviResult> {
    if ptr.is_null() {
        set_last_error(format!("null {what} pointer"));
        return Err(KiviResult::NullPointer);
    }
    CStr::from_ptr(ptr).to_str().map_err(|_| {
        set_last_error(format!("invalid UTF-8 in {what}"));
        KiviResult::InvalidArgument
    })
}

/// Opens a store instance.
///
/// # Arguments
///
/// * `id` - Null-terminated instance identifier
/// * `path` - Null-terminated directory path, or null for the default
/// * `key` - Encryption key bytes, or null for unencrypted
/// * `key_len` - Length of `key` in bytes
/// * `mode` - Null-terminated mode tag (`"single-process"` or
///   `"multi-process"`), or null for single-process
/// * `out_handle` - Output pointer for the instance handle
///
/// # Returns
///
/// `KiviResult::Ok` on success, error code otherwise.
///
/// # Safety
///
/// - `id`, `path` and `mode` must be valid null-terminated UTF-8 strings
///   (or null where allowed)
/// - `key` must be valid for `key_len` bytes, or null with `key_len == 0`
/// - `out_handle` must be a valid pointer
#[no_mangle]
pub unsafe extern "C" fn kivi_open(
    id: *const c_char,
    path: *const c_char,
    key: *const u8,
    key_len: usize,
    mode: *const c_char,
    out_handle: *mut *mut KiviHandle,
) -> KiviResult {
    clear_last_error();

    if out_handle.is_null() {
        set_last_error("null pointer argument");
        return KiviResult::NullPointer;
    }
    if key.is_null() && key_len > 0 {
        set_last_error("null key pointer with non-zero length");
        return KiviResult::InvalidArgument;
    }

    let id = match cstr_arg(id, "id") {
        Ok(s) => s,
        Err(code) => return code,
    };

    let mut config = InstanceConfig::new(id);
    if !path.is_null() {
        match cstr_arg(path, "path") {
            Ok(p) => config = config.path(p),
            Err(code) => return code,
        }
    }
    if key_len > 0 {
        config = config.encryption_key(std::slice::from_raw_parts(key, key_len).to_vec());
    }
    if !mode.is_null() {
        match cstr_arg(mode, "mode") {
            Ok(m) => config = config.mode(m),
            Err(code) => return code,
        }
    }

    match StoreInstance::create(config) {
        Ok(instance) => {
            let boxed = Box::new(instance);
            *out_handle = Box::into_raw(boxed) as *mut KiviHandle;
            KiviResult::Ok
        }
        Err(e) => report(&e),
    }
}

/// Closes a store instance.
///
/// # Safety
///
/// The handle must have been returned by `kivi_open` and must not be used
/// after this call.
#[no_mangle]
pub unsafe extern "C" fn kivi_close(handle: *mut KiviHandle) -> KiviResult {
    clear_last_error();

    if handle.is_null() {
        set_last_error("null pointer argument");
        return KiviResult::NullPointer;
    }

    // Take ownership and drop; teardown runs in Drop
    drop(Box::from_raw(handle as *mut StoreInstance));
    KiviResult::Ok
}

/// Stores a boolean value.
///
/// # Safety
///
/// `handle` must be a valid instance handle and `key` a valid
/// null-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn kivi_set_bool(
    handle: *mut KiviHandle,
    key: *const c_char,
    value: bool,
) -> KiviResult {
    clear_last_error();
    if handle.is_null() {
        set_last_error("null instance handle");
        return KiviResult::NullPointer;
    }
    let key = match cstr_arg(key, "key") {
        Ok(s) => s,
        Err(code) => return code,
    };
    match instance(handle).set(key, &value.into()) {
        Ok(()) => KiviResult::Ok,
        Err(e) => report(&e),
    }
}

/// Stores a number value.
///
/// # Safety
///
/// `handle` must be a valid instance handle and `key` a valid
/// null-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn kivi_set_number(
    handle: *mut KiviHandle,
    key: *const c_char,
    value: f64,
) -> KiviResult {
    clear_last_error();
    if handle.is_null() {
        set_last_error("null instance handle");
        return KiviResult::NullPointer;
    }
    let key = match cstr_arg(key, "key") {
        Ok(s) => s,
        Err(code) => return code,
    };
    match instance(handle).set(key, &value.into()) {
        Ok(()) => KiviResult::Ok,
        Err(e) => report(&e),
    }
}

/// Stores a string value.
///
/// # Safety
///
/// `handle` must be a valid instance handle; `key` and `value` must be
/// valid null-terminated UTF-8 strings.
#[no_mangle]
pub unsafe extern "C" fn kivi_set_string(
    handle: *mut KiviHandle,
    key: *const c_char,
    value: *const c_char,
) -> KiviResult {
    clear_last_error();
    if handle.is_null() {
        set_last_error("null instance handle");
        return KiviResult::NullPointer;
    }
    let key = match cstr_arg(key, "key") {
        Ok(s) => s,
        Err(code) => return code,
    };
    let value = match cstr_arg(value, "value") {
        Ok(s) => s,
        Err(code) => return code,
    };
    match instance(handle).set(key, &value.into()) {
        Ok(()) => KiviResult::Ok,
        Err(e) => report(&e),
    }
}

/// Stores a binary value.
///
/// # Safety
///
/// `handle` must be a valid instance handle, `key` a valid null-terminated
/// UTF-8 string, and `data` valid for `data_len` bytes (or null with
/// `data_len == 0`).
#[no_mangle]
pub unsafe extern "C" fn kivi_set_buffer(
    handle: *mut KiviHandle,
    key: *const c_char,
    data: *const u8,
    data_len: usize,
) -> KiviResult {
    clear_last_error();
    if handle.is_null() {
        set_last_error("null instance handle");
        return KiviResult::NullPointer;
    }
    if data.is_null() && data_len > 0 {
        set_last_error("null data pointer with non-zero length");
        return KiviResult::InvalidArgument;
    }
    let key = match cstr_arg(key, "key") {
        Ok(s) => s,
        Err(code) => return code,
    };
    let payload = if data_len > 0 {
        std::slice::from_raw_parts(data, data_len).to_vec()
    } else {
        Vec::new()
    };
    match instance(handle).set(key, &payload.into()) {
        Ok(()) => KiviResult::Ok,
        Err(e) => report(&e),
    }
}

/// Reads a boolean value.
///
/// Returns `KiviResult::NotFound` if the key is absent or holds a value of
/// another type; `out_value` is untouched in that case.
///
/// # Safety
///
/// `handle` must be a valid instance handle, `key` a valid null-terminated
/// UTF-8 string, `out_value` a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn kivi_get_bool(
    handle: *mut KiviHandle,
    key: *const c_char,
    out_value: *mut bool,
) -> KiviResult {
    clear_last_error();
    if handle.is_null() || out_value.is_null() {
        set_last_error("null pointer argument");
        return KiviResult::NullPointer;
    }
    let key = match cstr_arg(key, "key") {
        Ok(s) => s,
        Err(code) => return code,
    };
    match instance(handle).get_boolean(key) {
        Ok(Some(value)) => {
            *out_value = value;
            KiviResult::Ok
        }
        Ok(None) => KiviResult::NotFound,
        Err(e) => report(&e),
    }
}

/// Reads a number value.
///
/// Returns `KiviResult::NotFound` if the key is absent or holds a value of
/// another type; `out_value` is untouched in that case.
///
/// # Safety
///
/// `handle` must be a valid instance handle, `key` a valid null-terminated
/// UTF-8 string, `out_value` a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn kivi_get_number(
    handle: *mut KiviHandle,
    key: *const c_char,
    out_value: *mut f64,
) -> KiviResult {
    clear_last_error();
    if handle.is_null() || out_value.is_null() {
        set_last_error("null pointer argument");
        return KiviResult::NullPointer;
    }
    let key = match cstr_arg(key, "key") {
        Ok(s) => s,
        Err(code) => return code,
    };
    match instance(handle).get_number(key) {
        Ok(Some(value)) => {
            *out_value = value;
            KiviResult::Ok
        }
        Ok(None) => KiviResult::NotFound,
        Err(e) => report(&e),
    }
}

/// Reads a string value.
///
/// Returns `KiviResult::NotFound` if the key is absent or holds a value of
/// another type; `out_value` is set to the absent string in that case.
///
/// # Safety
///
/// `handle` must be a valid instance handle, `key` a valid null-terminated
/// UTF-8 string, `out_value` a valid pointer. On `Ok` the caller owns the
/// string and must release it with `kivi_free_string`.
#[no_mangle]
pub unsafe extern "C" fn kivi_get_string(
    handle: *mut KiviHandle,
    key: *const c_char,
    out_value: *mut KiviString,
) -> KiviResult {
    clear_last_error();
    if handle.is_null() || out_value.is_null() {
        set_last_error("null pointer argument");
        return KiviResult::NullPointer;
    }
    let key = match cstr_arg(key, "key") {
        Ok(s) => s,
        Err(code) => return code,
    };
    match instance(handle).get_string(key) {
        Ok(Some(value)) => match KiviString::new(&value) {
            Some(s) => {
                *out_value = s;
                KiviResult::Ok
            }
            None => {
                set_last_error("stored string contains a null byte");
                *out_value = KiviString::absent();
                KiviResult::Error
            }
        },
        Ok(None) => {
            *out_value = KiviString::absent();
            KiviResult::NotFound
        }
        Err(e) => {
            *out_value = KiviString::absent();
            report(&e)
        }
    }
}

/// Reads a binary value.
///
/// Returns `KiviResult::NotFound` if the key is absent or holds a value of
/// another type; `out_buffer` is set to the absent buffer in that case. On
/// `Ok` the buffer is a shared view onto the stored bytes, made without
/// copying; it stays valid after later mutations of the key and after
/// `kivi_close`.
///
/// # Safety
///
/// `handle` must be a valid instance handle, `key` a valid null-terminated
/// UTF-8 string, `out_buffer` a valid pointer. On `Ok` the caller owns the
/// buffer and must release it with `kivi_free_buffer`.
#[no_mangle]
pub unsafe extern "C" fn kivi_get_buffer(
    handle: *mut KiviHandle,
    key: *const c_char,
    out_buffer: *mut KiviBuffer,
) -> KiviResult {
    clear_last_error();
    if handle.is_null() || out_buffer.is_null() {
        set_last_error("null pointer argument");
        return KiviResult::NullPointer;
    }
    let key = match cstr_arg(key, "key") {
        Ok(s) => s,
        Err(code) => return code,
    };
    match instance(handle).get_buffer(key) {
        Ok(Some(view)) => {
            *out_buffer = KiviBuffer::from_shared(view);
            KiviResult::Ok
        }
        Ok(None) => {
            *out_buffer = KiviBuffer::absent();
            KiviResult::NotFound
        }
        Err(e) => {
            *out_buffer = KiviBuffer::absent();
            report(&e)
        }
    }
}

/// Checks whether a key exists, independent of type.
///
/// # Safety
///
/// `handle` must be a valid instance handle, `key` a valid null-terminated
/// UTF-8 string, `out_exists` a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn kivi_contains(
    handle: *mut KiviHandle,
    key: *const c_char,
    out_exists: *mut bool,
) -> KiviResult {
    clear_last_error();
    if handle.is_null() || out_exists.is_null() {
        set_last_error("null pointer argument");
        return KiviResult::NullPointer;
    }
    let key = match cstr_arg(key, "key") {
        Ok(s) => s,
        Err(code) => return code,
    };
    match instance(handle).contains(key) {
        Ok(exists) => {
            *out_exists = exists;
            KiviResult::Ok
        }
        Err(e) => report(&e),
    }
}

/// Removes a key. Removing an absent key succeeds.
///
/// # Safety
///
/// `handle` must be a valid instance handle and `key` a valid
/// null-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn kivi_delete(
    handle: *mut KiviHandle,
    key: *const c_char,
) -> KiviResult {
    clear_last_error();
    if handle.is_null() {
        set_last_error("null instance handle");
        return KiviResult::NullPointer;
    }
    let key = match cstr_arg(key, "key") {
        Ok(s) => s,
        Err(code) => return code,
    };
    match instance(handle).delete(key) {
        Ok(()) => KiviResult::Ok,
        Err(e) => report(&e),
    }
}

/// Enumerates all keys.
///
/// # Safety
///
/// `handle` must be a valid instance handle and `out_keys` a valid
/// pointer. On `Ok` the caller owns the array and must release it with
/// `kivi_free_string_array`.
#[no_mangle]
pub unsafe extern "C" fn kivi_all_keys(
    handle: *mut KiviHandle,
    out_keys: *mut KiviStringArray,
) -> KiviResult {
    clear_last_error();
    if handle.is_null() || out_keys.is_null() {
        set_last_error("null pointer argument");
        return KiviResult::NullPointer;
    }
    match instance(handle).get_all_keys() {
        Ok(keys) => {
            *out_keys = KiviStringArray::from_strings(keys);
            KiviResult::Ok
        }
        Err(e) => {
            *out_keys = KiviStringArray::empty();
            report(&e)
        }
    }
}

/// Removes every entry.
///
/// # Safety
///
/// `handle` must be a valid instance handle.
#[no_mangle]
pub unsafe extern "C" fn kivi_delete_all(handle: *mut KiviHandle) -> KiviResult {
    clear_last_error();
    if handle.is_null() {
        set_last_error("null instance handle");
        return KiviResult::NullPointer;
    }
    match instance(handle).delete_all() {
        Ok(()) => KiviResult::Ok,
        Err(e) => report(&e),
    }
}

/// Atomically re-keys the store. A null `new_key` removes encryption.
///
/// # Safety
///
/// `handle` must be a valid instance handle; `new_key` must be a valid
/// null-terminated UTF-8 string or null.
#[no_mangle]
pub unsafe extern "C" fn kivi_recrypt(
    handle: *mut KiviHandle,
    new_key: *const c_char,
) -> KiviResult {
    clear_last_error();
    if handle.is_null() {
        set_last_error("null instance handle");
        return KiviResult::NullPointer;
    }
    let new_key = if new_key.is_null() {
        None
    } else {
        match cstr_arg(new_key, "encryptionKey") {
            Ok(s) => Some(s),
            Err(code) => return code,
        }
    };
    match instance(handle).recrypt(new_key) {
        Ok(()) => KiviResult::Ok,
        Err(e) => report(&e),
    }
}

/// Flushes caches and compacts the backing storage.
///
/// # Safety
///
/// `handle` must be a valid instance handle.
#[no_mangle]
pub unsafe extern "C" fn kivi_trim(handle: *mut KiviHandle) -> KiviResult {
    clear_last_error();
    if handle.is_null() {
        set_last_error("null instance handle");
        return KiviResult::NullPointer;
    }
    match instance(handle).trim() {
        Ok(()) => KiviResult::Ok,
        Err(e) => report(&e),
    }
}

/// Reports the current physical size of the store in bytes.
///
/// # Safety
///
/// `handle` must be a valid instance handle and `out_size` a valid
/// pointer.
#[no_mangle]
pub unsafe extern "C" fn kivi_size(
    handle: *mut KiviHandle,
    out_size: *mut u64,
) -> KiviResult {
    clear_last_error();
    if handle.is_null() || out_size.is_null() {
        set_last_error("null pointer argument");
        return KiviResult::NullPointer;
    }
    match instance(handle).size() {
        Ok(size) => {
            *out_size = size;
            KiviResult::Ok
        }
        Err(e) => report(&e),
    }
}

/// Returns the library version as a null-terminated string.
///
/// The returned pointer is static and should not be freed.
#[no_mangle]
pub extern "C" fn kivi_version() -> *const c_char {
    static VERSION: &[u8] = b"0.3.0\0";
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{kivi_free_buffer, kivi_free_string, kivi_free_string_array};
    use std::ffi::CString;
    use tempfile::tempdir;

    unsafe fn open_at(dir: &std::path::Path, id: &str) -> *mut KiviHandle {
        let id = CString::new(id).unwrap();
        let path = CString::new(dir.to_str().unwrap()).unwrap();
        let mut handle: *mut KiviHandle = std::ptr::null_mut();
        let result = kivi_open(
            id.as_ptr(),
            path.as_ptr(),
            std::ptr::null(),
            0,
            std::ptr::null(),
            &mut handle,
        );
        assert_eq!(result, KiviResult::Ok);
        assert!(!handle.is_null());
        handle
    }

    #[test]
    fn open_and_close() {
        let dir = tempdir().unwrap();
        unsafe {
            let handle = open_at(dir.path(), "ffi-open");
            assert_eq!(kivi_close(handle), KiviResult::Ok);
        }
    }

    #[test]
    fn set_and_get_each_type() {
        let dir = tempdir().unwrap();
        unsafe {
            let handle = open_at(dir.path(), "ffi-types");
            let kb = CString::new("b").unwrap();
            let kn = CString::new("n").unwrap();
            let ks = CString::new("s").unwrap();
            let kx = CString::new("x").unwrap();

            assert_eq!(kivi_set_bool(handle, kb.as_ptr(), true), KiviResult::Ok);
            assert_eq!(kivi_set_number(handle, kn.as_ptr(), 2.5), KiviResult::Ok);
            let sv = CString::new("hello").unwrap();
            assert_eq!(
                kivi_set_string(handle, ks.as_ptr(), sv.as_ptr()),
                KiviResult::Ok
            );
            let data = [1u8, 2, 3];
            assert_eq!(
                kivi_set_buffer(handle, kx.as_ptr(), data.as_ptr(), data.len()),
                KiviResult::Ok
            );

            let mut b = false;
            assert_eq!(kivi_get_bool(handle, kb.as_ptr(), &mut b), KiviResult::Ok);
            assert!(b);

            let mut n = 0.0;
            assert_eq!(kivi_get_number(handle, kn.as_ptr(), &mut n), KiviResult::Ok);
            assert_eq!(n, 2.5);

            let mut s = KiviString::absent();
            assert_eq!(kivi_get_string(handle, ks.as_ptr(), &mut s), KiviResult::Ok);
            assert_eq!(s.as_str(), Some("hello"));
            kivi_free_string(s);

            let mut x = KiviBuffer::absent();
            assert_eq!(kivi_get_buffer(handle, kx.as_ptr(), &mut x), KiviResult::Ok);
            assert_eq!(std::slice::from_raw_parts(x.data, x.len), &[1, 2, 3]);
            kivi_free_buffer(x);

            kivi_close(handle);
        }
    }

    #[test]
    fn absent_key_reports_not_found() {
        let dir = tempdir().unwrap();
        unsafe {
            let handle = open_at(dir.path(), "ffi-absent");
            let key = CString::new("missing").unwrap();

            let mut n = 42.0;
            assert_eq!(
                kivi_get_number(handle, key.as_ptr(), &mut n),
                KiviResult::NotFound
            );
            assert_eq!(n, 42.0); // untouched

            let mut buffer = KiviBuffer::absent();
            assert_eq!(
                kivi_get_buffer(handle, key.as_ptr(), &mut buffer),
                KiviResult::NotFound
            );
            assert!(buffer.is_absent());

            kivi_close(handle);
        }
    }

    #[test]
    fn buffer_outlives_key_and_instance() {
        let dir = tempdir().unwrap();
        unsafe {
            let handle = open_at(dir.path(), "ffi-outlive");
            let key = CString::new("blob").unwrap();
            let data = [9u8, 8, 7];
            kivi_set_buffer(handle, key.as_ptr(), data.as_ptr(), data.len());

            let mut buffer = KiviBuffer::absent();
            assert_eq!(
                kivi_get_buffer(handle, key.as_ptr(), &mut buffer),
                KiviResult::Ok
            );

            // the view holds its own reference on the storage
            kivi_delete(handle, key.as_ptr());
            kivi_close(handle);
            assert_eq!(std::slice::from_raw_parts(buffer.data, buffer.len), &[9, 8, 7]);
            kivi_free_buffer(buffer);
        }
    }

    #[test]
    fn contains_delete_and_all_keys() {
        let dir = tempdir().unwrap();
        unsafe {
            let handle = open_at(dir.path(), "ffi-keys");
            let key = CString::new("k").unwrap();

            kivi_set_number(handle, key.as_ptr(), 1.0);

            let mut exists = false;
            assert_eq!(
                kivi_contains(handle, key.as_ptr(), &mut exists),
                KiviResult::Ok
            );
            assert!(exists);

            let mut keys = KiviStringArray::empty();
            assert_eq!(kivi_all_keys(handle, &mut keys), KiviResult::Ok);
            assert_eq!(keys.len, 1);
            kivi_free_string_array(keys);

            assert_eq!(kivi_delete(handle, key.as_ptr()), KiviResult::Ok);
            kivi_contains(handle, key.as_ptr(), &mut exists);
            assert!(!exists);

            // deleting again is still Ok
            assert_eq!(kivi_delete(handle, key.as_ptr()), KiviResult::Ok);

            kivi_close(handle);
        }
    }

    #[test]
    fn recrypt_trim_and_size() {
        let dir = tempdir().unwrap();
        unsafe {
            let handle = open_at(dir.path(), "ffi-maint");
            let key = CString::new("k").unwrap();
            for _ in 0..8 {
                kivi_set_number(handle, key.as_ptr(), 1.0);
            }

            let mut before = 0u64;
            assert_eq!(kivi_size(handle, &mut before), KiviResult::Ok);

            let secret = CString::new("secret").unwrap();
            assert_eq!(kivi_recrypt(handle, secret.as_ptr()), KiviResult::Ok);
            assert_eq!(kivi_recrypt(handle, std::ptr::null()), KiviResult::Ok);

            assert_eq!(kivi_trim(handle), KiviResult::Ok);
            let mut after = 0u64;
            assert_eq!(kivi_size(handle, &mut after), KiviResult::Ok);
            assert!(after <= before);

            let mut n = 0.0;
            assert_eq!(kivi_get_number(handle, key.as_ptr(), &mut n), KiviResult::Ok);
            assert_eq!(n, 1.0);

            kivi_close(handle);
        }
    }

    #[test]
    fn open_failures_map_to_codes() {
        let dir = tempdir().unwrap();
        unsafe {
            let path = CString::new(dir.path().to_str().unwrap()).unwrap();
            let mut handle: *mut KiviHandle = std::ptr::null_mut();

            let empty = CString::new("").unwrap();
            assert_eq!(
                kivi_open(
                    empty.as_ptr(),
                    path.as_ptr(),
                    std::ptr::null(),
                    0,
                    std::ptr::null(),
                    &mut handle,
                ),
                KiviResult::EmptyIdentifier
            );

            let id = CString::new("toolong").unwrap();
            let key = [0u8; 17];
            assert_eq!(
                kivi_open(
                    id.as_ptr(),
                    path.as_ptr(),
                    key.as_ptr(),
                    key.len(),
                    std::ptr::null(),
                    &mut handle,
                ),
                KiviResult::KeyTooLong
            );

            let id = CString::new("badmode").unwrap();
            let mode = CString::new("dual-process").unwrap();
            assert_eq!(
                kivi_open(
                    id.as_ptr(),
                    path.as_ptr(),
                    std::ptr::null(),
                    0,
                    mode.as_ptr(),
                    &mut handle,
                ),
                KiviResult::InvalidMode
            );
            assert!(!kivi_get_last_error_is_null());
        }
    }

    fn kivi_get_last_error_is_null() -> bool {
        crate::error::kivi_get_last_error().is_null()
    }

    #[test]
    fn null_pointer_handling() {
        unsafe {
            let result = kivi_open(
                std::ptr::null(),
                std::ptr::null(),
                std::ptr::null(),
                0,
                std::ptr::null(),
                std::ptr::null_mut(),
            );
            assert_eq!(result, KiviResult::NullPointer);

            assert_eq!(kivi_close(std::ptr::null_mut()), KiviResult::NullPointer);
            assert_eq!(kivi_trim(std::ptr::null_mut()), KiviResult::NullPointer);
        }
    }

    #[test]
    fn version() {
        let ver = kivi_version();
        assert!(!ver.is_null());

        let s = unsafe { std::ffi::CStr::from_ptr(ver) };
        assert_eq!(s.to_str().unwrap(), "0.3.0");
    }
}
