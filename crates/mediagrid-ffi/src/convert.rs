//! C string and JSON conversion helpers.

use std::ffi::{c_char, CStr, CString};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{invalid, FfiResult};
use crate::handle::MediaGridHandle;

/// Borrow a handle pointer.
///
/// # Safety
/// `handle` must be null or a live pointer from `mediagrid_init`.
pub unsafe fn handle_ref<'a>(handle: *mut MediaGridHandle) -> FfiResult<&'a MediaGridHandle> {
    handle.as_ref().ok_or_else(|| invalid("handle is null"))
}

/// Read a UTF-8 C string argument.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string.
pub unsafe fn cstr_arg<'a>(ptr: *const c_char, name: &str) -> FfiResult<&'a str> {
    if ptr.is_null() {
        return Err(invalid(format!("{} is null", name)));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| invalid(format!("invalid UTF-8 in {}", name)))
}

/// Parse a JSON C string argument.
///
/// # Safety
/// Same as [`cstr_arg`].
pub unsafe fn json_arg<T: DeserializeOwned>(ptr: *const c_char, name: &str) -> FfiResult<T> {
    let json = cstr_arg(ptr, name)?;
    serde_json::from_str(json).map_err(|e| invalid(format!("invalid {}: {}", name, e)))
}

/// Allocate a C string; null if `s` contains an interior NUL.
pub fn string_to_cstr(s: &str) -> *mut c_char {
    CString::new(s)
        .map(|cs| cs.into_raw())
        .unwrap_or(std::ptr::null_mut())
}

/// Serialize `value` into `*out_json`.
///
/// # Safety
/// `out_json` must be null or valid for writes.
pub unsafe fn write_json<T: Serialize>(out_json: *mut *mut c_char, value: &T) -> FfiResult<()> {
    if out_json.is_null() {
        return Err(invalid("out_json is null"));
    }
    let json = serde_json::to_string(value).map_err(|e| invalid(format!("serialize: {}", e)))?;
    *out_json = string_to_cstr(&json);
    Ok(())
}
