//! MediaGrid FFI - C ABI interface for native frontends.
//!
//! # Usage
//!
//! 1. Call `mediagrid_init()` to create a handle
//! 2. Optionally register an event callback with `mediagrid_set_event_callback()`
//! 3. Push media rows with `mediagrid_index_upsert_json()` and query or open sessions
//! 4. Call `mediagrid_shutdown()` to clean up
//!
//! # Error Handling
//!
//! Most functions return `0` on success, `-1` on error.
//! Call `mediagrid_last_error()` to get the error message.
//!
//! # Memory Management
//!
//! - Strings returned via `out_json` must be freed with `mediagrid_free_string()`
//! - The handle must be freed with `mediagrid_shutdown()`

mod albums;
mod callbacks;
mod convert;
mod error;
mod handle;
mod index;
mod logging;
mod photos;
mod sessions;
mod settings;

use std::ffi::{c_char, CString};
use std::path::PathBuf;

use convert::cstr_arg;
use error::{get_last_error_ptr, guard, guard_status};
use handle::MediaGridHandle;

// Re-export all public FFI functions
pub use albums::*;
pub use callbacks::*;
pub use index::*;
pub use photos::*;
pub use sessions::*;
pub use settings::*;

/// Initialize the MediaGrid library.
///
/// `base_dir` may be null to use the platform data directory.
///
/// # Returns
/// - Valid handle pointer on success
/// - `NULL` on error (call `mediagrid_last_error()` for details)
///
/// # Safety
/// `base_dir` must be null or a NUL-terminated UTF-8 string.
/// The returned handle must be freed with `mediagrid_shutdown()`.
#[no_mangle]
pub unsafe extern "C" fn mediagrid_init(base_dir: *const c_char) -> *mut MediaGridHandle {
    guard("mediagrid_init", std::ptr::null_mut(), || {
        let base_dir = if base_dir.is_null() {
            None
        } else {
            Some(PathBuf::from(cstr_arg(base_dir, "base_dir")?))
        };

        let handle = MediaGridHandle::new(base_dir)?;
        tracing::info!("MediaGrid FFI initialized");
        Ok(Box::into_raw(Box::new(handle)))
    })
}

/// Shutdown the MediaGrid library and free resources.
///
/// # Safety
/// - `handle` must be a valid pointer from `mediagrid_init()`
/// - After calling this function, the handle is invalid
#[no_mangle]
pub unsafe extern "C" fn mediagrid_shutdown(handle: *mut MediaGridHandle) {
    if handle.is_null() {
        return;
    }

    guard_status("mediagrid_shutdown", || {
        drop(Box::from_raw(handle));
        tracing::info!("MediaGrid FFI shutdown");
        Ok(())
    });
}

/// Get the last error message.
///
/// The pointer is valid until the next FFI call on this thread; `NULL` if no error.
#[no_mangle]
pub extern "C" fn mediagrid_last_error() -> *const c_char {
    get_last_error_ptr()
}

/// Free a string allocated by the library.
///
/// # Safety
/// - `s` must be a pointer returned by a mediagrid function
/// - After calling this function, the pointer is invalid
#[no_mangle]
pub unsafe extern "C" fn mediagrid_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Get the library version (free with `mediagrid_free_string()`).
#[no_mangle]
pub extern "C" fn mediagrid_version() -> *mut c_char {
    convert::string_to_cstr(env!("CARGO_PKG_VERSION"))
}
