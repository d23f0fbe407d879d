//! Thread-local error handling for FFI.
//!
//! Uses the "last error" pattern common in C APIs. Every exported function
//! clears the slot on entry, runs its body under `catch_unwind` and records a
//! `"<CODE>: <message>"` string on failure.

use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use mediagrid_core::AppError;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Error raised inside an FFI body.
#[derive(Debug)]
pub enum FfiError {
    /// Caller passed something unusable (null pointer, bad UTF-8, bad JSON).
    InvalidArgument(String),
    /// The core reported an error.
    Core(AppError),
}

impl From<AppError> for FfiError {
    fn from(err: AppError) -> Self {
        FfiError::Core(err)
    }
}

impl std::fmt::Display for FfiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FfiError::InvalidArgument(msg) => write!(f, "E_INVALID_ARGUMENT: {}", msg),
            FfiError::Core(err) => write!(f, "{}: {}", err.code(), err),
        }
    }
}

pub type FfiResult<T> = Result<T, FfiError>;

pub fn invalid(msg: impl Into<String>) -> FfiError {
    FfiError::InvalidArgument(msg.into())
}

/// Set the last error message for the current thread.
pub fn set_last_error(msg: impl Into<String>) {
    let msg = msg.into();
    tracing::error!("FFI error: {}", msg);
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error for the current thread.
pub fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Get a pointer to the last error message, or null if none is set.
/// The pointer is valid until the next FFI call on this thread.
pub fn get_last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|e| {
        e.borrow()
            .as_ref()
            .map(|s| s.as_ptr())
            .unwrap_or(std::ptr::null())
    })
}

/// Run an FFI body, mapping errors and panics to `on_error`.
pub fn guard<T>(name: &str, on_error: T, body: impl FnOnce() -> FfiResult<T>) -> T {
    clear_last_error();

    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            set_last_error(format!("{} failed: {}", name, e));
            on_error
        }
        Err(_) => {
            set_last_error(format!("panic in {}", name));
            on_error
        }
    }
}

/// [`guard`] for functions returning `0` / `-1`.
pub fn guard_status(name: &str, body: impl FnOnce() -> FfiResult<()>) -> i32 {
    guard(name, -1, || body().map(|()| 0))
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;

    use super::*;

    fn last_error() -> Option<String> {
        let ptr = get_last_error_ptr();
        if ptr.is_null() {
            None
        } else {
            Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
        }
    }

    #[test]
    fn test_success_clears_error() {
        set_last_error("stale");
        assert_eq!(guard_status("ok", || Ok(())), 0);
        assert!(last_error().is_none());
    }

    #[test]
    fn test_core_error_carries_code() {
        let status = guard_status("page", || Err(AppError::InvalidPageSize(0).into()));
        assert_eq!(status, -1);
        let msg = last_error().unwrap();
        assert!(msg.starts_with("page failed: E_INVALID_PAGE_SIZE"), "{}", msg);
    }

    #[test]
    fn test_panic_is_caught() {
        let value = guard("boom", 7i64, || panic!("boom"));
        assert_eq!(value, 7);
        assert_eq!(last_error().as_deref(), Some("panic in boom"));
    }
}
