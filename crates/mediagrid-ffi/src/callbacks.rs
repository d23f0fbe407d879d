//! Event callback registration API.

use std::ffi::c_void;

use crate::convert::handle_ref;
use crate::error::guard_status;
use crate::handle::{EventCallback, MediaGridHandle};

/// Register an event callback.
///
/// Events: `session-photos-changed`, `session-loading-changed`,
/// `session-error`. The callback runs on a worker thread.
///
/// # Safety
/// - `handle` must be a valid pointer from `mediagrid_init`.
/// - `callback` must be a valid function pointer.
/// - `user_data` must remain valid for the lifetime of the callback registration.
#[no_mangle]
pub unsafe extern "C" fn mediagrid_set_event_callback(
    handle: *mut MediaGridHandle,
    callback: EventCallback,
    user_data: *mut c_void,
) -> i32 {
    guard_status("mediagrid_set_event_callback", || {
        handle_ref(handle)?
            .event_sink
            .set_callback(callback, user_data);
        tracing::debug!("Event callback registered");
        Ok(())
    })
}

/// Clear the event callback.
///
/// # Safety
/// - `handle` must be a valid pointer from `mediagrid_init`.
#[no_mangle]
pub unsafe extern "C" fn mediagrid_clear_event_callback(handle: *mut MediaGridHandle) -> i32 {
    guard_status("mediagrid_clear_event_callback", || {
        handle_ref(handle)?.event_sink.clear_callback();
        tracing::debug!("Event callback cleared");
        Ok(())
    })
}
