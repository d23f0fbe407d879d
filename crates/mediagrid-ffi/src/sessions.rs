//! Photo list session API.
//!
//! A session is one incrementally loaded photo list. Loading runs on the
//! handle's runtime; progress is reported through the event callback
//! (`session-photos-changed`, `session-loading-changed`, `session-error`).

use std::ffi::c_char;

use mediagrid_core::models::MediaScope;
use mediagrid_core::services::VisibleRange;
use mediagrid_core::SessionId;

use crate::convert::{handle_ref, json_arg, write_json};
use crate::error::{guard, guard_status, invalid, FfiResult};
use crate::handle::MediaGridHandle;

fn session_id(raw: i64) -> FfiResult<SessionId> {
    SessionId::try_from(raw).map_err(|_| invalid(format!("invalid session id: {}", raw)))
}

fn range(first: i64, count: i64) -> FfiResult<VisibleRange> {
    let first = usize::try_from(first).map_err(|_| invalid("first must be >= 0"))?;
    let count = usize::try_from(count).map_err(|_| invalid("count must be >= 0"))?;
    Ok(VisibleRange::new(first, count))
}

/// Open a session over `scope_json` and start loading its first page.
///
/// # Returns
/// - Session id (> 0) on success
/// - `-1` on error
///
/// # Safety
/// - `handle` must be a valid pointer from `mediagrid_init`.
/// - `scope_json` must be a NUL-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn mediagrid_session_open(
    handle: *mut MediaGridHandle,
    scope_json: *const c_char,
) -> i64 {
    guard("mediagrid_session_open", -1, || {
        let handle = handle_ref(handle)?;
        let scope: MediaScope = json_arg(scope_json, "scope_json")?;

        let id = handle.core.open_session(scope)?;
        i64::try_from(id).map_err(|_| invalid("session id overflow"))
    })
}

/// Request the next page. A no-op while a page is in flight.
///
/// # Safety
/// - `handle` must be a valid pointer from `mediagrid_init`.
#[no_mangle]
pub unsafe extern "C" fn mediagrid_session_load_more(
    handle: *mut MediaGridHandle,
    session: i64,
) -> i32 {
    guard_status("mediagrid_session_load_more", || {
        let handle = handle_ref(handle)?;
        handle.core.load_more(session_id(session)?)?;
        Ok(())
    })
}

/// Clear the session's list and cancel any in-flight page.
///
/// # Safety
/// - `handle` must be a valid pointer from `mediagrid_init`.
#[no_mangle]
pub unsafe extern "C" fn mediagrid_session_reset(
    handle: *mut MediaGridHandle,
    session: i64,
) -> i32 {
    guard_status("mediagrid_session_reset", || {
        let handle = handle_ref(handle)?;
        handle.core.reset_session(session_id(session)?)?;
        Ok(())
    })
}

/// Close a session. Unknown ids are an error.
///
/// # Safety
/// - `handle` must be a valid pointer from `mediagrid_init`.
#[no_mangle]
pub unsafe extern "C" fn mediagrid_session_close(
    handle: *mut MediaGridHandle,
    session: i64,
) -> i32 {
    guard_status("mediagrid_session_close", || {
        let handle = handle_ref(handle)?;
        let id = session_id(session)?;
        if handle.core.close_session(id) {
            Ok(())
        } else {
            Err(invalid(format!("unknown session: {}", id)))
        }
    })
}

/// Copy `limit` loaded photos starting at `offset` as a JSON array.
///
/// # Safety
/// - `handle` must be a valid pointer from `mediagrid_init`.
/// - `out_json` must be valid for writes; free the result with `mediagrid_free_string`.
#[no_mangle]
pub unsafe extern "C" fn mediagrid_session_photos_json(
    handle: *mut MediaGridHandle,
    session: i64,
    offset: i64,
    limit: i64,
    out_json: *mut *mut c_char,
) -> i32 {
    guard_status("mediagrid_session_photos_json", || {
        let handle = handle_ref(handle)?;
        let controller = handle.core.session(session_id(session)?)?;
        let offset = usize::try_from(offset).map_err(|_| invalid("offset must be >= 0"))?;
        let limit = usize::try_from(limit).map_err(|_| invalid("limit must be >= 0"))?;

        let photos = controller.photos();
        let slice: Vec<_> = photos.iter().skip(offset).take(limit).collect();
        write_json(out_json, &slice)
    })
}

/// Whether the renderer should request the next page for this visible window.
///
/// # Returns
/// - `1` yes, `0` no
/// - `-1` on error
///
/// # Safety
/// - `handle` must be a valid pointer from `mediagrid_init`.
#[no_mangle]
pub unsafe extern "C" fn mediagrid_session_should_load_more(
    handle: *mut MediaGridHandle,
    session: i64,
    first_visible: i64,
    visible_count: i64,
) -> i32 {
    guard("mediagrid_session_should_load_more", -1, || {
        let handle = handle_ref(handle)?;
        let controller = handle.core.session(session_id(session)?)?;
        let range = range(first_visible, visible_count)?;

        let gate = handle.core.visibility_gate();
        let total = controller.photos().len();
        Ok(i32::from(gate.should_load_more(total, range, controller.is_loading())))
    })
}

/// Thumbnail requests for the visible window as a JSON array of
/// `{recordId, index, uri, cacheKey, targetSize, memoryCache, diskCache}`.
///
/// # Safety
/// - `handle` must be a valid pointer from `mediagrid_init`.
/// - `out_json` must be valid for writes; free the result with `mediagrid_free_string`.
#[no_mangle]
pub unsafe extern "C" fn mediagrid_session_image_requests_json(
    handle: *mut MediaGridHandle,
    session: i64,
    first_visible: i64,
    visible_count: i64,
    out_json: *mut *mut c_char,
) -> i32 {
    guard_status("mediagrid_session_image_requests_json", || {
        let handle = handle_ref(handle)?;
        let controller = handle.core.session(session_id(session)?)?;
        let range = range(first_visible, visible_count)?;

        let requests = handle
            .core
            .visibility_gate()
            .image_requests(&controller.photos(), range);
        write_json(out_json, &requests)
    })
}

#[cfg(test)]
mod tests {
    use std::ffi::{c_void, CStr};
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::callbacks::mediagrid_set_event_callback;
    use crate::test_util::{cstring, last_error, seed, take_json, TestHandle};

    static EVENTS: Mutex<Vec<(String, String)>> = Mutex::new(Vec::new());

    extern "C" fn record_event(name: *const c_char, payload: *const c_char, _: *mut c_void) {
        let name = unsafe { CStr::from_ptr(name) }.to_string_lossy().into_owned();
        let payload = unsafe { CStr::from_ptr(payload) }.to_string_lossy().into_owned();
        EVENTS.lock().unwrap().push((name, payload));
    }

    fn loaded(handle: &TestHandle, session: i64) -> usize {
        let mut out = std::ptr::null_mut();
        let status = unsafe { mediagrid_session_photos_json(handle.ptr, session, 0, 1000, &mut out) };
        assert_eq!(status, 0, "{:?}", last_error());
        take_json(out).as_array().unwrap().len()
    }

    fn wait_until(mut check: impl FnMut() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !check() {
            assert!(Instant::now() < deadline, "timed out");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_session_round_trip() {
        let handle = TestHandle::new();
        seed(&handle, 45);
        let scope = cstring(r#"{"kind":"allImages"}"#);

        let session = unsafe { mediagrid_session_open(handle.ptr, scope.as_ptr()) };
        assert!(session > 0, "{:?}", last_error());
        wait_until(|| loaded(&handle, session) == 30);

        // 30 loaded: last visible 25 is within the lookahead, 24 is not
        wait_until(|| unsafe { mediagrid_session_should_load_more(handle.ptr, session, 21, 5) } == 1);
        let should = unsafe { mediagrid_session_should_load_more(handle.ptr, session, 20, 5) };
        assert_eq!(should, 0);
        let should = unsafe { mediagrid_session_should_load_more(handle.ptr, session, 0, 10) };
        assert_eq!(should, 0);

        assert_eq!(unsafe { mediagrid_session_load_more(handle.ptr, session) }, 0);
        wait_until(|| loaded(&handle, session) == 45);

        let mut out = std::ptr::null_mut();
        let status = unsafe { mediagrid_session_photos_json(handle.ptr, session, 44, 10, &mut out) };
        assert_eq!(status, 0);
        let tail = take_json(out);
        assert_eq!(tail[0]["id"], 1);

        assert_eq!(unsafe { mediagrid_session_reset(handle.ptr, session) }, 0);
        assert_eq!(loaded(&handle, session), 0);

        assert_eq!(unsafe { mediagrid_session_close(handle.ptr, session) }, 0);
        assert_eq!(unsafe { mediagrid_session_close(handle.ptr, session) }, -1);
    }

    #[test]
    fn test_image_requests() {
        let handle = TestHandle::new();
        seed(&handle, 10);
        let scope = cstring(r#"{"kind":"allImages"}"#);
        let session = unsafe { mediagrid_session_open(handle.ptr, scope.as_ptr()) };
        wait_until(|| loaded(&handle, session) == 10);

        let mut out = std::ptr::null_mut();
        let status =
            unsafe { mediagrid_session_image_requests_json(handle.ptr, session, 0, 1, &mut out) };
        assert_eq!(status, 0);
        let requests = take_json(out);
        assert_eq!(requests.as_array().unwrap().len(), 2);
        assert_eq!(requests[0]["cacheKey"], "10_0");
        assert_eq!(requests[1]["cacheKey"], "9_1");
        assert_eq!(requests[0]["targetSize"], 300);
    }

    #[test]
    fn test_events_reach_callback() {
        let handle = TestHandle::new();
        seed(&handle, 3);
        let status =
            unsafe { mediagrid_set_event_callback(handle.ptr, record_event, std::ptr::null_mut()) };
        assert_eq!(status, 0);

        let scope = cstring(r#"{"kind":"allImages"}"#);
        let session = unsafe { mediagrid_session_open(handle.ptr, scope.as_ptr()) };
        let expected = format!(r#"{{"sessionId":{},"count":3}}"#, session);
        wait_until(|| {
            EVENTS
                .lock()
                .unwrap()
                .iter()
                .any(|(name, payload)| name == "session-photos-changed" && *payload == expected)
        });
    }

    #[test]
    fn test_unknown_session_and_bad_arguments() {
        let handle = TestHandle::new();
        assert_eq!(unsafe { mediagrid_session_load_more(handle.ptr, 42) }, -1);
        assert!(last_error().unwrap().contains("E_GENERAL"));

        assert_eq!(unsafe { mediagrid_session_reset(handle.ptr, -3) }, -1);
        assert!(last_error().unwrap().contains("invalid session id"));

        let scope = cstring("not json");
        assert_eq!(unsafe { mediagrid_session_open(handle.ptr, scope.as_ptr()) }, -1);
    }
}
