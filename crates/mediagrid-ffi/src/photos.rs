//! Photo query API.

use std::ffi::c_char;

use mediagrid_core::models::MediaScope;

use crate::convert::{handle_ref, json_arg, write_json};
use crate::error::{guard_status, invalid};
use crate::handle::MediaGridHandle;

/// Get one page of a scope as JSON `{scope, page, pageSize, items}`.
///
/// `scope_json` is `{"kind":"allImages"}`, `{"kind":"album","albumId":".."}` or
/// `{"kind":"dateRange","start":ms,"end":ms}`. Pages start at 1; a page past
/// the end has no items.
///
/// # Safety
/// - `handle` must be a valid pointer from `mediagrid_init`.
/// - `scope_json` must be a NUL-terminated UTF-8 string.
/// - `out_json` must be valid for writes; free the result with `mediagrid_free_string`.
#[no_mangle]
pub unsafe extern "C" fn mediagrid_photos_get_page_json(
    handle: *mut MediaGridHandle,
    scope_json: *const c_char,
    page: i64,
    page_size: i64,
    out_json: *mut *mut c_char,
) -> i32 {
    guard_status("mediagrid_photos_get_page_json", || {
        let handle = handle_ref(handle)?;
        let scope: MediaScope = json_arg(scope_json, "scope_json")?;

        let page = handle.block_on(handle.core.pager().get_page(&scope, page, page_size))??;
        write_json(out_json, &page)
    })
}

/// Get a single photo as JSON, or `null` when the id is unknown.
///
/// # Safety
/// - `handle` must be a valid pointer from `mediagrid_init`.
/// - `out_json` must be valid for writes; free the result with `mediagrid_free_string`.
#[no_mangle]
pub unsafe extern "C" fn mediagrid_photos_get_by_id_json(
    handle: *mut MediaGridHandle,
    photo_id: i64,
    out_json: *mut *mut c_char,
) -> i32 {
    guard_status("mediagrid_photos_get_by_id_json", || {
        let handle = handle_ref(handle)?;
        let photo = handle.block_on(handle.core.pager().get_by_id(photo_id))??;
        write_json(out_json, &photo)
    })
}

/// Count the images in a scope.
///
/// # Safety
/// - `handle` must be a valid pointer from `mediagrid_init`.
/// - `scope_json` must be a NUL-terminated UTF-8 string.
/// - `out_count` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn mediagrid_photos_count(
    handle: *mut MediaGridHandle,
    scope_json: *const c_char,
    out_count: *mut i64,
) -> i32 {
    guard_status("mediagrid_photos_count", || {
        let handle = handle_ref(handle)?;
        if out_count.is_null() {
            return Err(invalid("out_count is null"));
        }
        let scope: MediaScope = json_arg(scope_json, "scope_json")?;

        *out_count = handle.block_on(handle.core.pager().count(&scope))??;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{cstring, last_error, seed, take_json, TestHandle};

    fn ids(page: &serde_json::Value) -> Vec<i64> {
        page["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_i64().unwrap())
            .collect()
    }

    #[test]
    fn test_get_page() {
        let handle = TestHandle::new();
        seed(&handle, 5);
        let scope = cstring(r#"{"kind":"allImages"}"#);

        let mut out = std::ptr::null_mut();
        let status =
            unsafe { mediagrid_photos_get_page_json(handle.ptr, scope.as_ptr(), 2, 2, &mut out) };
        assert_eq!(status, 0, "{:?}", last_error());

        let page = take_json(out);
        assert_eq!(ids(&page), vec![3, 2]);
        assert_eq!(page["page"], 2);
        assert_eq!(page["pageSize"], 2);
    }

    #[test]
    fn test_invalid_page_size() {
        let handle = TestHandle::new();
        let scope = cstring(r#"{"kind":"allImages"}"#);

        let mut out = std::ptr::null_mut();
        let status =
            unsafe { mediagrid_photos_get_page_json(handle.ptr, scope.as_ptr(), 1, 0, &mut out) };
        assert_eq!(status, -1);
        assert!(last_error().unwrap().contains("E_INVALID_PAGE_SIZE"));
        assert!(out.is_null());
    }

    #[test]
    fn test_bad_scope_json() {
        let handle = TestHandle::new();
        let scope = cstring(r#"{"kind":"everything"}"#);

        let mut count = 0i64;
        let status = unsafe { mediagrid_photos_count(handle.ptr, scope.as_ptr(), &mut count) };
        assert_eq!(status, -1);
        assert!(last_error().unwrap().contains("E_INVALID_ARGUMENT"));
    }

    #[test]
    fn test_get_by_id_and_count() {
        let handle = TestHandle::new();
        seed(&handle, 4);

        let mut out = std::ptr::null_mut();
        assert_eq!(unsafe { mediagrid_photos_get_by_id_json(handle.ptr, 2, &mut out) }, 0);
        assert_eq!(take_json(out)["displayName"], "IMG_0002.jpg");

        let mut out = std::ptr::null_mut();
        assert_eq!(unsafe { mediagrid_photos_get_by_id_json(handle.ptr, 99, &mut out) }, 0);
        assert!(take_json(out).is_null());

        let scope = cstring(r#"{"kind":"album","albumId":"A"}"#);
        let mut count = 0i64;
        assert_eq!(
            unsafe { mediagrid_photos_count(handle.ptr, scope.as_ptr(), &mut count) },
            0
        );
        assert_eq!(count, 4);
    }
}
