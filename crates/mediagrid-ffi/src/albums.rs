//! Album API.

use std::ffi::c_char;

use crate::convert::{handle_ref, write_json};
use crate::error::guard_status;
use crate::handle::MediaGridHandle;

/// Get all albums as a JSON array of `{albumId, displayName, coverId, itemCount}`.
///
/// Albums are ordered by their most recently modified image.
///
/// # Safety
/// - `handle` must be a valid pointer from `mediagrid_init`.
/// - `out_json` must be valid for writes; free the result with `mediagrid_free_string`.
#[no_mangle]
pub unsafe extern "C" fn mediagrid_albums_get_all_json(
    handle: *mut MediaGridHandle,
    out_json: *mut *mut c_char,
) -> i32 {
    guard_status("mediagrid_albums_get_all_json", || {
        let handle = handle_ref(handle)?;
        let albums = handle.block_on(handle.core.albums().get_albums())??;
        write_json(out_json, &albums)
    })
}
