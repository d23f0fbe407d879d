//! Settings API.

use std::ffi::c_char;

use mediagrid_core::models::GallerySettings;

use crate::convert::{handle_ref, json_arg, write_json};
use crate::error::guard_status;
use crate::handle::MediaGridHandle;

/// Get current settings as JSON.
///
/// # Safety
/// - `handle` must be a valid pointer from `mediagrid_init`.
/// - `out_json` must be valid for writes; free the result with `mediagrid_free_string`.
#[no_mangle]
pub unsafe extern "C" fn mediagrid_get_settings_json(
    handle: *mut MediaGridHandle,
    out_json: *mut *mut c_char,
) -> i32 {
    guard_status("mediagrid_get_settings_json", || {
        let handle = handle_ref(handle)?;
        write_json(out_json, &handle.core.settings())
    })
}

/// Save settings from JSON. Missing fields take their defaults.
///
/// New sessions pick up the page size; open sessions keep theirs.
///
/// # Safety
/// - `handle` must be a valid pointer from `mediagrid_init`.
/// - `settings_json` must be a NUL-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn mediagrid_save_settings_json(
    handle: *mut MediaGridHandle,
    settings_json: *const c_char,
) -> i32 {
    guard_status("mediagrid_save_settings_json", || {
        let handle = handle_ref(handle)?;
        let settings: GallerySettings = json_arg(settings_json, "settings_json")?;

        handle.core.save_settings(settings)?;
        tracing::info!("Settings saved");
        Ok(())
    })
}
