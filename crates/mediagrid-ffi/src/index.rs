//! Media index maintenance API.
//!
//! The host platform owns the real media store; it pushes rows here so that
//! queries can run against the local index.

use std::ffi::c_char;

use mediagrid_core::MediaRecord;

use crate::convert::{handle_ref, json_arg};
use crate::error::guard_status;
use crate::handle::MediaGridHandle;

/// Insert or replace media rows from a JSON array of records.
///
/// # Safety
/// - `handle` must be a valid pointer from `mediagrid_init`.
/// - `records_json` must be a NUL-terminated UTF-8 string.
/// - `out_count` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn mediagrid_index_upsert_json(
    handle: *mut MediaGridHandle,
    records_json: *const c_char,
    out_count: *mut i64,
) -> i32 {
    guard_status("mediagrid_index_upsert_json", || {
        let handle = handle_ref(handle)?;
        let records: Vec<MediaRecord> = json_arg(records_json, "records_json")?;

        let count = handle.core.upsert_media(&records)?;
        if let Some(out) = out_count.as_mut() {
            *out = count as i64;
        }
        Ok(())
    })
}

/// Remove media rows by id (JSON array of integers).
///
/// # Safety
/// Same as [`mediagrid_index_upsert_json`].
#[no_mangle]
pub unsafe extern "C" fn mediagrid_index_delete_json(
    handle: *mut MediaGridHandle,
    ids_json: *const c_char,
    out_count: *mut i64,
) -> i32 {
    guard_status("mediagrid_index_delete_json", || {
        let handle = handle_ref(handle)?;
        let ids: Vec<i64> = json_arg(ids_json, "ids_json")?;

        let count = handle.core.delete_media(&ids)?;
        if let Some(out) = out_count.as_mut() {
            *out = count as i64;
        }
        Ok(())
    })
}
