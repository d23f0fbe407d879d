//! MediaGridHandle - opaque handle wrapping MediaGridCore.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use mediagrid_core::{
    events::{EventSink, SharedEventSink},
    paths::{AppPathProvider, PathProvider, SharedPathProvider},
    AppError, AppResult, MediaGridCore,
};
use parking_lot::RwLock;
use tokio::runtime::Runtime;

use crate::logging;

/// Callback function type for events.
/// - `name`: event name (null-terminated UTF-8)
/// - `payload`: JSON payload (null-terminated UTF-8)
/// - `user_data`: user-provided context pointer
pub type EventCallback =
    extern "C" fn(name: *const c_char, payload: *const c_char, user_data: *mut c_void);

/// Stored callback with user data.
pub struct StoredCallback {
    pub callback: EventCallback,
    pub user_data: *mut c_void,
}

// SAFETY: user_data is managed by the caller and must be thread-safe
unsafe impl Send for StoredCallback {}
unsafe impl Sync for StoredCallback {}

/// FFI event sink that forwards events to a C callback.
///
/// Session events are emitted from runtime worker threads.
#[derive(Default)]
pub struct FfiEventSink {
    callback: RwLock<Option<StoredCallback>>,
}

impl FfiEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_callback(&self, callback: EventCallback, user_data: *mut c_void) {
        *self.callback.write() = Some(StoredCallback { callback, user_data });
    }

    pub fn clear_callback(&self) {
        *self.callback.write() = None;
    }

    pub fn has_callback(&self) -> bool {
        self.callback.read().is_some()
    }
}

impl EventSink for FfiEventSink {
    fn emit(&self, event_name: &str, payload_json: &str) {
        let guard = self.callback.read();
        if let Some(ref stored) = *guard {
            if let (Ok(name), Ok(payload)) = (CString::new(event_name), CString::new(payload_json))
            {
                (stored.callback)(name.as_ptr(), payload.as_ptr(), stored.user_data);
            }
        }
    }
}

/// Opaque handle exposed to C.
pub struct MediaGridHandle {
    pub core: MediaGridCore,
    pub event_sink: Arc<FfiEventSink>,
    runtime: Option<Runtime>,
}

impl MediaGridHandle {
    /// Create a handle rooted at `base_dir`, or the platform data directory.
    pub fn new(base_dir: Option<PathBuf>) -> AppResult<Self> {
        let path_provider: SharedPathProvider = Arc::new(match base_dir {
            Some(dir) => AppPathProvider::with_base_dir(dir),
            None => AppPathProvider::new(),
        });
        logging::init(&path_provider.logs_dir());

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .thread_name("mediagrid-worker")
            .enable_all()
            .build()
            .map_err(AppError::Io)?;

        let event_sink = Arc::new(FfiEventSink::new());
        let shared_sink: SharedEventSink = event_sink.clone();
        let core = MediaGridCore::new(path_provider, shared_sink, runtime.handle().clone())?;

        Ok(Self {
            core,
            event_sink,
            runtime: Some(runtime),
        })
    }

    /// Drive a core future to completion on the handle's runtime.
    pub fn block_on<F: std::future::Future>(&self, future: F) -> AppResult<F::Output> {
        match &self.runtime {
            Some(runtime) => Ok(runtime.block_on(future)),
            None => Err(AppError::General("runtime is shut down".to_string())),
        }
    }
}

impl Drop for MediaGridHandle {
    fn drop(&mut self) {
        self.event_sink.clear_callback();
        self.core.shutdown();
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_timeout(Duration::from_secs(2));
        }
        tracing::info!("MediaGridHandle dropped");
    }
}
