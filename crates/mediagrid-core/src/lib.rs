//! MediaGrid Core Library
//!
//! Paged, album-aware access to an on-device image index, designed to back an
//! infinitely scrolling photo grid. The crate is frontend-agnostic: the C ABI
//! in `mediagrid-ffi` is one consumer, tests are another.
//!
//! # Architecture
//!
//! - `models`: Data structures (MediaRecord, AlbumSummary, scopes, settings)
//! - `db`: SQLite media index with versioned schema
//! - `executor`: Where blocking store I/O runs
//! - `services`: Index client, album aggregation, paging, incremental loading
//! - `events`: Event emission abstraction (EventSink trait)
//! - `paths`: Path provider abstraction (PathProvider trait)
//! - `sessions`: Session registry and cancellation tokens
//! - `utils`: Error handling
//!
//! # Example
//!
//! ```no_run
//! use mediagrid_core::{
//!     events::LoggingEventSink, models::MediaScope, paths::AppPathProvider, MediaGridCore,
//! };
//! use std::sync::Arc;
//!
//! # async fn run() -> mediagrid_core::AppResult<()> {
//! let core = MediaGridCore::new(
//!     Arc::new(AppPathProvider::new()),
//!     Arc::new(LoggingEventSink),
//!     tokio::runtime::Handle::current(),
//! )?;
//!
//! let albums = core.albums().get_albums().await?;
//! let session = core.open_session(MediaScope::AllImages)?;
//! # let _ = (albums, session);
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod events;
pub mod executor;
pub mod models;
pub mod paths;
pub mod services;
pub mod sessions;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use db::{Database, DatabaseStats};
pub use events::{EventSink, EventSinkExt, LoggingEventSink, NoOpEventSink, SharedEventSink};
pub use executor::{InlineExecutor, IoExecutor, SharedExecutor, TokioBlockingExecutor};
pub use models::{AlbumSummary, GallerySettings, MediaRecord, MediaScope, PhotoPage};
pub use paths::{AppPathProvider, PathProvider, SharedPathProvider};
pub use services::{
    AlbumService, IncrementalLoadController, LoadOutcome, LoadState, MediaIndexClient,
    PhotoPager, SettingsManager, SqliteMediaIndex, VisibilityGate,
};
pub use sessions::{CancelToken, SessionId, SessionRegistry};
pub use utils::{AppError, AppResult, CommandError};

use std::sync::{Arc, PoisonError, RwLock};

use events::{
    LoadingChangedPayload, PhotosChangedPayload, SessionErrorPayload, SESSION_ERROR,
    SESSION_LOADING_CHANGED, SESSION_PHOTOS_CHANGED,
};
use eyeball::Subscriber;
use services::media_index::SharedMediaIndex;
use tokio::runtime::Handle;

/// MediaGrid core application context.
///
/// Holds the media index, the services built on it and every open session.
pub struct MediaGridCore {
    /// Media index database
    pub db: Arc<Database>,
    /// Path provider for resolving application paths
    pub path_provider: SharedPathProvider,
    /// Event sink for emitting events to the frontend
    pub event_sink: SharedEventSink,
    index: SharedMediaIndex,
    albums: AlbumService,
    pager: PhotoPager,
    settings_manager: SettingsManager,
    settings: RwLock<GallerySettings>,
    sessions: SessionRegistry,
    runtime: Handle,
}

impl MediaGridCore {
    /// Create a new core instance.
    ///
    /// Settings are loaded from the provider's settings path, then the media
    /// index is opened (and migrated) with the store settings. Blocking store
    /// I/O and background session work run on `runtime`.
    pub fn new(
        path_provider: SharedPathProvider,
        event_sink: SharedEventSink,
        runtime: Handle,
    ) -> AppResult<Self> {
        let settings_manager = SettingsManager::new(path_provider.as_ref())?;
        let settings = settings_manager.load()?;

        let db = Database::open_with_provider(path_provider.as_ref(), &settings.store)?;
        db.init()?;
        let db = Arc::new(db);

        let executor: SharedExecutor = Arc::new(TokioBlockingExecutor::new(runtime.clone()));
        let index: SharedMediaIndex = Arc::new(SqliteMediaIndex::new(db.clone(), executor));

        tracing::info!(
            data_dir = %path_provider.app_data_dir().display(),
            page_size = settings.paging.page_size,
            "MediaGrid core initialized"
        );

        Ok(Self {
            db,
            path_provider,
            event_sink,
            albums: AlbumService::new(index.clone()),
            pager: PhotoPager::new(index.clone()),
            index,
            settings_manager,
            settings: RwLock::new(settings),
            sessions: SessionRegistry::new(),
            runtime,
        })
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    pub fn paths(&self) -> &SharedPathProvider {
        &self.path_provider
    }

    pub fn events(&self) -> &SharedEventSink {
        &self.event_sink
    }

    pub fn index(&self) -> &SharedMediaIndex {
        &self.index
    }

    pub fn albums(&self) -> &AlbumService {
        &self.albums
    }

    pub fn pager(&self) -> &PhotoPager {
        &self.pager
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Current settings snapshot.
    pub fn settings(&self) -> GallerySettings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Persist new settings. Open sessions keep the page size they were created with.
    pub fn save_settings(&self, settings: GallerySettings) -> AppResult<()> {
        self.settings_manager.save(&settings)?;
        *self.settings.write().unwrap_or_else(PoisonError::into_inner) = settings;
        Ok(())
    }

    pub fn visibility_gate(&self) -> VisibilityGate {
        let settings = self.settings();
        VisibilityGate::new(&settings.paging, settings.thumbnail)
    }

    /// Insert or replace media rows pushed by the host platform.
    pub fn upsert_media(&self, records: &[MediaRecord]) -> AppResult<usize> {
        let count = self.db.upsert_media_batch(records)?;
        tracing::info!(count, "Media rows upserted");
        Ok(count)
    }

    pub fn delete_media(&self, ids: &[i64]) -> AppResult<usize> {
        self.db.delete_media_batch(ids)
    }

    /// Open a session for `scope` and start loading its first page in the background.
    pub fn open_session(&self, scope: MediaScope) -> AppResult<SessionId> {
        let paging = self.settings().paging;
        let controller = IncrementalLoadController::new(self.pager.clone(), &paging)?;
        let (id, controller) = self.sessions.open(controller);

        // Subscribe before the first page can land.
        let subscribers = SessionSubscribers::new(&controller);
        self.runtime
            .spawn(forward_session_events(id, subscribers, self.event_sink.clone()));

        let sink = self.event_sink.clone();
        self.runtime.spawn(async move {
            if let Err(e) = controller.start_session(scope).await {
                emit_session_error(sink.as_ref(), id, &e);
            }
        });

        Ok(id)
    }

    /// Request the next page of a session in the background.
    pub fn load_more(&self, id: SessionId) -> AppResult<()> {
        let controller = self.session(id)?;
        let sink = self.event_sink.clone();
        self.runtime.spawn(async move {
            match controller.load_more().await {
                Ok(outcome) => tracing::debug!(session = id, ?outcome, "load_more finished"),
                Err(e) => emit_session_error(sink.as_ref(), id, &e),
            }
        });
        Ok(())
    }

    pub fn reset_session(&self, id: SessionId) -> AppResult<()> {
        self.session(id)?.reset();
        Ok(())
    }

    pub fn close_session(&self, id: SessionId) -> bool {
        self.sessions.close(id)
    }

    /// Look up an open session.
    pub fn session(&self, id: SessionId) -> AppResult<Arc<IncrementalLoadController>> {
        self.sessions
            .get(id)
            .ok_or_else(|| AppError::General(format!("Unknown session: {}", id)))
    }

    pub fn shutdown(&self) {
        self.sessions.close_all();
        tracing::info!("MediaGrid core shut down");
    }
}

fn emit_session_error(sink: &dyn EventSink, id: SessionId, err: &AppError) {
    tracing::warn!(session = id, "Background load failed: {}", err);
    sink.emit_typed(
        SESSION_ERROR,
        &SessionErrorPayload {
            session_id: id,
            code: err.code().to_string(),
            message: err.to_string(),
        },
    );
}

/// Subscriptions to the cells a session reports to the host.
///
/// Taken while the caller still holds the controller, so values published
/// afterwards are never missed.
pub struct SessionSubscribers {
    photos: Subscriber<Arc<Vec<MediaRecord>>>,
    loading: Subscriber<bool>,
}

impl SessionSubscribers {
    pub fn new(controller: &IncrementalLoadController) -> Self {
        Self {
            photos: controller.subscribe_photos(),
            loading: controller.subscribe_loading(),
        }
    }
}

/// Forward a session's observable cells to the event sink.
///
/// Ends once the controller is dropped.
pub async fn forward_session_events(
    id: SessionId,
    subscribers: SessionSubscribers,
    sink: SharedEventSink,
) {
    let SessionSubscribers { mut photos, mut loading } = subscribers;

    let mut photos_open = true;
    let mut loading_open = true;
    while photos_open || loading_open {
        tokio::select! {
            next = photos.next(), if photos_open => match next {
                Some(list) => sink.emit_typed(
                    SESSION_PHOTOS_CHANGED,
                    &PhotosChangedPayload { session_id: id, count: list.len() },
                ),
                None => photos_open = false,
            },
            next = loading.next(), if loading_open => match next {
                Some(flag) => sink.emit_typed(
                    SESSION_LOADING_CHANGED,
                    &LoadingChangedPayload { session_id: id, loading: flag },
                ),
                None => loading_open = false,
            },
        }
    }
    tracing::debug!(session = id, "Session event forwarding stopped");
}

impl Drop for MediaGridCore {
    fn drop(&mut self) {
        self.sessions.close_all();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::test_support::{seeded_index, sequential_records};
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<(String, String)>>,
    }

    impl RecordingSink {
        fn has(&self, name: &str, payload: &str) -> bool {
            self.events
                .lock()
                .unwrap()
                .iter()
                .any(|(n, p)| n == name && p == payload)
        }
    }

    impl EventSink for RecordingSink {
        fn emit(&self, event_name: &str, payload_json: &str) {
            self.events
                .lock()
                .unwrap()
                .push((event_name.to_string(), payload_json.to_string()));
        }
    }

    fn core(tmp: &TempDir, sink: SharedEventSink) -> MediaGridCore {
        let provider = Arc::new(AppPathProvider::with_base_dir(tmp.path().to_path_buf()));
        MediaGridCore::new(provider, sink, Handle::current()).unwrap()
    }

    async fn eventually(mut check: impl FnMut() -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !check() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_core_creation() {
        let tmp = TempDir::new().unwrap();
        let core = core(&tmp, Arc::new(NoOpEventSink));

        let stats = core.db.stats().unwrap();
        assert_eq!(stats.media_count, 0);
        assert_eq!(core.settings(), GallerySettings::default());
        assert!(tmp.path().join("Database").join("media_index.db").exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_albums_and_pages_through_core() {
        let tmp = TempDir::new().unwrap();
        let core = core(&tmp, Arc::new(NoOpEventSink));
        assert_eq!(core.upsert_media(&sequential_records(5)).unwrap(), 5);

        let albums = core.albums().get_albums().await.unwrap();
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].item_count, 5);
        assert_eq!(albums[0].cover_id, 5);

        let page = core.pager().get_page(&MediaScope::AllImages, 2, 2).await.unwrap();
        let ids: Vec<i64> = page.items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_session_lifecycle_emits_events() {
        let tmp = TempDir::new().unwrap();
        let sink = Arc::new(RecordingSink::default());
        let core = core(&tmp, sink.clone());
        core.upsert_media(&sequential_records(40)).unwrap();

        let id = core.open_session(MediaScope::AllImages).unwrap();
        let controller = core.session(id).unwrap();
        eventually(|| controller.photos().len() == 30 && !controller.is_loading()).await;

        core.load_more(id).unwrap();
        eventually(|| controller.photos().len() == 40).await;

        let expected = format!(r#"{{"sessionId":{},"count":40}}"#, id);
        eventually(|| sink.has(SESSION_PHOTOS_CHANGED, &expected)).await;

        assert!(core.close_session(id));
        assert!(core.session(id).is_err());
        assert!(controller.photos().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_first_page_reported_when_forwarder_starts_late() {
        let index = seeded_index(&sequential_records(3));
        let controller =
            IncrementalLoadController::new(PhotoPager::new(index), &Default::default()).unwrap();
        let subscribers = SessionSubscribers::new(&controller);

        controller.start_session(MediaScope::AllImages).await.unwrap();
        assert_eq!(controller.photos().len(), 3);

        let sink = Arc::new(RecordingSink::default());
        let forwarder = tokio::spawn(forward_session_events(7, subscribers, sink.clone()));

        eventually(|| sink.has(SESSION_PHOTOS_CHANGED, r#"{"sessionId":7,"count":3}"#)).await;
        eventually(|| sink.has(SESSION_LOADING_CHANGED, r#"{"sessionId":7,"loading":false}"#)).await;

        drop(controller);
        tokio::time::timeout(Duration::from_secs(5), forwarder)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_background_failure_emits_session_error() {
        let tmp = TempDir::new().unwrap();
        let sink = Arc::new(RecordingSink::default());
        let core = core(&tmp, sink.clone());
        core.db
            .connection()
            .unwrap()
            .execute_batch("DROP TABLE media;")
            .unwrap();

        let id = core.open_session(MediaScope::AllImages).unwrap();
        eventually(|| {
            sink.events
                .lock()
                .unwrap()
                .iter()
                .any(|(n, p)| n == SESSION_ERROR && p.contains("E_STORE_UNAVAILABLE"))
        })
        .await;
        assert_eq!(core.session(id).unwrap().state(), LoadState::Loaded);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_settings_drive_new_sessions() {
        let tmp = TempDir::new().unwrap();
        let core = core(&tmp, Arc::new(NoOpEventSink));
        core.upsert_media(&sequential_records(20)).unwrap();

        let mut settings = core.settings();
        settings.paging.page_size = 7;
        core.save_settings(settings.clone()).unwrap();
        assert_eq!(core.settings(), settings);

        let id = core.open_session(MediaScope::AllImages).unwrap();
        let controller = core.session(id).unwrap();
        assert_eq!(controller.page_size(), 7);
        eventually(|| controller.photos().len() == 7).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_zero_page_size_is_not_saved() {
        let tmp = TempDir::new().unwrap();
        let core = core(&tmp, Arc::new(NoOpEventSink));

        let mut settings = core.settings();
        settings.paging.page_size = 0;
        assert!(matches!(core.save_settings(settings), Err(AppError::InvalidPageSize(0))));
        assert_eq!(core.settings(), GallerySettings::default());
        assert!(core.open_session(MediaScope::AllImages).is_ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_unknown_session() {
        let tmp = TempDir::new().unwrap();
        let core = core(&tmp, Arc::new(NoOpEventSink));

        assert!(matches!(core.load_more(99), Err(AppError::General(_))));
        assert!(!core.close_session(99));
    }
}
