//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::db::Database;
use crate::executor::InlineExecutor;
use crate::models::{MediaQuery, MediaRecord, MediaScope};
use crate::services::media_index::{MediaIndexClient, SharedMediaIndex, SqliteMediaIndex};
use crate::utils::error::{AppError, AppResult};

/// A JPEG record in album `album`, modified at `date_modified` seconds.
pub fn record(id: i64, album: &str, date_modified: i64) -> MediaRecord {
    MediaRecord {
        id,
        album_id: Some(album.to_string()),
        album_name: Some(format!("Album {}", album)),
        display_name: format!("IMG_{:04}.jpg", id),
        date_added: date_modified,
        date_taken: date_modified * 1000,
        date_modified,
        size: 1024,
        width: 800,
        height: 600,
        mime_type: "image/jpeg".to_string(),
        path: Some(format!("/storage/emulated/0/DCIM/IMG_{:04}.jpg", id)),
    }
}

/// `count` records in album "A", newest id first when sorted by date.
pub fn sequential_records(count: i64) -> Vec<MediaRecord> {
    (1..=count).map(|i| record(i, "A", i * 10)).collect()
}

pub fn seeded_db(records: &[MediaRecord]) -> Arc<Database> {
    let db = Database::open_in_memory().unwrap();
    db.init().unwrap();
    db.upsert_media_batch(records).unwrap();
    Arc::new(db)
}

pub fn seeded_index(records: &[MediaRecord]) -> SharedMediaIndex {
    Arc::new(SqliteMediaIndex::new(seeded_db(records), Arc::new(InlineExecutor)))
}

/// Index wrapper that can hold queries at a gate and inject failures.
pub struct GatedIndex {
    inner: SharedMediaIndex,
    gated: AtomicBool,
    gate: Notify,
    fail_next: AtomicBool,
    queries: AtomicUsize,
}

impl GatedIndex {
    pub fn new(inner: SharedMediaIndex) -> Arc<Self> {
        Arc::new(Self {
            inner,
            gated: AtomicBool::new(false),
            gate: Notify::new(),
            fail_next: AtomicBool::new(false),
            queries: AtomicUsize::new(0),
        })
    }

    /// Hold every following query until [`GatedIndex::open_gate`].
    pub fn close_gate(&self) {
        self.gated.store(true, Ordering::SeqCst);
    }

    pub fn open_gate(&self) {
        self.gated.store(false, Ordering::SeqCst);
        self.gate.notify_waiters();
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaIndexClient for GatedIndex {
    async fn query(&self, query: &MediaQuery) -> AppResult<Vec<MediaRecord>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.gated.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(AppError::store_unavailable("injected failure"));
        }
        self.inner.query(query).await
    }

    async fn count(&self, scope: &MediaScope) -> AppResult<i64> {
        self.inner.count(scope).await
    }
}
