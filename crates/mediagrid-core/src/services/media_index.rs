//! Read-only query adapter over the media store.

use std::sync::Arc;

use async_trait::async_trait;

use crate::db::Database;
use crate::executor::{run_io, SharedExecutor};
use crate::models::{MediaQuery, MediaRecord, MediaScope};
use crate::utils::error::{AppError, AppResult};

/// The only I/O boundary of the paging subsystem.
///
/// Implementations must return an empty vector (not an error) when nothing
/// matches, and [`AppError::StoreUnavailable`] when the store cannot answer.
/// Results come back in the query's sort order; callers never re-sort.
#[async_trait]
pub trait MediaIndexClient: Send + Sync {
    /// Run a filtered, sorted and optionally paged query.
    async fn query(&self, query: &MediaQuery) -> AppResult<Vec<MediaRecord>>;

    /// Number of image records in `scope`.
    async fn count(&self, scope: &MediaScope) -> AppResult<i64>;
}

/// Shared reference to a MediaIndexClient implementation.
pub type SharedMediaIndex = Arc<dyn MediaIndexClient>;

/// [`MediaIndexClient`] backed by the SQLite media table.
#[derive(Clone)]
pub struct SqliteMediaIndex {
    db: Arc<Database>,
    executor: SharedExecutor,
}

impl SqliteMediaIndex {
    pub fn new(db: Arc<Database>, executor: SharedExecutor) -> Self {
        Self { db, executor }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }
}

/// Any failure below this boundary means the store could not answer.
fn as_store_error(err: AppError) -> AppError {
    match err {
        AppError::StoreUnavailable(_) => err,
        other => {
            tracing::warn!("Media store query failed: {}", other);
            AppError::store_unavailable(other)
        }
    }
}

#[async_trait]
impl MediaIndexClient for SqliteMediaIndex {
    async fn query(&self, query: &MediaQuery) -> AppResult<Vec<MediaRecord>> {
        let db = self.db.clone();
        let query = query.clone();
        run_io(self.executor.as_ref(), move || db.query_media(&query))
            .await
            .map_err(as_store_error)
    }

    async fn count(&self, scope: &MediaScope) -> AppResult<i64> {
        let db = self.db.clone();
        let scope = scope.clone();
        run_io(self.executor.as_ref(), move || db.count_media(&scope))
            .await
            .map_err(as_store_error)
    }
}
