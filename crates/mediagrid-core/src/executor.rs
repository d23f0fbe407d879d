//! Execution context for blocking media-store I/O.
//!
//! Store queries are synchronous SQLite calls. They never run on the caller's
//! task directly; instead every component receives an [`IoExecutor`] and hands
//! the blocking work to it. Production code uses the tokio blocking pool, tests
//! use [`InlineExecutor`] for deterministic, same-thread execution.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot;

use crate::utils::error::{AppError, AppResult};

/// A unit of blocking work.
pub type IoJob = Box<dyn FnOnce() + Send + 'static>;

/// Something that can run blocking jobs off the calling task.
pub trait IoExecutor: Send + Sync {
    /// Run `job` to completion at some point. Must not block the caller on it.
    fn execute(&self, job: IoJob);
}

/// Shared reference to an IoExecutor implementation.
pub type SharedExecutor = Arc<dyn IoExecutor>;

/// Runs jobs on a tokio runtime's blocking thread pool.
#[derive(Debug, Clone)]
pub struct TokioBlockingExecutor {
    handle: Handle,
}

impl TokioBlockingExecutor {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime of the current task.
    ///
    /// # Panics
    /// Panics when called outside of a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl IoExecutor for TokioBlockingExecutor {
    fn execute(&self, job: IoJob) {
        // The JoinHandle is not needed: results flow back through the job's own channel.
        drop(self.handle.spawn_blocking(job));
    }
}

/// Runs jobs immediately on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl IoExecutor for InlineExecutor {
    fn execute(&self, job: IoJob) {
        job();
    }
}

/// Run a blocking closure on `executor` and await its result.
///
/// If the job is dropped without producing a value (panic, runtime shutdown)
/// the store is reported as unavailable.
pub async fn run_io<T, F>(executor: &dyn IoExecutor, f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    executor.execute(Box::new(move || {
        let _ = tx.send(f());
    }));

    rx.await
        .map_err(|_| AppError::StoreUnavailable("I/O task dropped before completion".to_string()))?
}
