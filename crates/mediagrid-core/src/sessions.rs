//! Session bookkeeping and cancellation.
//!
//! Every photo list shown by a frontend owns one [`IncrementalLoadController`].
//! The [`SessionRegistry`] hands out numeric ids for them so that a C caller
//! can refer to a session by handle.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::services::load_controller::IncrementalLoadController;

/// Unique identifier for a session.
pub type SessionId = u64;

/// Token for checking and signaling cancellation of one session epoch.
///
/// Clone this token to share cancellation state across tasks.
#[derive(Debug, Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    epoch: u64,
}

impl CancelToken {
    pub fn new(epoch: u64) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            epoch,
        }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Registry of open photo list sessions.
#[derive(Debug)]
pub struct SessionRegistry {
    next_id: AtomicU64,
    sessions: RwLock<HashMap<SessionId, Arc<IncrementalLoadController>>>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a controller and return its id.
    pub fn open(&self, controller: IncrementalLoadController) -> (SessionId, Arc<IncrementalLoadController>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let controller = Arc::new(controller);

        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(id, controller.clone());
        }
        tracing::debug!(session = id, "Session opened");

        (id, controller)
    }

    pub fn get(&self, id: SessionId) -> Option<Arc<IncrementalLoadController>> {
        self.sessions
            .read()
            .ok()
            .and_then(|sessions| sessions.get(&id).cloned())
    }

    /// Reset and forget a session.
    ///
    /// Returns true if the session was found.
    pub fn close(&self, id: SessionId) -> bool {
        let removed = self
            .sessions
            .write()
            .ok()
            .and_then(|mut sessions| sessions.remove(&id));

        match removed {
            Some(controller) => {
                controller.reset();
                tracing::debug!(session = id, "Session closed");
                true
            }
            None => false,
        }
    }

    /// Reset and forget every session.
    pub fn close_all(&self) {
        let drained: Vec<_> = match self.sessions.write() {
            Ok(mut sessions) => sessions.drain().map(|(_, c)| c).collect(),
            Err(_) => Vec::new(),
        };
        for controller in drained {
            controller.reset();
        }
    }

    pub fn active_count(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions
            .read()
            .map(|s| s.contains_key(&id))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaScope, PagingSettings};
    use crate::services::load_controller::LoadState;
    use crate::services::photo_pager::PhotoPager;
    use crate::test_support::{seeded_index, sequential_records};

    fn controller() -> IncrementalLoadController {
        let pager = PhotoPager::new(seeded_index(&sequential_records(3)));
        IncrementalLoadController::new(pager, &PagingSettings::default()).unwrap()
    }

    #[test]
    fn test_cancel_token_clone() {
        let token1 = CancelToken::new(7);
        let token2 = token1.clone();
        assert_eq!(token2.epoch(), 7);

        token1.cancel();
        assert!(token1.is_cancelled());
        assert!(token2.is_cancelled());
    }

    #[test]
    fn test_open_get_close() {
        let registry = SessionRegistry::new();
        let (first, _) = registry.open(controller());
        let (second, _) = registry.open(controller());

        assert_ne!(first, second);
        assert_eq!(registry.active_count(), 2);
        assert!(registry.get(first).is_some());

        assert!(registry.close(first));
        assert!(!registry.close(first));
        assert!(registry.get(first).is_none());
        assert!(registry.contains(second));
    }

    #[tokio::test]
    async fn test_close_resets_controller() {
        let registry = SessionRegistry::new();
        let (id, controller) = registry.open(controller());
        controller.start_session(MediaScope::AllImages).await.unwrap();
        assert_eq!(controller.photos().len(), 3);

        registry.close(id);
        assert_eq!(controller.state(), LoadState::Idle);
        assert!(controller.photos().is_empty());
    }

    #[test]
    fn test_close_all() {
        let registry = SessionRegistry::new();
        registry.open(controller());
        registry.open(controller());

        registry.close_all();
        assert_eq!(registry.active_count(), 0);
    }
}
