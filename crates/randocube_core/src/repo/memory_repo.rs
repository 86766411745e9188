//! In-process catalog provider.
//!
//! Keeps the last persisted catalog in memory. Useful for tests and for
//! callers that do not need durability. Persist failures can be injected to
//! exercise fail-forward handling in the store.

use super::{CatalogRepository, RepoError, RepoResult};
use crate::model::catalog::CatalogState;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryCatalogRepository {
    saved: Mutex<Option<CatalogState>>,
    failing_persists: AtomicUsize,
    persist_count: AtomicUsize,
}

impl MemoryCatalogRepository {
    /// Creates an empty provider; `load` reports `NotFound` until a persist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider that already holds `state`.
    pub fn with_state(state: CatalogState) -> Self {
        Self {
            saved: Mutex::new(Some(state)),
            ..Self::default()
        }
    }

    /// Makes the next `count` calls to `persist` fail.
    pub fn fail_next_persists(&self, count: usize) {
        self.failing_persists.store(count, Ordering::SeqCst);
    }

    /// Number of successful persists so far.
    pub fn persist_count(&self) -> usize {
        self.persist_count.load(Ordering::SeqCst)
    }

    /// Last successfully persisted catalog, if any.
    pub fn saved(&self) -> Option<CatalogState> {
        self.saved.lock().ok().and_then(|saved| saved.clone())
    }
}

impl CatalogRepository for MemoryCatalogRepository {
    fn load(&self) -> RepoResult<CatalogState> {
        let saved = self
            .saved
            .lock()
            .map_err(|_| RepoError::Unavailable("memory catalog lock poisoned".to_string()))?;
        saved
            .clone()
            .ok_or_else(|| RepoError::NotFound(PathBuf::from(":memory:")))
    }

    fn persist(&self, state: &CatalogState) -> RepoResult<()> {
        let armed = self
            .failing_persists
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if armed {
            return Err(RepoError::Unavailable("injected persist failure".to_string()));
        }

        let mut saved = self
            .saved
            .lock()
            .map_err(|_| RepoError::Unavailable("memory catalog lock poisoned".to_string()))?;
        *saved = Some(state.clone());
        self.persist_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
