//! Item store: the single owner of live catalog state.
//!
//! # Responsibility
//! - Hold the catalog behind a reader/writer lock so mutating operations are
//!   mutually exclusive while reads interleave.
//! - Run each mutation against a working copy and publish it as one unit.
//! - Persist through the configured `CatalogRepository` after every mutation.
//!
//! # Invariants
//! - A closure passed to `transact` that returns `Err` leaves the live state
//!   untouched.
//! - A persist failure after a successful closure is reported, but the live
//!   state keeps the applied mutation (fail-forward). `persist` can be
//!   retried independently.

use crate::model::catalog::CatalogState;
use crate::repo::{CatalogRepository, RepoError};
use crate::service::{RequiredField, ServiceError, ServiceResult};
use log::{info, warn};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub struct ItemStore<R: CatalogRepository> {
    repo: R,
    state: RwLock<CatalogState>,
}

impl<R: CatalogRepository> ItemStore<R> {
    /// Loads the catalog from `repo`. Any load failure is returned.
    pub fn open(repo: R) -> ServiceResult<Self> {
        let state = repo.load()?;
        Ok(Self::with_state(repo, state))
    }

    /// Loads the catalog from `repo`, starting empty when nothing is saved yet.
    pub fn open_or_default(repo: R) -> ServiceResult<Self> {
        match repo.load() {
            Ok(state) => Ok(Self::with_state(repo, state)),
            Err(RepoError::NotFound(path)) => {
                warn!(
                    "event=store_open module=store status=empty reason=not_found path={}",
                    path.display()
                );
                Ok(Self::with_state(repo, CatalogState::default()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Wraps an already-built state without loading.
    pub fn with_state(repo: R, mut state: CatalogState) -> Self {
        normalize(&mut state);
        Self {
            repo,
            state: RwLock::new(state),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Runs `f` with shared access to the live catalog.
    pub fn read<T>(&self, f: impl FnOnce(&CatalogState) -> T) -> ServiceResult<T> {
        let guard = self.read_guard()?;
        Ok(f(&guard))
    }

    /// Clones the live catalog.
    pub fn snapshot(&self) -> ServiceResult<CatalogState> {
        self.read(CatalogState::clone)
    }

    /// Applies `f` to a working copy, publishes it, then persists.
    pub fn transact<T>(
        &self,
        f: impl FnOnce(&mut CatalogState) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let mut live = self.write_guard()?;
        let mut working = live.clone();
        let value = f(&mut working)?;
        *live = working;

        if let Err(err) = self.repo.persist(&live) {
            warn!("event=store_persist module=store status=error applied=true error={err}");
            return Err(ServiceError::Persistence(err));
        }
        Ok(value)
    }

    /// Writes the current live catalog again.
    pub fn persist(&self) -> ServiceResult<()> {
        let live = self.write_guard()?;
        self.repo.persist(&live)?;
        info!("event=store_persist module=store status=ok trigger=manual");
        Ok(())
    }

    /// Replaces the live catalog with what the repository holds.
    pub fn reload(&self) -> ServiceResult<()> {
        let mut live = self.write_guard()?;
        let mut loaded = self.repo.load()?;
        normalize(&mut loaded);
        *live = loaded;
        info!(
            "event=store_reload module=store status=ok categories={} items={}",
            live.categories.len(),
            live.active.len()
        );
        Ok(())
    }

    pub fn default_set_size(&self) -> ServiceResult<usize> {
        self.read(|state| state.default_set_size)
    }

    /// Sets the maximum random set size. Zero is rejected.
    pub fn set_default_set_size(&self, size: usize) -> ServiceResult<()> {
        if size == 0 {
            return Err(ServiceError::ValidationRequired(RequiredField::SetSize));
        }
        self.transact(|state| {
            state.default_set_size = size;
            Ok(())
        })
    }

    fn read_guard(&self) -> ServiceResult<RwLockReadGuard<'_, CatalogState>> {
        self.state.read().map_err(|_| ServiceError::StoreUnavailable)
    }

    fn write_guard(&self) -> ServiceResult<RwLockWriteGuard<'_, CatalogState>> {
        self.state.write().map_err(|_| ServiceError::StoreUnavailable)
    }
}

fn normalize(state: &mut CatalogState) {
    let dropped = state.normalize_last_sets();
    if dropped > 0 {
        info!("event=store_normalize module=store status=ok last_sets_dropped={dropped}");
    }
}
