//! Persistence providers for the catalog.
//!
//! # Responsibility
//! - Define the load/persist contract the item store depends on.
//! - Isolate file-format and SQL details from services.
//!
//! # Invariants
//! - `persist` writes the whole catalog as one unit; callers never observe a
//!   partially written catalog through `load`.
//! - Providers never interpret catalog semantics (no validation of
//!   categories or titles happens here).

pub mod json_repo;
pub mod memory_repo;
pub mod sqlite_repo;
pub mod sqlite_schema;

use crate::model::catalog::CatalogState;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type RepoResult<T> = Result<T, RepoError>;

/// Failure reported by a persistence provider.
#[derive(Debug)]
pub enum RepoError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Sqlite(rusqlite::Error),
    /// The SQLite catalog was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
    /// No saved catalog exists yet at the given location.
    NotFound(PathBuf),
    InvalidData(String),
    /// Provider refused the operation (e.g. simulated outage in tests).
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "invalid catalog JSON: {err}"),
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "catalog schema version {found} is newer than supported {supported}"
            ),
            Self::NotFound(path) => write!(f, "no saved catalog at `{}`", path.display()),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
            Self::Unavailable(message) => write!(f, "catalog storage unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. }
            | Self::NotFound(_)
            | Self::InvalidData(_)
            | Self::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Load/persist contract for the whole catalog.
pub trait CatalogRepository {
    /// Reads the last persisted catalog.
    fn load(&self) -> RepoResult<CatalogState>;
    /// Durably writes the full catalog, replacing whatever was stored.
    fn persist(&self, state: &CatalogState) -> RepoResult<()>;
}

impl<R: CatalogRepository + ?Sized> CatalogRepository for Box<R> {
    fn load(&self) -> RepoResult<CatalogState> {
        (**self).load()
    }

    fn persist(&self, state: &CatalogState) -> RepoResult<()> {
        (**self).persist(state)
    }
}
