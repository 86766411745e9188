//! JSON save-file catalog provider.
//!
//! # Responsibility
//! - Read and write the catalog as one JSON document.
//! - Stay compatible with existing `data`/`history`/`lastSets` save files.
//!
//! # Invariants
//! - Writes land in a sibling temp file and are renamed into place, so a
//!   reader sees either the previous or the new document.

use super::{CatalogRepository, RepoError, RepoResult};
use crate::model::catalog::CatalogState;
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Catalog provider backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CatalogRepository for JsonFileRepository {
    fn load(&self) -> RepoResult<CatalogState> {
        info!(
            "event=catalog_load module=repo backend=json path={}",
            self.path.display()
        );
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(RepoError::NotFound(self.path.clone()));
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    fn persist(&self, state: &CatalogState) -> RepoResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let body = serde_json::to_vec_pretty(state)?;
        let temp_path = self.temp_path();
        let written = fs::write(&temp_path, body).and_then(|()| fs::rename(&temp_path, &self.path));
        if let Err(err) = written {
            error!(
                "event=catalog_persist module=repo backend=json status=error path={} error={err}",
                self.path.display()
            );
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }

        info!(
            "event=catalog_persist module=repo backend=json status=ok path={} items={} history={}",
            self.path.display(),
            state.active.len(),
            state.history.len()
        );
        Ok(())
    }
}
