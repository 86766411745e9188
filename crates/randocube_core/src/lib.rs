//! Core domain logic for RandoCube.
//! This crate is the single source of truth for catalog invariants.

pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::catalog::{CatalogState, DEFAULT_SET_SIZE};
pub use model::category::{CategoryKey, CategoryList, TitleKey};
pub use model::item::{Item, ItemId, Priority};
pub use repo::json_repo::JsonFileRepository;
pub use repo::memory_repo::MemoryCatalogRepository;
pub use repo::sqlite_repo::SqliteCatalogRepository;
pub use repo::{CatalogRepository, RepoError, RepoResult};
pub use service::category_service::CategoryService;
pub use service::item_service::ItemService;
pub use service::random_set_service::RandomSetService;
pub use service::{ErrorKind, RequiredField, ServiceError, ServiceResult};
pub use store::ItemStore;

const HEALTH_MESSAGE: &str = "RandoCube is up and running!";

/// Minimal health-check message for liveness checks.
pub fn health() -> &'static str {
    HEALTH_MESSAGE
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
