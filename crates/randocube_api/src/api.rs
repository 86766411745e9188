//! Use-case API over a shared item store.
//!
//! # Responsibility
//! - Validate requests, call core services, and wrap results in envelopes.
//! - Keep error semantics flat: one human-readable string per failure.
//!
//! # Invariants
//! - No method panics or returns `Err`; every failure lands in `error`.
//! - Domain errors surface with their own message. Storage errors are
//!   prefixed with the operation and the offending value.

use crate::config::{ApiConfig, StoreBackend};
use crate::request::{
    AddCategoryRequest, EditCategoryRequest, MarkCompletedRequest, RemoveCategoryRequest,
    RemoveItemRequest, SaveItemRequest,
};
use crate::response::{BaseResponse, CategoryListResponse, ItemListResponse};
use log::{error, info};
use randocube_core::{
    health as health_inner, init_logging, CatalogRepository, CategoryService, ItemService,
    ItemStore, JsonFileRepository, RandomSetService, RequiredField, ServiceError,
    SqliteCatalogRepository,
};

/// Repository handle used when the provider is picked at runtime.
pub type DynRepository = Box<dyn CatalogRepository + Send + Sync>;

/// Entry point for every catalog use case.
pub struct RandoCubeApi<R: CatalogRepository> {
    store: ItemStore<R>,
}

impl<R: CatalogRepository> RandoCubeApi<R> {
    pub fn new(store: ItemStore<R>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ItemStore<R> {
        &self.store
    }

    pub fn health(&self) -> String {
        health_inner().to_string()
    }

    /// Replaces in-memory state with what the repository currently holds.
    pub fn reload(&self) -> BaseResponse {
        log_call("reload", "-");
        match self.store.reload() {
            Ok(()) => BaseResponse::success(),
            Err(err) => BaseResponse::failure(describe("Could not reload data", &err)),
        }
    }

    pub fn get_categories(&self) -> CategoryListResponse {
        log_call("get_categories", "-");
        match CategoryService::new(&self.store).list() {
            Ok(categories) => CategoryListResponse::success(categories),
            Err(err) => CategoryListResponse::failure(describe("Could not get categories", &err)),
        }
    }

    pub fn add_category(&self, request: &AddCategoryRequest) -> BaseResponse {
        let category = match request.validate() {
            Ok(category) => category,
            Err(err) => return BaseResponse::failure(err.to_string()),
        };
        log_call("add_category", category);
        let result = CategoryService::new(&self.store).add(category);
        to_base(result, &format!("Could not add category: {category}"))
    }

    pub fn edit_category(&self, request: &EditCategoryRequest) -> BaseResponse {
        let (old, new) = match request.validate() {
            Ok(names) => names,
            Err(err) => return BaseResponse::failure(err.to_string()),
        };
        log_call("edit_category", old);
        let result = CategoryService::new(&self.store).rename(old, new);
        to_base(result, &format!("Could not edit category: {old}"))
    }

    pub fn remove_category(&self, request: &RemoveCategoryRequest) -> BaseResponse {
        let (category, migrate_to) = match request.validate() {
            Ok(fields) => fields,
            Err(err) => return BaseResponse::failure(err.to_string()),
        };
        log_call("remove_category", category);
        let result = CategoryService::new(&self.store).remove(category, migrate_to);
        to_base(result, &format!("Could not remove category: {category}"))
    }

    /// Draws a set for `category`. `use_last` defaults to reusing the
    /// previous set.
    pub fn get_random_set(&self, category: Option<&str>, use_last: Option<bool>) -> ItemListResponse {
        let category = match category.filter(|name| !name.trim().is_empty()) {
            Some(category) => category,
            None => {
                return ItemListResponse::failure(
                    ServiceError::ValidationRequired(RequiredField::Category).to_string(),
                )
            }
        };
        log_call("get_random_set", category);
        match RandomSetService::new(&self.store).random_set(category, use_last.unwrap_or(true)) {
            Ok(items) => ItemListResponse::success(items),
            Err(err) => ItemListResponse::failure(describe(
                &format!("Could not get random set for: {category}"),
                &err,
            )),
        }
    }

    pub fn get_full_list(&self, category: Option<&str>) -> ItemListResponse {
        log_call("get_full_list", category.unwrap_or("-"));
        match ItemService::new(&self.store).full_list(category) {
            Ok(items) => ItemListResponse::success(items),
            Err(err) => ItemListResponse::failure(describe("Could not get items", &err)),
        }
    }

    pub fn get_completed_list(&self, category: Option<&str>) -> ItemListResponse {
        log_call("get_completed_list", category.unwrap_or("-"));
        match ItemService::new(&self.store).completed_list(category) {
            Ok(items) => ItemListResponse::success(items),
            Err(err) => ItemListResponse::failure(describe("Could not get completed items", &err)),
        }
    }

    /// Creates or updates an item; the saved item is the single payload entry.
    pub fn save_item(&self, request: &SaveItemRequest) -> ItemListResponse {
        let (item, ignore_duplicate) = match request.validate() {
            Ok(fields) => fields,
            Err(err) => return ItemListResponse::failure(err.to_string()),
        };
        let subject = item.id.map_or_else(|| "new".to_string(), |id| id.to_string());
        log_call("save_item", &subject);
        match ItemService::new(&self.store).save(&item, ignore_duplicate) {
            Ok(saved) => ItemListResponse::success(vec![saved]),
            Err(err) => ItemListResponse::failure(describe(
                &format!("Could not save item: {}", item.title),
                &err,
            )),
        }
    }

    pub fn remove_item(&self, request: &RemoveItemRequest) -> BaseResponse {
        let id = match request.validate() {
            Ok(id) => id,
            Err(err) => return BaseResponse::failure(err.to_string()),
        };
        log_call("remove_item", &id.to_string());
        let result = ItemService::new(&self.store).remove(id).map(|_| ());
        to_base(result, &format!("Could not remove item: {id}"))
    }

    pub fn mark_completed(&self, request: &MarkCompletedRequest) -> BaseResponse {
        let (id, unmark) = match request.validate() {
            Ok(fields) => fields,
            Err(err) => return BaseResponse::failure(err.to_string()),
        };
        log_call("mark_completed", &id.to_string());
        let result = ItemService::new(&self.store)
            .mark_completed(id, unmark)
            .map(|_| ());
        to_base(result, &format!("Could not mark/unmark item: {id}"))
    }

    /// Changes how many items a random set holds.
    pub fn set_default_set_size(&self, size: usize) -> BaseResponse {
        log_call("set_default_set_size", &size.to_string());
        match self.store.set_default_set_size(size) {
            Ok(()) => BaseResponse::success(),
            Err(err) => BaseResponse::failure(describe("Could not set set size", &err)),
        }
    }
}

/// Opens the configured store and returns a ready API.
///
/// Initializes logging first when `config.log_dir` is set. A missing data
/// file starts an empty catalog.
pub fn open_api(config: &ApiConfig) -> Result<RandoCubeApi<DynRepository>, String> {
    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level.as_str(), &log_dir.to_string_lossy())?;
    }

    let repo: DynRepository = match config.backend() {
        StoreBackend::Json => Box::new(JsonFileRepository::new(config.data_path.clone())),
        StoreBackend::Sqlite => Box::new(
            SqliteCatalogRepository::open(&config.data_path)
                .map_err(|err| format!("store open failed: {err}"))?,
        ),
    };
    let store = ItemStore::open_or_default(repo).map_err(|err| {
        error!(
            "event=api_open module=api status=error path={} error={err}",
            config.data_path.display()
        );
        format!("store open failed: {err}")
    })?;

    info!(
        "event=api_open module=api status=ok backend={:?} path={}",
        config.backend(),
        config.data_path.display()
    );
    Ok(RandoCubeApi::new(store))
}

fn log_call(operation: &str, subject: &str) {
    info!("event=api_call module=api operation={operation} subject={subject}");
}

/// Formats storage failures with context; domain errors keep their own text.
fn describe(context: &str, err: &ServiceError) -> String {
    match err {
        ServiceError::Persistence(_) | ServiceError::StoreUnavailable => {
            error!("event=api_call module=api status=error context=\"{context}\" error={err}");
            format!("{context}, check logs: {err}")
        }
        _ => err.to_string(),
    }
}

fn to_base(result: Result<(), ServiceError>, context: &str) -> BaseResponse {
    match result {
        Ok(()) => BaseResponse::success(),
        Err(err) => BaseResponse::failure(describe(context, &err)),
    }
}
