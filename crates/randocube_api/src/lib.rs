//! Use-case API with uniform result envelopes.
//!
//! Every call returns either a payload or a single human-readable error
//! string, never both. This is the contract an outer transport (HTTP, CLI)
//! consumes.

mod api;
mod config;
mod request;
mod response;

pub use api::{open_api, DynRepository, RandoCubeApi};
pub use config::{ApiConfig, StoreBackend};
pub use request::{
    AddCategoryRequest, EditCategoryRequest, ItemInput, MarkCompletedRequest,
    RemoveCategoryRequest, RemoveItemRequest, SaveItemRequest,
};
pub use response::{BaseResponse, CategoryListResponse, ItemListResponse};
