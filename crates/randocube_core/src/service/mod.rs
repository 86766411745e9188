//! Core use-case services.
//!
//! # Responsibility
//! - Category consistency (add/rename/remove with cascades).
//! - Weighted random set selection with last-set stickiness.
//! - Item lifecycle (save/remove/complete/uncomplete) and list reads.
//!
//! # Invariants
//! - Every validation failure is returned before any mutation.
//! - Services only touch catalog state through `ItemStore`.

pub mod category_service;
pub mod item_service;
pub mod random_set_service;

use crate::model::item::ItemId;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Request field that must be present for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Category,
    Id,
    Item,
    Priority,
    Title,
    SetSize,
}

impl RequiredField {
    fn label(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Id => "ID",
            Self::Item => "Item",
            Self::Priority => "Priority",
            Self::Title => "Title",
            Self::SetSize => "Positive set size",
        }
    }
}

/// Stable classification of `ServiceError` for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    CategoryNotFound,
    CategoryDuplicate,
    IdNotFound,
    TitleDuplicate,
    ValidationRequired,
    PersistenceFailure,
    StoreUnavailable,
}

/// Errors from catalog service operations.
#[derive(Debug)]
pub enum ServiceError {
    CategoryNotFound(String),
    CategoryDuplicate(String),
    IdNotFound(ItemId),
    TitleDuplicate(String),
    ValidationRequired(RequiredField),
    /// Persisting failed. In-memory state may already reflect the operation.
    Persistence(RepoError),
    /// The in-memory catalog lock was poisoned by a panicking writer.
    StoreUnavailable,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CategoryNotFound(_) => ErrorKind::CategoryNotFound,
            Self::CategoryDuplicate(_) => ErrorKind::CategoryDuplicate,
            Self::IdNotFound(_) => ErrorKind::IdNotFound,
            Self::TitleDuplicate(_) => ErrorKind::TitleDuplicate,
            Self::ValidationRequired(_) => ErrorKind::ValidationRequired,
            Self::Persistence(_) => ErrorKind::PersistenceFailure,
            Self::StoreUnavailable => ErrorKind::StoreUnavailable,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CategoryNotFound(name) => write!(f, "Could not find category: {name}"),
            Self::CategoryDuplicate(name) => write!(f, "Category already exists: {name}"),
            Self::IdNotFound(id) => write!(f, "Could not find ID: {id}"),
            Self::TitleDuplicate(title) => write!(f, "Title already exists: {title}"),
            Self::ValidationRequired(field) => {
                write!(f, "{} is required for this operation", field.label())
            }
            Self::Persistence(err) => write!(f, "could not persist catalog: {err}"),
            Self::StoreUnavailable => write!(f, "catalog store is unavailable"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Persistence(value)
    }
}
