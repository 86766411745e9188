//! Domain model for the RandoCube catalog.
//!
//! # Responsibility
//! - Define the item/category records shared by every core service.
//! - Provide the canonical comparison keys used for case-insensitive lookups.
//! - Hold the whole catalog as one transaction-scoped value.
//!
//! # Invariants
//! - Every category comparison goes through `CategoryKey`.
//! - Every duplicate-title comparison goes through `TitleKey`.
//! - Item ids are never reused once allocated by `CatalogState`.

pub mod catalog;
pub mod category;
pub mod item;
