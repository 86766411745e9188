//! Whole-catalog state value.
//!
//! # Responsibility
//! - Group categories, active items, history and last-set cache into one value.
//! - Own the monotonic item id allocator.
//!
//! # Invariants
//! - Mutations to categories, items and last sets happen on the same value,
//!   so one operation never leaves the collections out of step.
//! - `next_id` only grows.

use crate::model::category::CategoryList;
use crate::model::item::{Item, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_SET_SIZE: usize = 3;
pub const FIRST_ITEM_ID: ItemId = 1;

/// Everything the catalog persists, serialized in the legacy save-file shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogState {
    pub categories: CategoryList,
    /// Active (not completed) items.
    #[serde(rename = "data")]
    pub active: Vec<Item>,
    /// Completed items.
    pub history: Vec<Item>,
    /// Most recent random set per stored category name. Save files from older
    /// builds may key this by request spelling; see `normalize_last_sets`.
    pub last_sets: HashMap<String, Vec<Item>>,
    pub default_set_size: usize,
    pub next_id: ItemId,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            categories: CategoryList::default(),
            active: Vec::new(),
            history: Vec::new(),
            last_sets: HashMap::new(),
            default_set_size: DEFAULT_SET_SIZE,
            next_id: FIRST_ITEM_ID,
        }
    }
}

impl CatalogState {
    /// Returns the next unused id and advances the allocator.
    pub fn allocate_id(&mut self) -> ItemId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Re-keys the last-set cache onto stored category spellings.
    ///
    /// Keys that match a category only case-insensitively are moved to the
    /// stored spelling; an exact key wins over such a variant. Keys that match
    /// no category are dropped. Returns the number of dropped entries.
    pub fn normalize_last_sets(&mut self) -> usize {
        let cached = std::mem::take(&mut self.last_sets);
        let total = cached.len();
        for (key, items) in cached {
            let Some(stored) = self.categories.resolve(&key) else {
                continue;
            };
            if key == stored {
                self.last_sets.insert(key, items);
            } else {
                self.last_sets.entry(stored.to_string()).or_insert(items);
            }
        }
        total - self.last_sets.len()
    }

    /// Active items whose category equals `stored` exactly.
    pub fn active_in<'a>(&'a self, stored: &'a str) -> impl Iterator<Item = &'a Item> + 'a {
        self.active.iter().filter(move |item| item.category == stored)
    }
}
