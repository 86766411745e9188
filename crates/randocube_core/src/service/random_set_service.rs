//! Weighted random set selection with last-set stickiness.
//!
//! # Responsibility
//! - Draw a bounded random subset of a category's active items, biased by
//!   priority weight.
//! - Prefer returning the previous set for the category while its members
//!   are still eligible.
//! - Record the result as the category's new last set.
//!
//! # Invariants
//! - Result size is `min(default_set_size, eligible distinct items)`.
//! - Every draw is uniform over pool entries, so an item's chance is
//!   proportional to its priority weight.
//! - Cached items that are no longer active in the category are dropped,
//!   never substituted by stale copies.

use crate::model::item::{Item, ItemId};
use crate::repo::CatalogRepository;
use crate::service::{ServiceError, ServiceResult};
use crate::store::ItemStore;
use log::info;
use rand::Rng;
use std::collections::HashSet;

/// Multiset of eligible items; each appears `priority.weight()` times.
pub(crate) struct WeightedPool<'a> {
    items: Vec<&'a Item>,
    entries: Vec<usize>,
}

impl<'a> WeightedPool<'a> {
    pub(crate) fn build(items: Vec<&'a Item>) -> Self {
        let entries = items
            .iter()
            .enumerate()
            .flat_map(|(index, item)| std::iter::repeat(index).take(item.priority.weight()))
            .collect();
        Self { items, entries }
    }

    pub(crate) fn distinct_len(&self) -> usize {
        self.items.len()
    }

    #[cfg(test)]
    pub(crate) fn entry_len(&self) -> usize {
        self.entries.len()
    }

    /// Current pool version of the item with `id`, if still eligible.
    pub(crate) fn find(&self, id: Option<ItemId>) -> Option<&'a Item> {
        self.items.iter().copied().find(|item| item.id == id)
    }

    /// Draws one entry uniformly. Returns `None` for an empty pool.
    pub(crate) fn draw<G: Rng + ?Sized>(&self, rng: &mut G) -> Option<&'a Item> {
        if self.entries.is_empty() {
            return None;
        }
        let index = self.entries[rng.gen_range(0..self.entries.len())];
        Some(self.items[index])
    }
}

/// Random set use-case service over a shared item store.
pub struct RandomSetService<'s, R: CatalogRepository> {
    store: &'s ItemStore<R>,
}

impl<'s, R: CatalogRepository> RandomSetService<'s, R> {
    pub fn new(store: &'s ItemStore<R>) -> Self {
        Self { store }
    }

    /// Returns a random set for `category` using the thread-local RNG.
    pub fn random_set(&self, category: &str, prefer_last_set: bool) -> ServiceResult<Vec<Item>> {
        self.random_set_with_rng(category, prefer_last_set, &mut rand::thread_rng())
    }

    /// Returns a random set for `category`, drawing from `rng`.
    ///
    /// # Errors
    /// - `CategoryNotFound` when `category` matches no category.
    /// - `Persistence` when the updated last set could not be saved; the
    ///   cache entry is still updated in memory.
    pub fn random_set_with_rng<G: Rng + ?Sized>(
        &self,
        category: &str,
        prefer_last_set: bool,
        rng: &mut G,
    ) -> ServiceResult<Vec<Item>> {
        let (selected, reused) = self.store.transact(|state| {
            let stored = state
                .categories
                .resolve(category)
                .map(str::to_string)
                .ok_or_else(|| ServiceError::CategoryNotFound(category.to_string()))?;

            let pool = WeightedPool::build(state.active_in(&stored).collect());
            let target = state.default_set_size.min(pool.distinct_len());
            let mut seen: HashSet<Option<ItemId>> = HashSet::with_capacity(target);
            let mut selected: Vec<Item> = Vec::with_capacity(target);

            if prefer_last_set {
                let cached = state.last_sets.get(&stored).map(Vec::as_slice).unwrap_or_default();
                for current in cached.iter().filter_map(|cached| pool.find(cached.id)) {
                    if selected.len() >= target {
                        break;
                    }
                    if seen.insert(current.id) {
                        selected.push(current.clone());
                    }
                }
            }
            let reused = selected.len();

            while selected.len() < target {
                let Some(drawn) = pool.draw(rng) else {
                    break;
                };
                if seen.insert(drawn.id) {
                    selected.push(drawn.clone());
                }
            }

            state.last_sets.insert(stored, selected.clone());
            Ok((selected, reused))
        })?;

        info!(
            "event=random_set module=service status=ok prefer_last={prefer_last_set} size={} reused={reused}",
            selected.len()
        );
        Ok(selected)
    }
}
