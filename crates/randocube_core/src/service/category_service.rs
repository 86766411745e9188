//! Category consistency service.
//!
//! # Responsibility
//! - Add, rename and remove categories.
//! - Cascade rename/remove into active items, history and the last-set cache
//!   inside one store transaction.
//!
//! # Invariants
//! - After any operation every active item's category is in the category list.
//! - The last-set cache never keeps a key for a category that no longer exists.
//! - Renaming to a name that matches any existing category, the renamed one
//!   included, is rejected as a duplicate.
//! - Removing without a migration target deletes active items only; completed
//!   items stay in history.

use crate::model::catalog::CatalogState;
use crate::model::item::Item;
use crate::repo::CatalogRepository;
use crate::service::{ServiceError, ServiceResult};
use crate::store::ItemStore;
use log::{debug, info};

/// Category use-case service over a shared item store.
pub struct CategoryService<'s, R: CatalogRepository> {
    store: &'s ItemStore<R>,
}

impl<'s, R: CatalogRepository> CategoryService<'s, R> {
    pub fn new(store: &'s ItemStore<R>) -> Self {
        Self { store }
    }

    /// Returns categories in stored order and spelling.
    pub fn list(&self) -> ServiceResult<Vec<String>> {
        self.store.read(|state| state.categories.to_vec())
    }

    /// Adds a category unless one with the same case-insensitive name exists.
    pub fn add(&self, name: &str) -> ServiceResult<()> {
        let total = self.store.transact(|state| {
            if state.categories.contains(name) {
                return Err(ServiceError::CategoryDuplicate(name.to_string()));
            }
            state.categories.push(name);
            Ok(state.categories.len())
        })?;
        info!("event=category_add module=service status=ok categories_total={total}");
        Ok(())
    }

    /// Renames `old_name` to `new_name` and rewrites every reference to it.
    pub fn rename(&self, old_name: &str, new_name: &str) -> ServiceResult<()> {
        let rewritten = self.store.transact(|state| {
            let stored = resolve_owned(state, old_name)?;
            if state.categories.contains(new_name) {
                return Err(ServiceError::CategoryDuplicate(new_name.to_string()));
            }

            state.categories.replace(&stored, new_name);
            let rewritten = recategorize(&mut state.active, &stored, new_name)
                + recategorize(&mut state.history, &stored, new_name);
            state.last_sets.remove(&stored);
            debug!("event=category_rename module=service from={stored} to={new_name}");
            Ok(rewritten)
        })?;

        info!("event=category_rename module=service status=ok items_rewritten={rewritten}");
        Ok(())
    }

    /// Removes `name`, migrating its items to `migrate_to` or deleting them.
    ///
    /// A blank `migrate_to` is treated as absent. A target that does not
    /// exist, or that resolves to the category being removed, is rejected
    /// as `CategoryNotFound` naming the target.
    pub fn remove(&self, name: &str, migrate_to: Option<&str>) -> ServiceResult<()> {
        let migrate_to = migrate_to.filter(|target| !target.trim().is_empty());

        let (migrated, deleted) = self.store.transact(|state| {
            let stored = resolve_owned(state, name)?;
            let target = match migrate_to {
                Some(target) => match state.categories.resolve(target) {
                    Some(resolved) if resolved != stored => Some(resolved.to_string()),
                    _ => return Err(ServiceError::CategoryNotFound(target.to_string())),
                },
                None => None,
            };

            state.categories.remove(&stored);
            let counts = match target {
                Some(target) => {
                    let moved = recategorize(&mut state.active, &stored, &target)
                        + recategorize(&mut state.history, &stored, &target);
                    (moved, 0)
                }
                None => {
                    let before = state.active.len();
                    state.active.retain(|item| item.category != stored);
                    (0, before - state.active.len())
                }
            };
            state.last_sets.remove(&stored);
            Ok(counts)
        })?;

        info!(
            "event=category_remove module=service status=ok migrated={migrated} deleted={deleted}"
        );
        Ok(())
    }
}

fn resolve_owned(state: &CatalogState, name: &str) -> ServiceResult<String> {
    state
        .categories
        .resolve(name)
        .map(str::to_string)
        .ok_or_else(|| ServiceError::CategoryNotFound(name.to_string()))
}

fn recategorize(items: &mut [Item], from: &str, to: &str) -> usize {
    let mut count = 0;
    for item in items.iter_mut().filter(|item| item.category == from) {
        item.category = to.to_string();
        count += 1;
    }
    count
}
