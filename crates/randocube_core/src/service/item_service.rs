//! Item lifecycle service.
//!
//! # Responsibility
//! - Create and update items with category and duplicate-title checks.
//! - Remove items and move them between active and history.
//! - Serve active/completed list reads, optionally filtered by category.
//!
//! # Invariants
//! - Saved items always carry the stored spelling of their category.
//! - Titles are unique across active and history (case/whitespace
//!   insensitive) unless the caller opts out per save.
//! - Updates keep the item's id, added date and completion state.

use crate::model::catalog::CatalogState;
use crate::model::category::TitleKey;
use crate::model::item::{today, Item, ItemId};
use crate::repo::CatalogRepository;
use crate::service::{ServiceError, ServiceResult};
use crate::store::ItemStore;
use log::info;

/// Item use-case service over a shared item store.
pub struct ItemService<'s, R: CatalogRepository> {
    store: &'s ItemStore<R>,
}

impl<'s, R: CatalogRepository> ItemService<'s, R> {
    pub fn new(store: &'s ItemStore<R>) -> Self {
        Self { store }
    }

    /// Active items, all of them or only those in `category`.
    pub fn full_list(&self, category: Option<&str>) -> ServiceResult<Vec<Item>> {
        self.store
            .read(|state| filter_by_category(state, &state.active, category))?
    }

    /// Completed items, all of them or only those in `category`.
    pub fn completed_list(&self, category: Option<&str>) -> ServiceResult<Vec<Item>> {
        self.store
            .read(|state| filter_by_category(state, &state.history, category))?
    }

    /// Creates `item` when it has no id, otherwise updates the active item
    /// with that id. Returns the item as stored.
    pub fn save(&self, item: &Item, ignore_duplicate: bool) -> ServiceResult<Item> {
        let (saved, created) = self.store.transact(|state| {
            let existing = match item.id {
                Some(id) => Some(
                    state
                        .active
                        .iter()
                        .position(|candidate| candidate.id == Some(id))
                        .ok_or(ServiceError::IdNotFound(id))?,
                ),
                None => None,
            };

            let category = state
                .categories
                .resolve(&item.category)
                .map(str::to_string)
                .ok_or_else(|| ServiceError::CategoryNotFound(item.category.clone()))?;

            if !ignore_duplicate && has_duplicate_title(state, &item.title, item.id) {
                return Err(ServiceError::TitleDuplicate(item.title.clone()));
            }

            match existing {
                Some(index) => {
                    let stored = &mut state.active[index];
                    stored.title = item.title.clone();
                    stored.category = category;
                    stored.priority = item.priority;
                    Ok((stored.clone(), false))
                }
                None => {
                    let created = Item {
                        id: Some(state.allocate_id()),
                        title: item.title.clone(),
                        category,
                        priority: item.priority,
                        added: Some(today()),
                        completed: None,
                    };
                    state.active.push(created.clone());
                    Ok((created, true))
                }
            }
        })?;

        info!(
            "event=item_save module=service status=ok id={} priority={} created={created} ignore_duplicate={ignore_duplicate}",
            saved.id.unwrap_or_default(),
            saved.priority.as_str()
        );
        Ok(saved)
    }

    /// Removes the item with `id` from active items, or else from history.
    pub fn remove(&self, id: ItemId) -> ServiceResult<Item> {
        let (removed, from_history) = self.store.transact(|state| {
            if let Some(index) = state.active.iter().position(|item| item.id == Some(id)) {
                return Ok((state.active.remove(index), false));
            }
            if let Some(index) = state.history.iter().position(|item| item.id == Some(id)) {
                return Ok((state.history.remove(index), true));
            }
            Err(ServiceError::IdNotFound(id))
        })?;

        info!("event=item_remove module=service status=ok id={id} from_history={from_history}");
        Ok(removed)
    }

    /// Moves an item to history (`unmark == false`) or back to active.
    ///
    /// Completing stamps today's date; un-completing clears it. An item whose
    /// category was removed while it sat in history cannot be un-completed.
    pub fn mark_completed(&self, id: ItemId, unmark: bool) -> ServiceResult<Item> {
        let moved = self.store.transact(|state| {
            if unmark {
                let index = state
                    .history
                    .iter()
                    .position(|item| item.id == Some(id))
                    .ok_or(ServiceError::IdNotFound(id))?;
                let category = state
                    .categories
                    .resolve(&state.history[index].category)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        ServiceError::CategoryNotFound(state.history[index].category.clone())
                    })?;

                let mut item = state.history.remove(index);
                item.category = category;
                item.completed = None;
                state.active.push(item.clone());
                Ok(item)
            } else {
                let index = state
                    .active
                    .iter()
                    .position(|item| item.id == Some(id))
                    .ok_or(ServiceError::IdNotFound(id))?;

                let mut item = state.active.remove(index);
                item.completed = Some(today());
                state.history.push(item.clone());
                Ok(item)
            }
        })?;

        info!("event=item_mark_completed module=service status=ok id={id} unmark={unmark}");
        Ok(moved)
    }
}

fn filter_by_category(
    state: &CatalogState,
    items: &[Item],
    category: Option<&str>,
) -> ServiceResult<Vec<Item>> {
    let Some(category) = category.filter(|name| !name.trim().is_empty()) else {
        return Ok(items.to_vec());
    };
    let stored = state
        .categories
        .resolve(category)
        .ok_or_else(|| ServiceError::CategoryNotFound(category.to_string()))?;
    Ok(items
        .iter()
        .filter(|item| item.category == stored)
        .cloned()
        .collect())
}

fn has_duplicate_title(state: &CatalogState, title: &str, own_id: Option<ItemId>) -> bool {
    let key = TitleKey::of(title);
    state
        .active
        .iter()
        .chain(state.history.iter())
        .filter(|item| item.id != own_id)
        .any(|item| TitleKey::of(&item.title) == key)
}
