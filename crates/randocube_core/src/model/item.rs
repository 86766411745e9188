//! Item domain model.
//!
//! # Responsibility
//! - Define the catalog entry and its priority weighting.
//! - Keep the wire shape compatible with existing save files.
//!
//! # Invariants
//! - `id` is `None` only before the first save.
//! - An item lives in the history collection iff `completed` is set.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Identifier allocated by the catalog on first save.
pub type ItemId = u32;

/// Relative importance of an item inside its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Number of entries this item contributes to a weighted pool.
    ///
    /// Always at least 1, so no eligible item is ever excluded from a draw.
    pub fn weight(self) -> usize {
        match self {
            Self::Low => 1,
            Self::Medium => 3,
            Self::High => 6,
        }
    }

    /// Stable lowercase label used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a priority label case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// One recommendation tracked by the catalog (a book, game, movie, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: Option<ItemId>,
    pub title: String,
    /// Stored category string; must equal an entry of the category list.
    pub category: String,
    pub priority: Priority,
    #[serde(default)]
    pub added: Option<NaiveDate>,
    #[serde(default)]
    pub completed: Option<NaiveDate>,
}

impl Item {
    /// Builds an unsaved item. Id and added date are assigned on save.
    pub fn draft(
        title: impl Into<String>,
        category: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            category: category.into(),
            priority,
            added: None,
            completed: None,
        }
    }
}

/// Today's date in the local timezone, used for added/completed stamps.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
