//! Canonical comparison keys and the ordered category list.
//!
//! # Responsibility
//! - Canonicalize category names and item titles before any comparison.
//! - Resolve user-supplied category names to their stored spelling.
//!
//! # Invariants
//! - Categories are stored in their original case and matched case-insensitively.
//! - The category list never holds two entries with the same `CategoryKey`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Case-insensitive identity of a category name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryKey(String);

impl CategoryKey {
    pub fn of(name: &str) -> Self {
        Self(name.to_lowercase())
    }
}

/// Case- and whitespace-insensitive identity of an item title.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TitleKey(String);

impl TitleKey {
    pub fn of(title: &str) -> Self {
        Self(WHITESPACE_RE.replace_all(title, "").to_lowercase())
    }
}

/// Ordered list of category names as the user spelled them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryList(Vec<String>);

impl CategoryList {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    /// Returns the stored spelling of the category matching `name`.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.position(name).map(|index| self.0[index].as_str())
    }

    /// Returns whether any category matches `name` case-insensitively.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Appends a category. Callers check for duplicates first.
    pub fn push(&mut self, name: impl Into<String>) {
        self.0.push(name.into());
    }

    /// Replaces the entry stored exactly as `stored` with `replacement`.
    pub fn replace(&mut self, stored: &str, replacement: &str) {
        for entry in self.0.iter_mut().filter(|entry| entry.as_str() == stored) {
            *entry = replacement.to_string();
        }
    }

    /// Removes the entry stored exactly as `stored`.
    pub fn remove(&mut self, stored: &str) {
        self.0.retain(|entry| entry != stored);
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let key = CategoryKey::of(name);
        self.0.iter().position(|entry| CategoryKey::of(entry) == key)
    }
}

#[cfg(test)]
mod tests {
    use super::{CategoryKey, CategoryList, TitleKey};

    #[test]
    fn category_key_ignores_case_only() {
        assert_eq!(CategoryKey::of("Board Games"), CategoryKey::of("BOARD games"));
        assert_ne!(CategoryKey::of("Board Games"), CategoryKey::of("BoardGames"));
    }

    #[test]
    fn title_key_ignores_case_and_whitespace() {
        assert_eq!(TitleKey::of("The  Hobbit"), TitleKey::of("thehobbit"));
        assert_eq!(TitleKey::of("\tDune\n"), TitleKey::of("DUNE"));
        assert_ne!(TitleKey::of("Dune"), TitleKey::of("Dune 2"));
    }

    #[test]
    fn resolve_returns_stored_spelling() {
        let list = CategoryList::new(vec!["Books".to_string(), "Movies/TV".to_string()]);
        assert_eq!(list.resolve("books"), Some("Books"));
        assert_eq!(list.resolve("MOVIES/tv"), Some("Movies/TV"));
        assert_eq!(list.resolve("Games"), None);
    }

    #[test]
    fn replace_and_remove_match_exact_spelling() {
        let mut list = CategoryList::new(vec!["Books".to_string(), "Games".to_string()]);
        list.replace("books", "Novels");
        assert_eq!(list.as_slice(), ["Books", "Games"]);

        list.replace("Books", "Novels");
        list.remove("Games");
        assert_eq!(list.as_slice(), ["Novels"]);
    }
}
