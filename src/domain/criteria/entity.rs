use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::book::ReadingStatus;

/// Immutable value describing what the library view should show.
/// Two criteria are equal iff every field is equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    /// Free-text search over title and authors
    pub search_text: String,

    /// Statuses to include (default = all)
    pub status_filter: BTreeSet<ReadingStatus>,

    pub wishlist_only: bool,
    pub owned_only: bool,
    pub favorites_only: bool,

    pub sort_key: SortKey,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            status_filter: ReadingStatus::ALL.into_iter().collect(),
            wishlist_only: false,
            owned_only: false,
            favorites_only: false,
            sort_key: SortKey::DateAdded,
        }
    }
}

impl Criteria {
    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    pub fn with_sort_key(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = ReadingStatus>) -> Self {
        self.status_filter = statuses.into_iter().collect();
        self
    }

    /// Lowercased, trimmed search needle; `None` when search is vacuous
    pub fn search_needle(&self) -> Option<String> {
        let trimmed = self.search_text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }

    /// True when `other` differs from `self` in `search_text` alone.
    /// Such changes come from typing and are debounced.
    pub fn differs_only_in_search(&self, other: &Criteria) -> bool {
        self.search_text != other.search_text
            && self.status_filter == other.status_filter
            && self.wishlist_only == other.wishlist_only
            && self.owned_only == other.owned_only
            && self.favorites_only == other.favorites_only
            && self.sort_key == other.sort_key
    }
}

/// Ordering applied to the materialized view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Newest first
    #[default]
    DateAdded,
    Title,
    Author,
    /// Highest first
    Rating,
    Status,
}

impl SortKey {
    pub fn ordinal(self) -> u8 {
        match self {
            SortKey::DateAdded => 0,
            SortKey::Title => 1,
            SortKey::Author => 2,
            SortKey::Rating => 3,
            SortKey::Status => 4,
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::DateAdded => write!(f, "date_added"),
            SortKey::Title => write!(f, "title"),
            SortKey::Author => write!(f, "author"),
            SortKey::Rating => write!(f, "rating"),
            SortKey::Status => write!(f, "status"),
        }
    }
}
