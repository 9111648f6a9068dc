// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// CRITICAL PRINCIPLES:
// - DTOs are UI-friendly representations
// - DTOs NEVER leak domain invariants
// - DTOs are simple, serializable structs
// - Conversion FROM domain values; inputs are checked by the command layer

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::book::{BookRecord, ReadingStatus};
use crate::domain::criteria::{Criteria, SortKey};
use crate::domain::statistics::LibraryStatistics;
use crate::services::MaterializedView;

// ============================================================================
// BOOK DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDto {
    pub id: String,
    pub title: String,
    pub author_names: Vec<String>,
    pub primary_author: Option<String>,
    pub reading_status: String,
    pub on_wishlist: bool,
    pub owned: bool,
    pub is_favorited: bool,
    pub date_added: String,
    pub rating: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBookDto {
    pub title: String,
    #[serde(default)]
    pub author_names: Vec<String>,
    #[serde(default)]
    pub reading_status: Option<ReadingStatus>,
    #[serde(default)]
    pub on_wishlist: bool,
    #[serde(default)]
    pub owned: bool,
    #[serde(default)]
    pub rating: Option<u8>,
}

// ============================================================================
// VIEW DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriteriaDto {
    #[serde(default)]
    pub search_text: String,
    /// Empty means every status
    #[serde(default)]
    pub statuses: Vec<ReadingStatus>,
    #[serde(default)]
    pub wishlist_only: bool,
    #[serde(default)]
    pub owned_only: bool,
    #[serde(default)]
    pub favorites_only: bool,
    #[serde(default)]
    pub sort_key: SortKey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryViewDto {
    pub books: Vec<BookDto>,
    pub count: usize,
    pub revision: u64,
    pub fingerprint: Option<String>,
    pub collection_version: u64,
    pub transition: String,
    pub degraded: bool,
}

// ============================================================================
// STATISTICS DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryStatisticsDto {
    pub total_books: u32,
    pub by_status: BTreeMap<String, u32>,
    pub owned: u32,
    pub on_wishlist: u32,
    pub favorites: u32,
    pub rated: u32,
    pub average_rating: Option<f32>,
    pub collection_version: u64,
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<&BookRecord> for BookDto {
    fn from(book: &BookRecord) -> Self {
        Self {
            id: book.id.to_string(),
            title: book.title.clone(),
            author_names: book.author_names.clone(),
            primary_author: book.primary_author().map(str::to_string),
            reading_status: book.reading_status.to_string(),
            on_wishlist: book.on_wishlist,
            owned: book.owned,
            is_favorited: book.is_favorited,
            date_added: book.date_added.to_rfc3339(),
            rating: book.rating,
        }
    }
}

impl From<BookRecord> for BookDto {
    fn from(book: BookRecord) -> Self {
        Self::from(&book)
    }
}

impl From<&Criteria> for CriteriaDto {
    fn from(criteria: &Criteria) -> Self {
        Self {
            search_text: criteria.search_text.clone(),
            statuses: criteria.status_filter.iter().copied().collect(),
            wishlist_only: criteria.wishlist_only,
            owned_only: criteria.owned_only,
            favorites_only: criteria.favorites_only,
            sort_key: criteria.sort_key,
        }
    }
}

impl CriteriaDto {
    pub fn to_criteria(&self) -> Criteria {
        let statuses = if self.statuses.is_empty() {
            ReadingStatus::ALL.to_vec()
        } else {
            self.statuses.clone()
        };

        Criteria {
            search_text: self.search_text.clone(),
            status_filter: statuses.into_iter().collect(),
            wishlist_only: self.wishlist_only,
            owned_only: self.owned_only,
            favorites_only: self.favorites_only,
            sort_key: self.sort_key,
        }
    }
}

impl LibraryViewDto {
    pub fn from_view(view: &MaterializedView, degraded: bool) -> Self {
        Self {
            books: view.books().iter().map(|book| BookDto::from(book.as_ref())).collect(),
            count: view.count(),
            revision: view.revision,
            fingerprint: view.fingerprint.map(|fp| fp.to_string()),
            collection_version: view.collection_version,
            transition: view.transition.to_string(),
            degraded,
        }
    }
}

impl From<LibraryStatistics> for LibraryStatisticsDto {
    fn from(stats: LibraryStatistics) -> Self {
        Self {
            total_books: stats.total_books,
            by_status: stats
                .by_status
                .iter()
                .map(|(status, count)| (status.to_string(), *count))
                .collect(),
            owned: stats.owned,
            on_wishlist: stats.on_wishlist,
            favorites: stats.favorites,
            rated: stats.rated,
            average_rating: stats.average_rating,
            collection_version: stats.collection_version,
        }
    }
}
