// src/services/materialization_engine.rs
//
// Predicate & Sort Engine
//
// Pure projection of a collection snapshot through a Criteria value:
// filter (one conjunction) → dedup by id (first seen wins) → sort.
//
// CRITICAL RULES:
// - No side effects, no shared state; safe to call from anywhere
// - Never mutates records
// - O(n log n) in record count

use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::book::{BookId, BookRecord, BookRef};
use crate::domain::criteria::{Criteria, SortKey};

/// Materialize the ordered, deduplicated view of `records` for `criteria`.
pub fn materialize(records: &[BookRef], criteria: &Criteria) -> Vec<BookRef> {
    let needle = criteria.search_needle();

    let mut seen: HashSet<&BookId> = HashSet::with_capacity(records.len());
    let mut books: Vec<BookRef> = Vec::with_capacity(records.len());
    for book in records {
        if matches(book, criteria, needle.as_deref()) && seen.insert(&book.id) {
            books.push(Arc::clone(book));
        }
    }

    sort_books(&mut books, criteria.sort_key);
    books
}

// ============================================================================
// FILTERING
// ============================================================================

/// Single logical conjunction over every filter
fn matches(book: &BookRecord, criteria: &Criteria, needle: Option<&str>) -> bool {
    matches_search(book, needle)
        && criteria.status_filter.contains(&book.reading_status)
        && (!criteria.wishlist_only || book.on_wishlist)
        && (!criteria.owned_only || book.owned)
        && (!criteria.favorites_only || book.is_favorited)
}

/// Case-insensitive substring over title OR joined authors.
/// Vacuously true without a needle.
fn matches_search(book: &BookRecord, needle: Option<&str>) -> bool {
    let Some(needle) = needle else {
        return true;
    };

    book.title.to_lowercase().contains(needle)
        || book.joined_authors().to_lowercase().contains(needle)
}

// ============================================================================
// SORTING
// ============================================================================

/// Stable sort; ties keep their dedup order.
fn sort_books(books: &mut [BookRef], sort_key: SortKey) {
    match sort_key {
        SortKey::DateAdded => books.sort_by(|a, b| b.date_added.cmp(&a.date_added)),
        SortKey::Title => books.sort_by_cached_key(|book| collation_key(Some(book.title.as_str()))),
        SortKey::Author => books.sort_by_cached_key(|book| collation_key(book.primary_author())),
        SortKey::Rating => books.sort_by_key(|book| Reverse(book.rating.unwrap_or(0))),
        SortKey::Status => books.sort_by_key(|book| book.reading_status.ordinal()),
    }
}

/// (missing, folded, original): blanks last, then case-insensitive,
/// then exact text so differently-cased equals order deterministically.
fn collation_key(text: Option<&str>) -> (bool, String, String) {
    match text.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => (false, t.to_lowercase(), t.to_string()),
        None => (true, String::new(), String::new()),
    }
}

// ============================================================================
// TESTS
// ============================================================================
