// src/services/materialization_cache.rs
//
// Single-slot memoization cache keyed by Fingerprint.
//
// Not synchronized: the view engine task is its only writer.

use std::sync::Arc;

use crate::domain::book::BookRef;
use crate::services::materialization_types::Fingerprint;

struct CacheSlot {
    fingerprint: Fingerprint,
    books: Arc<Vec<BookRef>>,
}

/// Holds at most one (fingerprint, result) pair.
/// A mismatching fingerprint replaces the slot unconditionally.
#[derive(Default)]
pub struct MaterializationCache {
    slot: Option<CacheSlot>,
    hits: u64,
    misses: u64,
}

impl MaterializationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve the stored result when `fingerprint` matches the slot;
    /// otherwise run `compute`, store and return its result.
    pub fn get_or_compute<F>(&mut self, fingerprint: Fingerprint, compute: F) -> Arc<Vec<BookRef>>
    where
        F: FnOnce() -> Vec<BookRef>,
    {
        if let Some(slot) = &self.slot {
            if slot.fingerprint == fingerprint {
                self.hits += 1;
                return Arc::clone(&slot.books);
            }
        }

        self.misses += 1;
        let books = Arc::new(compute());
        self.slot = Some(CacheSlot {
            fingerprint,
            books: Arc::clone(&books),
        });
        books
    }

    /// Fingerprint currently held, if any
    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.slot.as_ref().map(|slot| slot.fingerprint)
    }

    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
