// src/services/materialization_types.rs
//
// Materialization Types
//
// Types shared by the view engine: the content fingerprint that keys the
// cache, the transition hint, the published view and the collection snapshot.
//
// CRITICAL RULES:
// - Fingerprints are deterministic (same input → same fingerprint)
// - Every Criteria field feeds the fingerprint
// - A MaterializedView is replaced, never mutated

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::domain::book::{BookId, BookRef};
use crate::domain::criteria::Criteria;

// ============================================================================
// FINGERPRINT
// ============================================================================

/// Compact fingerprint of (criteria, collection version).
/// Equal fingerprints mean the cached projection may be served as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Derives a fingerprint from every Criteria field plus the collection
    /// version. Pure and deterministic.
    pub fn from_criteria(criteria: &Criteria, collection_version: u64) -> Self {
        // Exhaustive destructuring: a new Criteria field will not compile
        // until it is hashed here.
        let Criteria {
            search_text,
            status_filter,
            wishlist_only,
            owned_only,
            favorites_only,
            sort_key,
        } = criteria;

        let mut hasher = Sha256::new();
        hasher.update((search_text.len() as u64).to_le_bytes());
        hasher.update(search_text.as_bytes());
        hasher.update((status_filter.len() as u64).to_le_bytes());
        for status in status_filter {
            hasher.update([status.ordinal()]);
        }
        hasher.update([
            u8::from(*wishlist_only),
            u8::from(*owned_only),
            u8::from(*favorites_only),
        ]);
        hasher.update([sort_key.ordinal()]);
        hasher.update(collection_version.to_le_bytes());

        let digest = hasher.finalize();
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        Self(u64::from_be_bytes(prefix))
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

// ============================================================================
// TRANSITION
// ============================================================================

/// How the rendering layer should present a view update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Small batch of additions; animate insertions
    IncrementalAnimated,

    /// Replace without animation
    Immediate,
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transition::IncrementalAnimated => write!(f, "incremental_animated"),
            Transition::Immediate => write!(f, "immediate"),
        }
    }
}

// ============================================================================
// COLLECTION SNAPSHOT
// ============================================================================

/// Full collection contents at one collection version
#[derive(Debug, Clone, Default)]
pub struct LibrarySnapshot {
    pub records: Vec<BookRef>,
    pub version: u64,
}

impl LibrarySnapshot {
    pub fn new(records: Vec<BookRef>, version: u64) -> Self {
        Self { records, version }
    }
}

// ============================================================================
// MATERIALIZED VIEW
// ============================================================================

/// The engine's published output.
/// Replaced wholesale on every recomputation.
#[derive(Debug, Clone)]
pub struct MaterializedView {
    books: Arc<Vec<BookRef>>,

    /// Fingerprint the books were computed for (`None` before first load)
    pub fingerprint: Option<Fingerprint>,

    /// Collection version the books were computed from
    pub collection_version: u64,

    /// Monotonic publication counter
    pub revision: u64,

    /// Classification of the update that produced this view
    pub transition: Transition,
}

impl MaterializedView {
    /// The view served before anything has been materialized
    pub fn empty() -> Self {
        Self {
            books: Arc::new(Vec::new()),
            fingerprint: None,
            collection_version: 0,
            revision: 0,
            transition: Transition::Immediate,
        }
    }

    pub fn new(
        books: Arc<Vec<BookRef>>,
        fingerprint: Fingerprint,
        collection_version: u64,
        revision: u64,
        transition: Transition,
    ) -> Self {
        Self {
            books,
            fingerprint: Some(fingerprint),
            collection_version,
            revision,
            transition,
        }
    }

    pub fn books(&self) -> &[BookRef] {
        &self.books
    }

    pub fn count(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &BookId> + '_ {
        self.books.iter().map(|book| &book.id)
    }
}

impl Default for MaterializedView {
    fn default() -> Self {
        Self::empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
