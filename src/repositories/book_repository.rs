// src/repositories/book_repository.rs
//
// Book persistence contracts + in-memory reference implementation.
//
// The collection version strictly increases on every observable mutation
// (insert, update, delete). Readers get immutable snapshots.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::book::{BookId, BookRecord, BookRef};
use crate::error::{AppError, AppResult};
use crate::services::materialization_types::LibrarySnapshot;

/// Supplies full collection snapshots to the view engine.
///
/// The engine never retries a failed snapshot. A provider that becomes
/// readable again must send a change notification (or the owner must call
/// `refresh`) for the degraded view to recover.
#[cfg_attr(test, mockall::automock)]
pub trait BookSnapshotProvider: Send + Sync {
    /// Current records plus the collection version they belong to
    fn snapshot(&self) -> AppResult<LibrarySnapshot>;
}

pub trait BookRepository: BookSnapshotProvider {
    /// Insert or replace by id; returns the new collection version
    fn save(&self, book: &BookRecord) -> AppResult<u64>;
    fn get_by_id(&self, id: &BookId) -> AppResult<Option<BookRecord>>;
    fn list_all(&self) -> AppResult<Vec<BookRecord>>;
    /// Remove by id; returns the new collection version
    fn delete(&self, id: &BookId) -> AppResult<u64>;
    fn version(&self) -> AppResult<u64>;
}

#[derive(Default)]
struct CollectionState {
    books: Vec<BookRef>,
    version: u64,
}

/// Process-local collection store.
/// Can be switched offline to exercise degraded mode.
pub struct InMemoryBookRepository {
    state: RwLock<CollectionState>,
    available: AtomicBool,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CollectionState::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Seed with records; the seeded collection is version 1
    pub fn with_books(books: Vec<BookRecord>) -> Self {
        let version = u64::from(!books.is_empty());
        Self {
            state: RwLock::new(CollectionState {
                books: books.into_iter().map(Arc::new).collect(),
                version,
            }),
            available: AtomicBool::new(true),
        }
    }

    /// Toggle availability; while offline every call fails
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> AppResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::SnapshotUnavailable(
                "book collection is offline".to_string(),
            ))
        }
    }
}

impl Default for InMemoryBookRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl BookSnapshotProvider for InMemoryBookRepository {
    fn snapshot(&self) -> AppResult<LibrarySnapshot> {
        self.ensure_available()?;
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Ok(LibrarySnapshot::new(state.books.clone(), state.version))
    }
}

impl BookRepository for InMemoryBookRepository {
    fn save(&self, book: &BookRecord) -> AppResult<u64> {
        self.ensure_available()?;
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        let record = Arc::new(book.clone());
        match state.books.iter().position(|existing| existing.id == book.id) {
            Some(idx) => state.books[idx] = record,
            None => state.books.push(record),
        }

        state.version += 1;
        Ok(state.version)
    }

    fn get_by_id(&self, id: &BookId) -> AppResult<Option<BookRecord>> {
        self.ensure_available()?;
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Ok(state
            .books
            .iter()
            .find(|book| &book.id == id)
            .map(|book| BookRecord::clone(book)))
    }

    fn list_all(&self) -> AppResult<Vec<BookRecord>> {
        self.ensure_available()?;
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Ok(state.books.iter().map(|book| BookRecord::clone(book)).collect())
    }

    fn delete(&self, id: &BookId) -> AppResult<u64> {
        self.ensure_available()?;
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        let before = state.books.len();
        state.books.retain(|book| &book.id != id);
        if state.books.len() == before {
            return Err(AppError::NotFound);
        }

        state.version += 1;
        Ok(state.version)
    }

    fn version(&self) -> AppResult<u64> {
        self.ensure_available()?;
        Ok(self
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .version)
    }
}
