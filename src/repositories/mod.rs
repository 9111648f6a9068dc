// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data holders
// - NO business logic
// - NO invariant enforcement
// - NO event emission
// - Every mutation bumps the collection version

pub mod book_repository;

pub use book_repository::{BookRepository, BookSnapshotProvider, InMemoryBookRepository};

#[cfg(test)]
pub use book_repository::MockBookSnapshotProvider;
