// src/lib.rs
// BookHub - Local-first reading library tracker
//
// Architecture:
// - Domain-centric: records, criteria and their invariants live in domain/
// - Event-driven: services coordinate through the EventBus
// - Single writer: one task owns the materialized library view
// - Explicit: No implicit behavior, no magic
// - Application Layer: UI boundary (DTOs + commands)

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod app;
pub mod application;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    validate_book,
    validate_criteria,
    // Book
    BookId,
    BookRecord,
    BookRef,
    // Criteria
    Criteria,
    DomainError,
    // Statistics
    LibraryStatistics,
    ReadingStatus,
    SortKey,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    register_library_view_handlers,
    DomainEvent,
    EventBus,
    EventLogEntry,
    LibraryChangeKind,
    LibraryChanged,
    StatisticsUpdated,
    ViewDegraded,
    ViewRecovered,
    ViewUpdated,
};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{BookRepository, BookSnapshotProvider, InMemoryBookRepository};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    materialize,
    // Book Service
    AddBookRequest,
    BookService,
    ChangeCoalescer,
    ChangeSource,
    // Library View
    EngineConfig,
    Fingerprint,
    LibrarySnapshot,
    LibraryViewHandle,
    LibraryViewService,
    MaterializationCache,
    MaterializedView,
    SettledChanges,
    // Statistics Service
    StatisticsService,
    Transition,
    TransitionPolicy,
    UpdateFlagsRequest,
    ViewStats,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use app::{init_library_subsystem, LibraryConfig};
pub use application::AppState;

// Re-export application submodules
pub use application::commands;
pub use application::dto;
