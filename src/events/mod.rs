// src/events/mod.rs
//
// Internal Event System - Public API
//
// CRITICAL: EventHandler is INTERNAL and must NOT be exported

// ============================================================================
// EVENT INFRASTRUCTURE
// ============================================================================

pub mod bus;
pub mod types;

// ============================================================================
// HANDLERS
// ============================================================================

pub mod handlers;

// ============================================================================
// PUBLIC EXPORTS - Event Types and Bus Only
// ============================================================================

pub use types::DomainEvent;

pub use types::{
    // Collection
    LibraryChangeKind,
    LibraryChanged,
    // Statistics
    StatisticsUpdated,
    // View
    ViewDegraded,
    ViewRecovered,
    ViewUpdated,
};

pub use bus::{EventBus, EventLogEntry};

pub use handlers::register_library_view_handlers;
