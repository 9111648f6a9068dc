// events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::book::BookId;
use crate::services::materialization_types::{Fingerprint, Transition};

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// COLLECTION EVENTS
// ============================================================================

/// What kind of mutation bumped the collection version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryChangeKind {
    Added,
    Updated,
    Removed,
}

/// Emitted after every observable mutation of the book collection.
/// `version` is the collection version after the mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryChanged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub version: u64,
    pub change: LibraryChangeKind,
    pub book_id: BookId,
}

impl LibraryChanged {
    pub fn new(version: u64, change: LibraryChangeKind, book_id: BookId) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            version,
            change,
            book_id,
        }
    }
}

impl DomainEvent for LibraryChanged {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "LibraryChanged" }
}

// ============================================================================
// VIEW EVENTS
// ============================================================================

/// Emitted when a new materialized view has been published.
/// Read `transition` once and discard it; it is not persistent state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub revision: u64,
    pub fingerprint: Fingerprint,
    pub count: usize,
    pub transition: Transition,
}

impl ViewUpdated {
    pub fn new(revision: u64, fingerprint: Fingerprint, count: usize, transition: Transition) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            revision,
            fingerprint,
            count,
            transition,
        }
    }
}

impl DomainEvent for ViewUpdated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ViewUpdated" }
}

/// Emitted when the collection snapshot could not be read.
/// The last published view stays current.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewDegraded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub reason: String,
}

impl ViewDegraded {
    pub fn new(reason: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            reason,
        }
    }
}

impl DomainEvent for ViewDegraded {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ViewDegraded" }
}

/// Emitted on the first successful snapshot after a degraded period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewRecovered {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

impl ViewRecovered {
    pub fn new() -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
        }
    }
}

impl Default for ViewRecovered {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainEvent for ViewRecovered {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "ViewRecovered" }
}

// ============================================================================
// STATISTICS EVENTS
// ============================================================================

/// Emitted when library statistics are recalculated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub collection_version: u64,
}

impl StatisticsUpdated {
    pub fn new(collection_version: u64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            collection_version,
        }
    }
}

impl DomainEvent for StatisticsUpdated {
    fn event_id(&self) -> Uuid { self.event_id }
    fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
    fn event_type(&self) -> &'static str { "StatisticsUpdated" }
}
