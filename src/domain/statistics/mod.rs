//! Critical Statistics Invariants:
//!
//! 1. Statistics are ALWAYS derived, NEVER primary
//! 2. Statistics can be recalculated at any time from a snapshot
//! 3. Statistics NEVER alter book records
//! 4. Stale statistics are acceptable (eventual consistency)

pub mod entity;
pub use entity::LibraryStatistics;
