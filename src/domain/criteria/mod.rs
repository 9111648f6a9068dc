//! Critical Criteria Invariants:
//!
//! 1. Criteria are values: replaced, never mutated in place
//! 2. Equality covers every field
//! 3. The status filter is never empty
//! 4. Only search text changes are treated as high-frequency input

pub mod entity;
pub mod invariants;

pub use entity::{Criteria, SortKey};
pub use invariants::validate_criteria;
