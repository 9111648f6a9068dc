pub mod entity;
pub mod invariants;

pub use entity::{BookId, BookRecord, BookRef, ReadingStatus};
pub use invariants::validate_book;
