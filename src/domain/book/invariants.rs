use super::entity::BookRecord;
use crate::domain::{DomainError, DomainResult};

/// Validates all BookRecord invariants
/// These are the absolute rules that must hold for a record to be stored
pub fn validate_book(book: &BookRecord) -> DomainResult<()> {
    validate_id(book)?;
    validate_rating(book.rating)?;
    Ok(())
}

/// Identifier cannot be blank
fn validate_id(book: &BookRecord) -> DomainResult<()> {
    if book.id.as_str().trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Book id cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Rating, when present, must be 1..=5
fn validate_rating(rating: Option<u8>) -> DomainResult<()> {
    match rating {
        Some(value) if !(1..=5).contains(&value) => Err(DomainError::RatingOutOfRange(value)),
        _ => Ok(()),
    }
}

/// Invariants that must hold true for the Book domain:
///
/// 1. Identity is immutable and non-empty
/// 2. Title and authors may be empty (unknown metadata)
/// 3. Rating is absent or within 1..=5
/// 4. date_added never changes after creation

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::BookId;

    #[test]
    fn test_valid_book() {
        let book = BookRecord::new("Dune".to_string(), vec!["Frank Herbert".to_string()]);
        assert!(validate_book(&book).is_ok());
    }

    #[test]
    fn test_unknown_metadata_is_allowed() {
        let book = BookRecord::new(String::new(), Vec::new());
        assert!(validate_book(&book).is_ok());
    }

    #[test]
    fn test_blank_id_fails() {
        let mut book = BookRecord::new("Dune".to_string(), Vec::new());
        book.id = BookId::from("  ");
        assert!(validate_book(&book).is_err());
    }

    #[test]
    fn test_rating_bounds() {
        let mut book = BookRecord::new("Dune".to_string(), Vec::new());

        book.rating = Some(0);
        assert!(matches!(
            validate_book(&book),
            Err(DomainError::RatingOutOfRange(0))
        ));

        book.rating = Some(6);
        assert!(validate_book(&book).is_err());

        book.rating = Some(5);
        assert!(validate_book(&book).is_ok());
    }
}
