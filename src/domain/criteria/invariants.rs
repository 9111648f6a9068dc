use super::entity::Criteria;
use crate::domain::{DomainError, DomainResult};

/// Validates Criteria at the engine boundary.
/// Malformed criteria are rejected, never coerced.
pub fn validate_criteria(criteria: &Criteria) -> DomainResult<()> {
    if criteria.status_filter.is_empty() {
        return Err(DomainError::InvariantViolation(
            "Status filter must contain at least one status".to_string(),
        ));
    }
    Ok(())
}
