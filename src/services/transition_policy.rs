// src/services/transition_policy.rs
//
// Transition Policy - decides whether a view update animates.
//
// Small growth (background trickle) animates; shrinkage, large growth and
// pure re-filtering replace immediately. An identical sequence is a no-op.

use std::sync::Arc;

use crate::domain::book::BookRef;
use crate::services::materialization_types::Transition;

/// Default largest growth that still animates
pub const DEFAULT_MAX_ANIMATED_GROWTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPolicy {
    max_animated_growth: usize,
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ANIMATED_GROWTH)
    }
}

impl TransitionPolicy {
    pub fn new(max_animated_growth: usize) -> Self {
        Self { max_animated_growth }
    }

    /// Classify the change from `previous` to `next`
    pub fn classify(&self, previous: &[BookRef], next: &[BookRef]) -> Transition {
        let grew_by = next.len().saturating_sub(previous.len());
        if next.len() > previous.len() && grew_by <= self.max_animated_growth {
            Transition::IncrementalAnimated
        } else {
            Transition::Immediate
        }
    }

    /// Same count, same ids in the same order, and no record content
    /// changed underneath (a status edit must still reach the screen).
    pub fn is_unchanged(previous: &[BookRef], next: &[BookRef]) -> bool {
        previous.len() == next.len()
            && previous
                .iter()
                .zip(next.iter())
                .all(|(a, b)| Arc::ptr_eq(a, b) || a == b)
    }

    /// `None` when nothing observable changed; otherwise the classification
    pub fn evaluate(&self, previous: &[BookRef], next: &[BookRef]) -> Option<Transition> {
        if Self::is_unchanged(previous, next) {
            None
        } else {
            Some(self.classify(previous, next))
        }
    }
}
