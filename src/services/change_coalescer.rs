// src/services/change_coalescer.rs
//
// Change Coalescer - trailing debounce per change source.
//
// Pure state machine over explicit instants; the view engine task owns the
// timer and asks for the next deadline. Keeping time out of this type makes
// the window arithmetic testable without a runtime.
//
// CRITICAL RULES:
// - Trailing debounce: every notification re-arms its source's window
// - A window fires only once its deadline has passed
// - Sources whose windows have both passed settle together

use std::time::Duration;
use tokio::time::Instant;

/// High-frequency notification sources that are debounced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeSource {
    /// Collection mutations (background sync, imports)
    Data,

    /// Free-text search keystrokes
    Search,
}

impl std::fmt::Display for ChangeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeSource::Data => write!(f, "data"),
            ChangeSource::Search => write!(f, "search"),
        }
    }
}

/// What settled in one `take_settled` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettledChanges {
    pub data: bool,
    pub search: bool,
    /// Notifications absorbed into this settlement
    pub absorbed: u32,
}

#[derive(Debug, Clone, Copy, Default)]
struct PendingWindow {
    deadline: Option<Instant>,
    absorbed: u32,
}

impl PendingWindow {
    fn arm(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
        self.absorbed = self.absorbed.saturating_add(1);
    }

    fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| deadline <= now)
    }

    fn clear(&mut self) -> u32 {
        let absorbed = self.absorbed;
        *self = Self::default();
        absorbed
    }
}

pub struct ChangeCoalescer {
    data_window: Duration,
    search_window: Duration,
    data: PendingWindow,
    search: PendingWindow,
}

impl ChangeCoalescer {
    pub fn new(data_window: Duration, search_window: Duration) -> Self {
        Self {
            data_window,
            search_window,
            data: PendingWindow::default(),
            search: PendingWindow::default(),
        }
    }

    pub fn window(&self, source: ChangeSource) -> Duration {
        match source {
            ChangeSource::Data => self.data_window,
            ChangeSource::Search => self.search_window,
        }
    }

    /// Record a notification at `now`, (re)starting that source's window
    pub fn notify(&mut self, source: ChangeSource, now: Instant) {
        let deadline = now + self.window(source);
        match source {
            ChangeSource::Data => self.data.arm(deadline),
            ChangeSource::Search => self.search.arm(deadline),
        }
    }

    /// Earliest armed deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.data.deadline, self.search.deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.next_deadline().is_some()
    }

    /// Disarm every source whose deadline has passed and report them.
    /// Returns `None` when nothing is due yet.
    pub fn take_settled(&mut self, now: Instant) -> Option<SettledChanges> {
        let mut settled = SettledChanges::default();

        if self.data.is_due(now) {
            settled.data = true;
            settled.absorbed += self.data.clear();
        }
        if self.search.is_due(now) {
            settled.search = true;
            settled.absorbed += self.search.clear();
        }

        (settled.data || settled.search).then_some(settled)
    }

    /// Drop every pending window; used when an immediate recomputation
    /// already reflects the latest state.
    pub fn cancel_all(&mut self) -> u32 {
        self.data.clear() + self.search.clear()
    }
}
