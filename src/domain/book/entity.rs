use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Shared, immutable handle to a book snapshot.
/// Views hold these instead of cloning whole records.
pub type BookRef = Arc<BookRecord>;

/// Opaque identifier of a cataloged book.
/// Stable for the whole lifetime of the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    /// Generates a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BookId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BookId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Represents one cataloged book.
/// Records are mutated only by the owning repository; every consumer
/// reads immutable snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Internal immutable identifier
    pub id: BookId,

    /// Title (may be empty when unknown)
    pub title: String,

    /// Ordered author names (may be empty when unknown)
    pub author_names: Vec<String>,

    /// Current reading status
    pub reading_status: ReadingStatus,

    pub on_wishlist: bool,
    pub owned: bool,
    pub is_favorited: bool,

    /// Set once at creation, never mutated
    pub date_added: DateTime<Utc>,

    /// Optional 1..=5 rating
    pub rating: Option<u8>,
}

impl BookRecord {
    /// Create a new BookRecord with default flags and status
    pub fn new(title: String, author_names: Vec<String>) -> Self {
        Self {
            id: BookId::generate(),
            title,
            author_names,
            reading_status: ReadingStatus::ToRead,
            on_wishlist: false,
            owned: false,
            is_favorited: false,
            date_added: Utc::now(),
            rating: None,
        }
    }

    /// First listed author, if any non-blank one exists
    pub fn primary_author(&self) -> Option<&str> {
        self.author_names
            .first()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
    }

    /// All author names joined for free-text matching
    pub fn joined_authors(&self) -> String {
        self.author_names.join(", ")
    }
}

/// Reading status of a book.
/// Declaration order is the sort order used by `SortKey::Status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    ToRead,
    Reading,
    Read,
    OnHold,
    DidNotFinish,
}

impl ReadingStatus {
    pub const ALL: [ReadingStatus; 5] = [
        ReadingStatus::ToRead,
        ReadingStatus::Reading,
        ReadingStatus::Read,
        ReadingStatus::OnHold,
        ReadingStatus::DidNotFinish,
    ];

    /// Declared ordinal position
    pub fn ordinal(self) -> u8 {
        match self {
            ReadingStatus::ToRead => 0,
            ReadingStatus::Reading => 1,
            ReadingStatus::Read => 2,
            ReadingStatus::OnHold => 3,
            ReadingStatus::DidNotFinish => 4,
        }
    }
}

impl std::fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadingStatus::ToRead => write!(f, "to_read"),
            ReadingStatus::Reading => write!(f, "reading"),
            ReadingStatus::Read => write!(f, "read"),
            ReadingStatus::OnHold => write!(f, "on_hold"),
            ReadingStatus::DidNotFinish => write!(f, "did_not_finish"),
        }
    }
}
