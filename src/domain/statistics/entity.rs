use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::book::{BookRecord, ReadingStatus};

/// Aggregated statistics over one collection snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryStatistics {
    pub total_books: u32,
    pub by_status: BTreeMap<ReadingStatus, u32>,
    pub owned: u32,
    pub on_wishlist: u32,
    pub favorites: u32,
    pub rated: u32,
    /// Mean of present ratings; `None` when nothing is rated
    pub average_rating: Option<f32>,
    /// Collection version the numbers were derived from
    pub collection_version: u64,
}

impl LibraryStatistics {
    /// Derive statistics from a sequence of records
    pub fn from_records<'a, I>(records: I, collection_version: u64) -> Self
    where
        I: IntoIterator<Item = &'a BookRecord>,
    {
        let mut by_status: BTreeMap<ReadingStatus, u32> =
            ReadingStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        let mut total_books = 0u32;
        let mut owned = 0u32;
        let mut on_wishlist = 0u32;
        let mut favorites = 0u32;
        let mut rated = 0u32;
        let mut rating_sum = 0u32;

        for book in records {
            total_books += 1;
            *by_status.entry(book.reading_status).or_insert(0) += 1;

            if book.owned {
                owned += 1;
            }
            if book.on_wishlist {
                on_wishlist += 1;
            }
            if book.is_favorited {
                favorites += 1;
            }
            if let Some(rating) = book.rating {
                rated += 1;
                rating_sum += u32::from(rating);
            }
        }

        let average_rating = if rated > 0 {
            Some(rating_sum as f32 / rated as f32)
        } else {
            None
        };

        Self {
            total_books,
            by_status,
            owned,
            on_wishlist,
            favorites,
            rated,
            average_rating,
            collection_version,
        }
    }

    pub fn count_for(&self, status: ReadingStatus) -> u32 {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection() {
        let stats = LibraryStatistics::from_records(std::iter::empty(), 0);
        assert_eq!(stats.total_books, 0);
        assert_eq!(stats.average_rating, None);
        for status in ReadingStatus::ALL {
            assert_eq!(stats.count_for(status), 0);
        }
    }

    #[test]
    fn test_flags_and_ratings_are_counted() {
        let mut a = BookRecord::new("A".to_string(), Vec::new());
        a.on_wishlist = true;
        a.rating = Some(5);
        let mut b = BookRecord::new("B".to_string(), Vec::new());
        b.is_favorited = true;
        b.reading_status = ReadingStatus::DidNotFinish;
        let c = BookRecord::new("C".to_string(), Vec::new());

        let stats = LibraryStatistics::from_records([&a, &b, &c], 7);
        assert_eq!(stats.total_books, 3);
        assert_eq!(stats.on_wishlist, 1);
        assert_eq!(stats.favorites, 1);
        assert_eq!(stats.rated, 1);
        assert_eq!(stats.average_rating, Some(5.0));
        assert_eq!(stats.count_for(ReadingStatus::DidNotFinish), 1);
        assert_eq!(stats.count_for(ReadingStatus::ToRead), 2);
        assert_eq!(stats.collection_version, 7);
    }
}
