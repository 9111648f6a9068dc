// src/services/book_service.rs
use crate::domain::book::{validate_book, BookId, BookRecord, ReadingStatus};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, LibraryChangeKind, LibraryChanged};
use crate::repositories::BookRepository;
use chrono::{DateTime, Utc};
use log::info;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AddBookRequest {
    pub title: String,
    pub author_names: Vec<String>,
    pub reading_status: ReadingStatus,
    pub on_wishlist: bool,
    pub owned: bool,
    pub rating: Option<u8>,
    /// Overrides the creation timestamp (imports keep their original date)
    pub date_added: Option<DateTime<Utc>>,
}

impl AddBookRequest {
    pub fn new(title: impl Into<String>, author_names: Vec<String>) -> Self {
        Self {
            title: title.into(),
            author_names,
            reading_status: ReadingStatus::ToRead,
            on_wishlist: false,
            owned: false,
            rating: None,
            date_added: None,
        }
    }
}

/// Flag changes; `None` leaves the flag as it is
#[derive(Debug, Clone)]
pub struct UpdateFlagsRequest {
    pub book_id: BookId,
    pub on_wishlist: Option<bool>,
    pub owned: Option<bool>,
    pub is_favorited: Option<bool>,
}

pub struct BookService {
    book_repo: Arc<dyn BookRepository>,
    event_bus: Arc<EventBus>,
}

impl BookService {
    pub fn new(book_repo: Arc<dyn BookRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            book_repo,
            event_bus,
        }
    }

    pub fn add_book(&self, request: AddBookRequest) -> AppResult<BookId> {
        let mut book = BookRecord::new(request.title, request.author_names);
        book.reading_status = request.reading_status;
        book.on_wishlist = request.on_wishlist;
        book.owned = request.owned;
        book.rating = request.rating;
        if let Some(date_added) = request.date_added {
            book.date_added = date_added;
        }

        validate_book(&book).map_err(AppError::Domain)?;
        let version = self.book_repo.save(&book)?;

        info!("[BOOKS] Added {} \"{}\" (v{})", book.id, book.title, version);
        self.event_bus.emit(LibraryChanged::new(
            version,
            LibraryChangeKind::Added,
            book.id.clone(),
        ));

        Ok(book.id)
    }

    pub fn update_status(&self, book_id: &BookId, status: ReadingStatus) -> AppResult<()> {
        self.modify(book_id, |book| book.reading_status = status)
    }

    pub fn update_flags(&self, request: UpdateFlagsRequest) -> AppResult<()> {
        self.modify(&request.book_id, |book| {
            if let Some(on_wishlist) = request.on_wishlist {
                book.on_wishlist = on_wishlist;
            }
            if let Some(owned) = request.owned {
                book.owned = owned;
            }
            if let Some(is_favorited) = request.is_favorited {
                book.is_favorited = is_favorited;
            }
        })
    }

    /// `None` clears the rating
    pub fn set_rating(&self, book_id: &BookId, rating: Option<u8>) -> AppResult<()> {
        self.modify(book_id, |book| book.rating = rating)
    }

    pub fn remove_book(&self, book_id: &BookId) -> AppResult<()> {
        let version = self.book_repo.delete(book_id)?;

        info!("[BOOKS] Removed {} (v{})", book_id, version);
        self.event_bus.emit(LibraryChanged::new(
            version,
            LibraryChangeKind::Removed,
            book_id.clone(),
        ));
        Ok(())
    }

    pub fn get_book(&self, book_id: &BookId) -> AppResult<Option<BookRecord>> {
        self.book_repo.get_by_id(book_id)
    }

    pub fn list_all_books(&self) -> AppResult<Vec<BookRecord>> {
        self.book_repo.list_all()
    }

    fn modify<F>(&self, book_id: &BookId, change: F) -> AppResult<()>
    where
        F: FnOnce(&mut BookRecord),
    {
        let mut book = self
            .book_repo
            .get_by_id(book_id)?
            .ok_or(AppError::NotFound)?;

        let before = book.clone();
        change(&mut book);
        if book == before {
            return Ok(());
        }

        validate_book(&book).map_err(AppError::Domain)?;
        let version = self.book_repo.save(&book)?;

        info!("[BOOKS] Updated {} (v{})", book.id, version);
        self.event_bus.emit(LibraryChanged::new(
            version,
            LibraryChangeKind::Updated,
            book.id,
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::repositories::InMemoryBookRepository;
    use std::sync::Mutex;

    fn setup() -> (BookService, Arc<InMemoryBookRepository>, Arc<Mutex<Vec<LibraryChanged>>>) {
        let repo = Arc::new(InMemoryBookRepository::new());
        let bus = Arc::new(EventBus::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        bus.subscribe::<LibraryChanged, _>(move |event| {
            sink.lock().unwrap().push(event.clone());
        });

        let service = BookService::new(repo.clone(), bus);
        (service, repo, seen)
    }

    #[test]
    fn test_add_book_emits_added_with_version() {
        let (service, _repo, seen) = setup();

        let id = service
            .add_book(AddBookRequest::new("Dune", vec!["Frank Herbert".to_string()]))
            .unwrap();

        let events = seen.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].version, 1);
        assert_eq!(events[0].change, LibraryChangeKind::Added);
        assert_eq!(events[0].book_id, id);
    }

    #[test]
    fn test_invalid_rating_is_rejected_before_save() {
        let (service, repo, seen) = setup();

        let mut request = AddBookRequest::new("Dune", Vec::new());
        request.rating = Some(9);
        let result = service.add_book(request);

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::RatingOutOfRange(9)))
        ));
        assert_eq!(repo.version().unwrap(), 0);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_update_status_and_flags() {
        let (service, _repo, seen) = setup();
        let id = service.add_book(AddBookRequest::new("Emma", Vec::new())).unwrap();

        service.update_status(&id, ReadingStatus::Reading).unwrap();
        service
            .update_flags(UpdateFlagsRequest {
                book_id: id.clone(),
                on_wishlist: None,
                owned: Some(true),
                is_favorited: Some(true),
            })
            .unwrap();

        let book = service.get_book(&id).unwrap().unwrap();
        assert_eq!(book.reading_status, ReadingStatus::Reading);
        assert!(book.owned);
        assert!(book.is_favorited);
        assert!(!book.on_wishlist);

        let versions: Vec<u64> = seen.lock().unwrap().iter().map(|e| e.version).collect();
        assert_eq!(versions, vec![1, 2, 3]);
    }

    #[test]
    fn test_noop_update_does_not_bump_version() {
        let (service, repo, seen) = setup();
        let id = service.add_book(AddBookRequest::new("Emma", Vec::new())).unwrap();

        service.update_status(&id, ReadingStatus::ToRead).unwrap();

        assert_eq!(repo.version().unwrap(), 1);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_set_and_clear_rating() {
        let (service, _repo, _seen) = setup();
        let id = service.add_book(AddBookRequest::new("Emma", Vec::new())).unwrap();

        service.set_rating(&id, Some(4)).unwrap();
        assert_eq!(service.get_book(&id).unwrap().unwrap().rating, Some(4));

        service.set_rating(&id, None).unwrap();
        assert_eq!(service.get_book(&id).unwrap().unwrap().rating, None);

        assert!(service.set_rating(&id, Some(0)).is_err());
    }

    #[test]
    fn test_remove_book_emits_removed() {
        let (service, _repo, seen) = setup();
        let id = service.add_book(AddBookRequest::new("Emma", Vec::new())).unwrap();

        service.remove_book(&id).unwrap();

        let events = seen.lock().unwrap();
        assert_eq!(events.last().unwrap().change, LibraryChangeKind::Removed);
        assert!(service.list_all_books().unwrap().is_empty());
    }

    #[test]
    fn test_missing_book_is_not_found() {
        let (service, _repo, _seen) = setup();
        let missing = BookId::from("nope");

        assert!(matches!(
            service.update_status(&missing, ReadingStatus::Read),
            Err(AppError::NotFound)
        ));
        assert!(matches!(service.remove_book(&missing), Err(AppError::NotFound)));
    }
}
