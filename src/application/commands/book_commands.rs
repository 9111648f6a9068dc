// src/application/commands/book_commands.rs

use crate::application::{dto::*, error_handling::ToErrorResponse, state::AppState};
use crate::domain::book::{BookId, ReadingStatus};
use crate::error::AppError;
use crate::services::{AddBookRequest, UpdateFlagsRequest};

/// Add a book; returns its id
pub fn add_book(state: &AppState, input: AddBookDto) -> Result<String, String> {
    let mut request = AddBookRequest::new(input.title, input.author_names);
    request.reading_status = input.reading_status.unwrap_or(ReadingStatus::ToRead);
    request.on_wishlist = input.on_wishlist;
    request.owned = input.owned;
    request.rating = input.rating;

    state
        .book_service
        .add_book(request)
        .map(|id| id.to_string())
        .to_error_response()
}

pub fn get_book(state: &AppState, book_id: String) -> Result<BookDto, String> {
    state
        .book_service
        .get_book(&BookId::from(book_id))
        .and_then(|book| book.ok_or(AppError::NotFound))
        .map(BookDto::from)
        .to_error_response()
}

pub fn update_reading_status(
    state: &AppState,
    book_id: String,
    status: ReadingStatus,
) -> Result<(), String> {
    state
        .book_service
        .update_status(&BookId::from(book_id), status)
        .to_error_response()
}

pub fn update_book_flags(
    state: &AppState,
    book_id: String,
    on_wishlist: Option<bool>,
    owned: Option<bool>,
    is_favorited: Option<bool>,
) -> Result<(), String> {
    state
        .book_service
        .update_flags(UpdateFlagsRequest {
            book_id: BookId::from(book_id),
            on_wishlist,
            owned,
            is_favorited,
        })
        .to_error_response()
}

pub fn set_book_rating(
    state: &AppState,
    book_id: String,
    rating: Option<u8>,
) -> Result<(), String> {
    state
        .book_service
        .set_rating(&BookId::from(book_id), rating)
        .to_error_response()
}

pub fn remove_book(state: &AppState, book_id: String) -> Result<(), String> {
    state
        .book_service
        .remove_book(&BookId::from(book_id))
        .to_error_response()
}
