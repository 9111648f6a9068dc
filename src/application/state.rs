// src/application/state.rs

use std::sync::Arc;

use crate::events::EventBus;
use crate::services::{BookService, LibraryViewHandle, StatisticsService};

/// Application state shared with the UI shell.
/// All fields are Arc-wrapped (or cheap handles) for sharing across commands.
/// Built by `app::init_library_subsystem`.
#[derive(Clone)]
pub struct AppState {
    pub event_bus: Arc<EventBus>,
    pub book_service: Arc<BookService>,
    pub statistics_service: Arc<StatisticsService>,
    pub library_view: LibraryViewHandle,
}
