// src/app/library_init.rs
//
// Library Initialization
//
// Wires the collection, services and view engine onto one event bus.
//
// CRITICAL RULES:
// - Must run inside a tokio runtime (the view engine is a task)
// - The collection is the only source of book data
// - Handlers are registered before anything can mutate the collection

use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::application::AppState;
use crate::domain::criteria::Criteria;
use crate::error::AppResult;
use crate::events::{register_library_view_handlers, EventBus};
use crate::repositories::BookRepository;
use crate::services::{BookService, EngineConfig, LibraryViewService, StatisticsService};

/// Configuration for the library subsystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub engine: EngineConfig,

    /// Criteria the first view is materialized with
    pub initial_criteria: Criteria,

    /// Recalculate statistics on every collection change
    pub track_statistics: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            initial_criteria: Criteria::default(),
            track_statistics: true,
        }
    }
}

impl LibraryConfig {
    /// Parse from JSON; missing keys fall back to defaults
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.engine.validate()?;
        Ok(config)
    }
}

/// Initializes the library subsystem.
///
/// This function:
/// 1. Creates the event bus and services
/// 2. Spawns the library view engine
/// 3. Registers event handlers with the event bus
pub fn init_library_subsystem<R>(repo: Arc<R>, config: LibraryConfig) -> AppResult<AppState>
where
    R: BookRepository + 'static,
{
    info!("[VIEW] Initializing library subsystem...");

    let event_bus = Arc::new(EventBus::new());

    let library_view = LibraryViewService::spawn(
        repo.clone(),
        Arc::clone(&event_bus),
        &config.engine,
        config.initial_criteria,
    )?;
    register_library_view_handlers(&event_bus, library_view.clone());

    let statistics_service = Arc::new(StatisticsService::new(
        repo.clone(),
        Arc::clone(&event_bus),
    ));
    if config.track_statistics {
        statistics_service.register_event_handlers();
    }

    let book_service = Arc::new(BookService::new(repo, Arc::clone(&event_bus)));

    info!("[VIEW] Library subsystem initialized");
    Ok(AppState {
        event_bus,
        book_service,
        statistics_service,
        library_view,
    })
}
