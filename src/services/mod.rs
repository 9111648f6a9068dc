// src/services/mod.rs
//
// Services Module - Orchestration Layer
//
// The library view pipeline, bottom-up:
//   materialization_engine  -> filter, dedupe and sort one snapshot
//   materialization_cache   -> single-slot memo keyed by Fingerprint
//   change_coalescer        -> trailing debounce per change source
//   transition_policy       -> animate / replace / skip
//   library_view_service    -> the single-writer task tying it together

pub mod book_service;
pub mod change_coalescer;
pub mod engine_config;
pub mod library_view_service;
pub mod materialization_cache;
pub mod materialization_engine;
pub mod materialization_types;
pub mod statistics_service;
pub mod transition_policy;

#[cfg(test)]
mod library_view_service_tests;

// Re-export all services and their types
pub use book_service::{AddBookRequest, BookService, UpdateFlagsRequest};

pub use change_coalescer::{ChangeCoalescer, ChangeSource, SettledChanges};

pub use engine_config::EngineConfig;

pub use library_view_service::{LibraryViewHandle, LibraryViewService, ViewStats};

pub use materialization_cache::MaterializationCache;

pub use materialization_engine::materialize;

pub use materialization_types::{Fingerprint, LibrarySnapshot, MaterializedView, Transition};

pub use statistics_service::StatisticsService;

pub use transition_policy::{TransitionPolicy, DEFAULT_MAX_ANIMATED_GROWTH};
