// src/events/handlers/mod.rs
//
// Event Handlers - INTERNAL MODULE
//
// Handlers use closure-based subscription via EventBus::subscribe.

pub mod library_view_handler;

// Only export the registration function, not handler closures
pub use library_view_handler::register_library_view_handlers;
