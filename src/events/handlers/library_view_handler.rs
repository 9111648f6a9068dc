// src/events/handlers/library_view_handler.rs
//
// Bridges collection events into the view engine.
//
// CRITICAL RULES:
// - Handlers only forward notifications, they never recompute inline
// - Handlers run on the emitting thread and must not block
// - A stopped engine is logged, never propagated to the emitter

use log::{debug, warn};

use crate::events::{EventBus, LibraryChanged};
use crate::services::LibraryViewHandle;

/// Register handlers that keep the library view in step with the collection
pub fn register_library_view_handlers(event_bus: &EventBus, view: LibraryViewHandle) {
    event_bus.subscribe::<LibraryChanged, _>(move |event| {
        debug!(
            "[VIEW] LibraryChanged v{} ({:?} {})",
            event.version, event.change, event.book_id
        );

        if let Err(e) = view.notify_data_changed() {
            warn!("[VIEW] Dropped change notification: {}", e);
        }
    });

    debug!("[VIEW] Library view handlers registered");
}
