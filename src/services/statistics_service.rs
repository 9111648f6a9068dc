// src/services/statistics_service.rs
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, warn};

use crate::domain::statistics::LibraryStatistics;
use crate::error::AppResult;
use crate::events::{EventBus, LibraryChanged, StatisticsUpdated};
use crate::repositories::BookSnapshotProvider;

pub struct StatisticsService {
    provider: Arc<dyn BookSnapshotProvider>,
    event_bus: Arc<EventBus>,
    latest: Arc<RwLock<Option<LibraryStatistics>>>,
}

impl StatisticsService {
    pub fn new(provider: Arc<dyn BookSnapshotProvider>, event_bus: Arc<EventBus>) -> Self {
        Self {
            provider,
            event_bus,
            latest: Arc::new(RwLock::new(None)),
        }
    }

    /// Recalculate from a fresh snapshot and remember the result
    pub fn calculate(&self) -> AppResult<LibraryStatistics> {
        let stats = compute(self.provider.as_ref())?;
        store(&self.latest, stats.clone());
        self.event_bus
            .emit(StatisticsUpdated::new(stats.collection_version));
        Ok(stats)
    }

    /// Last calculated statistics, possibly stale
    pub fn latest(&self) -> Option<LibraryStatistics> {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Keep statistics current as the collection changes
    pub fn register_event_handlers(&self) {
        let provider = Arc::clone(&self.provider);
        let latest = Arc::clone(&self.latest);
        let event_bus = Arc::clone(&self.event_bus);

        self.event_bus.subscribe::<LibraryChanged, _>(move |event| {
            match compute(provider.as_ref()) {
                Ok(stats) => {
                    debug!(
                        "[BOOKS] Statistics recalculated at v{} after {:?}",
                        stats.collection_version, event.change
                    );
                    let version = stats.collection_version;
                    store(&latest, stats);
                    event_bus.emit(StatisticsUpdated::new(version));
                }
                Err(e) => warn!("[BOOKS] Statistics left stale: {}", e),
            }
        });
    }
}

fn compute(provider: &dyn BookSnapshotProvider) -> AppResult<LibraryStatistics> {
    let snapshot = provider.snapshot()?;
    Ok(LibraryStatistics::from_records(
        snapshot.records.iter().map(|book| book.as_ref()),
        snapshot.version,
    ))
}

fn store(slot: &RwLock<Option<LibraryStatistics>>, stats: LibraryStatistics) {
    *slot.write().unwrap_or_else(PoisonError::into_inner) = Some(stats);
}
