// src/services/library_view_service_tests.rs
//
// Library View Service Tests
//
// All timing runs on a paused tokio clock, so windows are exact and the
// tests never wait on wall time.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use chrono::DateTime;
    use tokio::time::sleep;

    use crate::domain::book::{BookId, BookRecord, ReadingStatus};
    use crate::domain::criteria::{Criteria, SortKey};
    use crate::error::AppError;
    use crate::events::{EventBus, ViewDegraded, ViewRecovered, ViewUpdated};
    use crate::repositories::{BookRepository, InMemoryBookRepository, MockBookSnapshotProvider};
    use crate::services::{
        EngineConfig, LibraryViewHandle, LibraryViewService, Transition,
    };

    // ========================================================================
    // TEST HELPERS
    // ========================================================================

    fn book(n: usize) -> BookRecord {
        let mut book = BookRecord::new(format!("Book {:02}", n), vec![format!("Author {}", n)]);
        book.id = BookId::from(format!("b{:02}", n));
        book.date_added = DateTime::from_timestamp(1_700_000_000 + n as i64, 0).unwrap();
        book
    }

    fn library(count: usize) -> Vec<BookRecord> {
        (0..count).map(book).collect()
    }

    struct Harness {
        repo: Arc<InMemoryBookRepository>,
        bus: Arc<EventBus>,
        view: LibraryViewHandle,
        updates: Arc<Mutex<Vec<ViewUpdated>>>,
    }

    impl Harness {
        async fn start(books: Vec<BookRecord>) -> Self {
            let repo = Arc::new(InMemoryBookRepository::with_books(books));
            let bus = Arc::new(EventBus::new());
            let view = LibraryViewService::spawn(
                repo.clone(),
                Arc::clone(&bus),
                &EngineConfig::default(),
                Criteria::default(),
            )
            .unwrap();

            let updates = Arc::new(Mutex::new(Vec::new()));
            let sink = Arc::clone(&updates);
            view.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

            view.flush().await.unwrap();
            Self {
                repo,
                bus,
                view,
                updates,
            }
        }

        fn published(&self) -> usize {
            self.view.stats().publications as usize
        }

        fn last_update(&self) -> ViewUpdated {
            self.updates.lock().unwrap().last().cloned().unwrap()
        }

        fn add(&self, n: usize) {
            self.repo.save(&book(n)).unwrap();
            self.view.notify_data_changed().unwrap();
        }
    }

    // ========================================================================
    // INITIAL LOAD
    // ========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_first_view_is_published_immediately() {
        let h = Harness::start(library(3)).await;

        let view = h.view.current_view();
        assert_eq!(view.count(), 3);
        assert_eq!(view.revision, 1);
        assert_eq!(view.transition, Transition::Immediate);
        assert_eq!(view.collection_version, 1);
        // Newest first
        assert_eq!(view.books()[0].id, BookId::from("b02"));
        assert_eq!(h.published(), 1);
    }

    // ========================================================================
    // DATA DEBOUNCE
    // ========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_data_burst_recomputes_once_with_latest_state() {
        let h = Harness::start(library(10)).await;

        for n in 10..13 {
            h.add(n);
            sleep(Duration::from_millis(30)).await;
        }
        h.view.flush().await.unwrap();
        assert_eq!(h.published(), 1);

        sleep(Duration::from_millis(100)).await;
        h.view.flush().await.unwrap();

        assert_eq!(h.published(), 2);
        assert_eq!(h.view.stats().recomputations, 2);
        let update = h.last_update();
        assert_eq!(update.count, 13);
        assert_eq!(update.transition, Transition::IncrementalAnimated);
        assert_eq!(h.view.current_view().collection_version, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_notification_queued_past_deadline_rearms_window() {
        let h = Harness::start(library(1)).await;

        h.add(1);
        h.view.flush().await.unwrap();

        // Second change is queued before the clock crosses the first deadline
        h.add(2);
        tokio::time::advance(Duration::from_millis(100)).await;
        h.view.flush().await.unwrap();

        assert_eq!(h.published(), 1);
        assert_eq!(h.view.current_view().count(), 1);

        sleep(Duration::from_millis(150)).await;
        h.view.flush().await.unwrap();

        assert_eq!(h.published(), 2);
        assert_eq!(h.view.stats().recomputations, 2);
        let view = h.view.current_view();
        assert_eq!(view.count(), 3);
        assert_eq!(view.collection_version, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_large_growth_is_immediate() {
        let h = Harness::start(library(10)).await;

        for n in 10..16 {
            h.add(n);
        }
        sleep(Duration::from_millis(150)).await;
        h.view.flush().await.unwrap();

        let update = h.last_update();
        assert_eq!(update.count, 16);
        assert_eq!(update.transition, Transition::Immediate);
    }

    #[tokio::test(start_paused = true)]
    async fn test_removal_is_immediate() {
        let h = Harness::start(library(5)).await;

        h.repo.delete(&BookId::from("b03")).unwrap();
        h.view.notify_data_changed().unwrap();
        sleep(Duration::from_millis(150)).await;
        h.view.flush().await.unwrap();

        let update = h.last_update();
        assert_eq!(update.count, 4);
        assert_eq!(update.transition, Transition::Immediate);
    }

    // ========================================================================
    // SEARCH DEBOUNCE
    // ========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_typing_waits_for_search_quiescence() {
        let mut books = library(4);
        books[1].title = "Dune".to_string();
        let h = Harness::start(books).await;

        for text in ["d", "du", "dun", "dune"] {
            h.view
                .update_criteria(Criteria::default().with_search_text(text))
                .unwrap();
            sleep(Duration::from_millis(100)).await;
        }
        // 100ms after the last keystroke
        h.view.flush().await.unwrap();
        assert_eq!(h.published(), 1);

        sleep(Duration::from_millis(150)).await;
        h.view.flush().await.unwrap();
        assert_eq!(h.published(), 1);

        sleep(Duration::from_millis(100)).await;
        h.view.flush().await.unwrap();
        assert_eq!(h.published(), 2);

        let view = h.view.current_view();
        assert_eq!(view.count(), 1);
        assert_eq!(view.books()[0].title, "Dune");
        assert_eq!(view.transition, Transition::Immediate);
        assert_eq!(h.view.criteria().search_text, "dune");
    }

    // ========================================================================
    // IMMEDIATE CRITERIA CHANGES
    // ========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_flag_toggle_recomputes_without_waiting() {
        let mut books = library(20);
        for book in books.iter_mut().take(4) {
            book.on_wishlist = true;
        }
        let h = Harness::start(books).await;

        let wishlist = Criteria {
            wishlist_only: true,
            ..Criteria::default()
        };
        h.view.update_criteria(wishlist).unwrap();
        h.view.flush().await.unwrap();

        assert_eq!(h.published(), 2);
        let update = h.last_update();
        assert_eq!(update.count, 4);
        assert_eq!(update.transition, Transition::Immediate);
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_change_supersedes_pending_search() {
        let mut books = library(6);
        books[2].title = "Xenogenesis".to_string();
        let h = Harness::start(books).await;

        let typed = Criteria::default().with_search_text("xeno");
        h.view.update_criteria(typed.clone()).unwrap();
        h.view
            .update_criteria(typed.with_sort_key(SortKey::Title))
            .unwrap();
        h.view.flush().await.unwrap();

        assert_eq!(h.published(), 2);
        assert_eq!(h.view.current_view().count(), 1);

        sleep(Duration::from_millis(500)).await;
        h.view.flush().await.unwrap();
        assert_eq!(h.published(), 2);
        assert_eq!(h.view.stats().recomputations, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_filter_change() {
        let mut books = library(6);
        books[0].reading_status = ReadingStatus::Read;
        books[5].reading_status = ReadingStatus::Read;
        let h = Harness::start(books).await;

        h.view
            .update_criteria(Criteria::default().with_statuses([ReadingStatus::Read]))
            .unwrap();
        h.view.flush().await.unwrap();

        let ids: Vec<BookId> = h.view.current_view().ids().cloned().collect();
        assert_eq!(ids, vec![BookId::from("b05"), BookId::from("b00")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_criteria_is_rejected() {
        let h = Harness::start(library(3)).await;

        let result = h
            .view
            .update_criteria(Criteria::default().with_statuses([]));

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(h.view.criteria(), Criteria::default());
        h.view.flush().await.unwrap();
        assert_eq!(h.published(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_criteria_is_ignored() {
        let h = Harness::start(library(3)).await;

        h.view.update_criteria(Criteria::default()).unwrap();
        h.view.flush().await.unwrap();

        assert_eq!(h.view.stats().recomputations, 1);
    }

    // ========================================================================
    // NO-OP AND CACHE
    // ========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_refresh_with_same_state_hits_cache_and_publishes_nothing() {
        let h = Harness::start(library(3)).await;

        h.view.refresh().unwrap();
        h.view.flush().await.unwrap();

        let stats = h.view.stats();
        assert_eq!(stats.recomputations, 2);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cache_misses, 1);
        assert_eq!(stats.publications, 1);
        assert_eq!(h.updates.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_edit_republishes_same_ids() {
        let h = Harness::start(library(3)).await;

        let mut edited = book(1);
        edited.reading_status = ReadingStatus::Reading;
        h.repo.save(&edited).unwrap();
        h.view.notify_data_changed().unwrap();
        sleep(Duration::from_millis(150)).await;
        h.view.flush().await.unwrap();

        assert_eq!(h.published(), 2);
        let view = h.view.current_view();
        assert_eq!(view.count(), 3);
        assert_eq!(view.transition, Transition::Immediate);
        assert_eq!(view.books()[1].reading_status, ReadingStatus::Reading);
    }

    // ========================================================================
    // DEGRADED MODE
    // ========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_snapshot_keeps_last_view() {
        let h = Harness::start(library(4)).await;
        let degraded = Arc::new(Mutex::new(0));
        let recovered = Arc::new(Mutex::new(0));
        {
            let degraded = Arc::clone(&degraded);
            h.bus
                .subscribe::<ViewDegraded, _>(move |_| *degraded.lock().unwrap() += 1);
            let recovered = Arc::clone(&recovered);
            h.bus
                .subscribe::<ViewRecovered, _>(move |_| *recovered.lock().unwrap() += 1);
        }

        h.repo.set_available(false);
        h.view.refresh().unwrap();
        h.view.refresh().unwrap();
        h.view.flush().await.unwrap();

        assert!(h.view.is_degraded());
        assert_eq!(*degraded.lock().unwrap(), 1);
        let view = h.view.current_view();
        assert_eq!(view.count(), 4);
        assert_eq!(view.revision, 1);

        h.repo.set_available(true);
        h.repo.save(&book(4)).unwrap();
        h.view.refresh().unwrap();
        h.view.flush().await.unwrap();

        assert!(!h.view.is_degraded());
        assert_eq!(*recovered.lock().unwrap(), 1);
        assert_eq!(h.view.current_view().count(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_degraded_view_recovers_on_next_notification() {
        let h = Harness::start(library(2)).await;

        h.repo.set_available(false);
        h.view.notify_data_changed().unwrap();
        sleep(Duration::from_millis(150)).await;
        h.view.flush().await.unwrap();
        assert!(h.view.is_degraded());

        // Provider is back but nobody said so; no retry loop runs
        h.repo.set_available(true);
        sleep(Duration::from_secs(10)).await;
        h.view.flush().await.unwrap();
        assert!(h.view.is_degraded());
        assert_eq!(h.view.stats().recomputations, 2);

        h.add(2);
        sleep(Duration::from_millis(150)).await;
        h.view.flush().await.unwrap();

        assert!(!h.view.is_degraded());
        assert_eq!(h.view.current_view().count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_degraded_from_first_load() {
        let mut provider = MockBookSnapshotProvider::new();
        provider
            .expect_snapshot()
            .times(1)
            .returning(|| Err(AppError::SnapshotUnavailable("offline".to_string())));

        let view = LibraryViewService::spawn(
            Arc::new(provider),
            Arc::new(EventBus::new()),
            &EngineConfig::default(),
            Criteria::default(),
        )
        .unwrap();
        view.flush().await.unwrap();

        assert!(view.is_degraded());
        let current = view.current_view();
        assert!(current.is_empty());
        assert_eq!(current.fingerprint, None);

        view.shutdown().await.unwrap();
    }

    // ========================================================================
    // CONFIGURATION
    // ========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_custom_windows_are_honoured() {
        let repo = Arc::new(InMemoryBookRepository::with_books(library(2)));
        let config = EngineConfig {
            data_quiescence_ms: 500,
            ..EngineConfig::default()
        };
        let view = LibraryViewService::spawn(
            repo.clone(),
            Arc::new(EventBus::new()),
            &config,
            Criteria::default(),
        )
        .unwrap();
        view.flush().await.unwrap();

        repo.save(&book(2)).unwrap();
        view.notify_data_changed().unwrap();
        sleep(Duration::from_millis(300)).await;
        view.flush().await.unwrap();
        assert_eq!(view.current_view().count(), 2);

        sleep(Duration::from_millis(300)).await;
        view.flush().await.unwrap();
        assert_eq!(view.current_view().count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            search_quiescence_ms: 0,
            ..EngineConfig::default()
        };
        let result = LibraryViewService::spawn(
            Arc::new(InMemoryBookRepository::new()),
            Arc::new(EventBus::new()),
            &config,
            Criteria::default(),
        );
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
