// src/services/library_view_service.rs
//
// Library View Service - the materialized view state and its driver.
//
// One tokio task owns the criteria, cache, coalescer and published view.
// Every caller talks to it through a cloneable LibraryViewHandle, so all
// recomputation is serialized onto that single task.
//
// CRITICAL RULES:
// - Single writer: only the engine task mutates cache / coalescer / view
// - A settled timer re-checks queued notifications before it fires
// - Recomputation always reads the latest criteria and a fresh snapshot
// - Readers swap in a whole Arc<MaterializedView>; never a partial list
// - Snapshot failure keeps the last view and raises the degraded flag

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use log::{debug, info, warn};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::domain::criteria::{validate_criteria, Criteria};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, ViewDegraded, ViewRecovered, ViewUpdated};
use crate::repositories::BookSnapshotProvider;
use crate::services::change_coalescer::{ChangeCoalescer, ChangeSource, SettledChanges};
use crate::services::engine_config::EngineConfig;
use crate::services::materialization_cache::MaterializationCache;
use crate::services::materialization_engine::materialize;
use crate::services::materialization_types::{Fingerprint, MaterializedView, Transition};
use crate::services::transition_policy::TransitionPolicy;

// ============================================================================
// COMMANDS
// ============================================================================

pub(crate) enum ViewCommand {
    DataChanged,
    CriteriaChanged(Criteria),
    Refresh,
    Flush(oneshot::Sender<()>),
    Shutdown,
}

enum Flow {
    Continue,
    Stop,
}

enum Wake {
    Command(Option<ViewCommand>),
    Timer,
}

/// Why a recomputation ran
#[derive(Debug, Clone, Copy)]
enum Trigger {
    Initial,
    Immediate,
    Settled(SettledChanges),
    Refresh,
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trigger::Initial => write!(f, "initial"),
            Trigger::Immediate => write!(f, "immediate"),
            Trigger::Settled(s) => write!(
                f,
                "settled(data={}, search={}, absorbed={})",
                s.data, s.search, s.absorbed
            ),
            Trigger::Refresh => write!(f, "refresh"),
        }
    }
}

// ============================================================================
// SHARED STATE
// ============================================================================

/// Engine counters, for diagnostics and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewStats {
    /// Recomputations attempted (including failed snapshots)
    pub recomputations: u64,
    /// Views actually published
    pub publications: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}

struct SharedViewState {
    view: RwLock<Arc<MaterializedView>>,
    criteria: RwLock<Criteria>,
    degraded: AtomicBool,
    recomputations: AtomicU64,
    publications: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
}

impl SharedViewState {
    fn new(criteria: Criteria) -> Self {
        Self {
            view: RwLock::new(Arc::new(MaterializedView::empty())),
            criteria: RwLock::new(criteria),
            degraded: AtomicBool::new(false),
            recomputations: AtomicU64::new(0),
            publications: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
        }
    }

    fn current_view(&self) -> Arc<MaterializedView> {
        Arc::clone(&self.view.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn publish(&self, view: MaterializedView) {
        *self.view.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(view);
        self.publications.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// HANDLE
// ============================================================================

/// Front door to the running view engine.
/// Cheap to clone; every clone talks to the same engine task.
#[derive(Clone)]
pub struct LibraryViewHandle {
    commands: mpsc::UnboundedSender<ViewCommand>,
    shared: Arc<SharedViewState>,
    event_bus: Arc<EventBus>,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl LibraryViewHandle {
    /// The currently published view
    pub fn current_view(&self) -> Arc<MaterializedView> {
        self.shared.current_view()
    }

    /// True while the collection snapshot is unavailable
    pub fn is_degraded(&self) -> bool {
        self.shared.degraded.load(Ordering::SeqCst)
    }

    /// Latest accepted criteria (may not be materialized yet)
    pub fn criteria(&self) -> Criteria {
        self.shared
            .criteria
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn stats(&self) -> ViewStats {
        ViewStats {
            recomputations: self.shared.recomputations.load(Ordering::SeqCst),
            publications: self.shared.publications.load(Ordering::SeqCst),
            cache_hits: self.shared.cache_hits.load(Ordering::SeqCst),
            cache_misses: self.shared.cache_misses.load(Ordering::SeqCst),
        }
    }

    /// Replace the view criteria.
    ///
    /// Malformed criteria are rejected here and never reach the engine.
    /// A change confined to `search_text` is debounced with the search
    /// window; any other change recomputes immediately.
    pub fn update_criteria(&self, criteria: Criteria) -> AppResult<()> {
        validate_criteria(&criteria).map_err(|e| AppError::Validation(e.to_string()))?;

        // Held across the send so readers see criteria in engine order
        let mut current = self
            .shared
            .criteria
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        self.send(ViewCommand::CriteriaChanged(criteria.clone()))?;
        *current = criteria;
        Ok(())
    }

    /// Signal that the collection changed (debounced with the data window)
    pub fn notify_data_changed(&self) -> AppResult<()> {
        self.send(ViewCommand::DataChanged)
    }

    /// Recompute now, dropping any pending windows
    pub fn refresh(&self) -> AppResult<()> {
        self.send(ViewCommand::Refresh)
    }

    /// Resolves once every command sent before it has been processed
    pub async fn flush(&self) -> AppResult<()> {
        let (ack, done) = oneshot::channel();
        self.send(ViewCommand::Flush(ack))?;
        done.await.map_err(|_| AppError::EngineStopped)
    }

    /// Subscribe the rendering collaborator to view publications
    pub fn subscribe<F>(&self, handler: F)
    where
        F: Fn(&ViewUpdated) + Send + Sync + 'static,
    {
        self.event_bus.subscribe::<ViewUpdated, _>(handler);
    }

    /// Stop the engine task and wait for it to exit
    pub async fn shutdown(&self) -> AppResult<()> {
        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(task) = task else {
            return Ok(());
        };

        // The engine may already be gone; the join below covers both cases
        let _ = self.commands.send(ViewCommand::Shutdown);
        task.await
            .map_err(|e| AppError::Other(format!("View engine task failed: {}", e)))
    }

    fn send(&self, command: ViewCommand) -> AppResult<()> {
        self.commands.send(command)?;
        Ok(())
    }
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct LibraryViewService {
    provider: Arc<dyn BookSnapshotProvider>,
    event_bus: Arc<EventBus>,
    shared: Arc<SharedViewState>,
    criteria: Criteria,
    cache: MaterializationCache,
    coalescer: ChangeCoalescer,
    policy: TransitionPolicy,
}

impl LibraryViewService {
    /// Start the engine on the current tokio runtime.
    /// The first view is materialized immediately.
    pub fn spawn(
        provider: Arc<dyn BookSnapshotProvider>,
        event_bus: Arc<EventBus>,
        config: &EngineConfig,
        initial_criteria: Criteria,
    ) -> AppResult<LibraryViewHandle> {
        config.validate()?;
        validate_criteria(&initial_criteria).map_err(|e| AppError::Validation(e.to_string()))?;

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| AppError::Other(format!("No tokio runtime for view engine: {}", e)))?;

        let shared = Arc::new(SharedViewState::new(initial_criteria.clone()));
        let (commands, receiver) = mpsc::unbounded_channel();

        let service = Self {
            provider,
            event_bus: Arc::clone(&event_bus),
            shared: Arc::clone(&shared),
            criteria: initial_criteria,
            cache: MaterializationCache::new(),
            coalescer: ChangeCoalescer::new(config.data_window(), config.search_window()),
            policy: TransitionPolicy::new(config.max_animated_growth),
        };

        let task = runtime.spawn(service.run(receiver));

        Ok(LibraryViewHandle {
            commands,
            shared,
            event_bus,
            task: Arc::new(Mutex::new(Some(task))),
        })
    }

    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<ViewCommand>) {
        info!("[VIEW] Engine started");
        self.recompute(Trigger::Initial);

        loop {
            let deadline = self.coalescer.next_deadline();

            let wake = tokio::select! {
                biased;
                command = commands.recv() => Wake::Command(command),
                _ = wait_until(deadline) => Wake::Timer,
            };

            match wake {
                Wake::Command(None) => break,
                Wake::Command(Some(command)) => {
                    if let Flow::Stop = self.apply(command) {
                        break;
                    }
                }
                Wake::Timer => {
                    // Newer notifications re-arm their windows before we fire
                    if let Flow::Stop = self.drain_pending(&mut commands) {
                        break;
                    }
                    match self.coalescer.take_settled(Instant::now()) {
                        Some(settled) => self.recompute(Trigger::Settled(settled)),
                        None => debug!("[VIEW] Timer superseded by newer notifications"),
                    }
                }
            }
        }

        info!("[VIEW] Engine stopped");
    }

    fn drain_pending(&mut self, commands: &mut mpsc::UnboundedReceiver<ViewCommand>) -> Flow {
        while let Ok(command) = commands.try_recv() {
            if let Flow::Stop = self.apply(command) {
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    fn apply(&mut self, command: ViewCommand) -> Flow {
        match command {
            ViewCommand::DataChanged => {
                debug!("[VIEW] Data change notification");
                self.coalescer.notify(ChangeSource::Data, Instant::now());
            }
            ViewCommand::CriteriaChanged(criteria) => self.apply_criteria(criteria),
            ViewCommand::Refresh => {
                self.coalescer.cancel_all();
                self.recompute(Trigger::Refresh);
            }
            ViewCommand::Flush(ack) => {
                let _ = ack.send(());
            }
            ViewCommand::Shutdown => return Flow::Stop,
        }
        Flow::Continue
    }

    fn apply_criteria(&mut self, criteria: Criteria) {
        if criteria == self.criteria {
            debug!("[VIEW] Criteria unchanged, ignoring");
            return;
        }

        let search_only = self.criteria.differs_only_in_search(&criteria);
        self.criteria = criteria;

        if search_only {
            debug!("[VIEW] Search text changed, debouncing");
            self.coalescer.notify(ChangeSource::Search, Instant::now());
        } else {
            let superseded = self.coalescer.cancel_all();
            if superseded > 0 {
                debug!("[VIEW] Immediate recompute supersedes {} pending notifications", superseded);
            }
            self.recompute(Trigger::Immediate);
        }
    }

    fn recompute(&mut self, trigger: Trigger) {
        self.shared.recomputations.fetch_add(1, Ordering::SeqCst);

        let snapshot = match self.provider.snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                // No retry here; recovery waits for the next notification
                self.mark_degraded(&err);
                return;
            }
        };
        self.clear_degraded();

        let fingerprint = Fingerprint::from_criteria(&self.criteria, snapshot.version);
        let criteria = &self.criteria;
        let books = self
            .cache
            .get_or_compute(fingerprint, || materialize(&snapshot.records, criteria));
        self.shared.cache_hits.store(self.cache.hits(), Ordering::SeqCst);
        self.shared.cache_misses.store(self.cache.misses(), Ordering::SeqCst);

        let current = self.shared.current_view();
        let transition = match current.fingerprint {
            None => Some(Transition::Immediate),
            Some(_) => self.policy.evaluate(current.books(), &books),
        };

        let Some(transition) = transition else {
            debug!(
                "[VIEW] {} recompute: fingerprint={} unchanged ({} books)",
                trigger,
                fingerprint,
                books.len()
            );
            return;
        };

        let view = MaterializedView::new(
            books,
            fingerprint,
            snapshot.version,
            current.revision + 1,
            transition,
        );
        let (revision, count) = (view.revision, view.count());
        self.shared.publish(view);

        info!(
            "[VIEW] {} recompute: fingerprint={} version={} count={} transition={}",
            trigger, fingerprint, snapshot.version, count, transition
        );
        self.event_bus
            .emit(ViewUpdated::new(revision, fingerprint, count, transition));
    }

    fn mark_degraded(&self, err: &AppError) {
        if !self.shared.degraded.swap(true, Ordering::SeqCst) {
            warn!("[VIEW] Snapshot unavailable, serving last view: {}", err);
            self.event_bus.emit(ViewDegraded::new(err.to_string()));
        } else {
            debug!("[VIEW] Snapshot still unavailable: {}", err);
        }
    }

    fn clear_degraded(&self) {
        if self.shared.degraded.swap(false, Ordering::SeqCst) {
            info!("[VIEW] Snapshot available again");
            self.event_bus.emit(ViewRecovered::new());
        }
    }
}

/// Sleep until `deadline`, or forever when nothing is armed
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
