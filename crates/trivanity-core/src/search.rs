//! Multi-chain search orchestration

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, Receiver, SendTimeoutError, Sender, TrySendError};
use tracing::{debug, info, warn};

use trivanity_chains::ChainKind;

use crate::config::{SearchOptions, SearchPlan};
use crate::error::SearchError;
use crate::generator::{ChainGenerator, FoundResult};
use crate::stats::{AttemptCounter, ProgressSnapshot, SearchStats};

/// How long a blocked worker waits before rechecking cancellation
const DELIVERY_RETRY: Duration = Duration::from_millis(50);

/// Lifecycle of a [`SearchOrchestrator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Running,
    Stopped,
}

/// Something the caller should see
#[derive(Debug, Clone)]
pub enum SearchEvent {
    Found(FoundResult),
    Progress(ProgressSnapshot),
}

/// What `run` does after handing a match to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoundAction {
    KeepSearching,
    /// Stop searching this chain; the others continue
    RetireChain,
    /// End the whole session
    Stop,
}

/// Cooperative cancellation flag shared between the caller and the workers
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Threads and channels of one running session
struct Session {
    cancel: CancelToken,
    stats: Arc<SearchStats>,
    events: Receiver<SearchEvent>,
    /// Dropping this wakes the reporter
    shutdown: Option<Sender<()>>,
    workers: Vec<JoinHandle<()>>,
    reporter: Option<JoinHandle<()>>,
}

impl Session {
    fn join(&mut self) {
        self.shutdown.take();
        for handle in self.workers.drain(..) {
            let name = handle.thread().name().unwrap_or("worker").to_string();
            if handle.join().is_err() {
                warn!(thread = %name, "search worker panicked");
            }
        }
        if let Some(handle) = self.reporter.take() {
            if handle.join().is_err() {
                warn!("progress reporter panicked");
            }
        }
    }
}

/// Runs one generator per chain on its own thread and funnels their
/// matches and periodic progress into a single event stream.
///
/// ```no_run
/// use trivanity_core::{CancelToken, ChainKind, FoundAction, SearchOrchestrator, SearchPlan, VanityPattern};
///
/// let plan = SearchPlan::uniform([ChainKind::Ethereum], &VanityPattern::prefix("dead"));
/// let mut search = SearchOrchestrator::default();
/// let summary = search.run(
///     &plan,
///     CancelToken::new(),
///     |found| {
///         println!("{} {}", found.chain, found.display_address());
///         FoundAction::RetireChain
///     },
///     |progress| eprintln!("{:.0} keys/s", progress.speed),
/// )?;
/// println!("{} attempts", summary.attempts);
/// # Ok::<(), trivanity_core::SearchError>(())
/// ```
pub struct SearchOrchestrator {
    options: SearchOptions,
    state: SearchState,
    session: Option<Session>,
    last_stats: Option<Arc<SearchStats>>,
}

impl Default for SearchOrchestrator {
    fn default() -> Self {
        Self::new(SearchOptions::default())
    }
}

impl SearchOrchestrator {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            options,
            state: SearchState::Idle,
            session: None,
            last_stats: None,
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Counters of the current session, or of the last one once stopped
    pub fn stats(&self) -> Option<&SearchStats> {
        self.session
            .as_ref()
            .map(|s| s.stats.as_ref())
            .or(self.last_stats.as_deref())
    }

    /// Spawn the workers and the reporter.
    ///
    /// Every generator is built before any thread starts, so a bad plan
    /// leaves the orchestrator Idle with nothing running.
    pub fn start(&mut self, plan: &SearchPlan, cancel: CancelToken) -> Result<(), SearchError> {
        if self.state != SearchState::Idle {
            return Err(SearchError::InvalidState {
                expected: SearchState::Idle,
                actual: self.state,
            });
        }
        plan.validate()?;

        let generators = plan
            .chains()
            .iter()
            .map(|p| ChainGenerator::new(p.chain, p.pattern.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        let chains: Vec<ChainKind> = generators.iter().map(|g| g.chain()).collect();
        let stats = Arc::new(SearchStats::new(chains.iter().copied()));
        let (event_tx, event_rx) = bounded(self.options.event_capacity.max(1));
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);

        let mut session = Session {
            cancel: cancel.clone(),
            stats: Arc::clone(&stats),
            events: event_rx,
            shutdown: Some(shutdown_tx),
            workers: Vec::with_capacity(generators.len()),
            reporter: None,
        };

        for generator in generators {
            let chain = generator.chain();
            let stats = Arc::clone(&stats);
            let cancel = cancel.clone();
            let events = event_tx.clone();
            let batch = self.options.count_batch;

            let spawned = thread::Builder::new()
                .name(format!("trivanity-{}", chain.ticker().to_lowercase()))
                .spawn(move || worker_loop(generator, &stats, &cancel, &events, batch));

            match spawned {
                Ok(handle) => session.workers.push(handle),
                Err(err) => {
                    abort_session(&mut session, &chains);
                    return Err(SearchError::Spawn(err));
                }
            }
        }

        let interval = self.options.report_interval();
        let reporter_stats = Arc::clone(&stats);
        let reporter_cancel = cancel.clone();
        let spawned = thread::Builder::new()
            .name("trivanity-progress".to_string())
            .spawn(move || {
                reporter_loop(interval, &reporter_stats, &reporter_cancel, &event_tx, &shutdown_rx)
            });

        match spawned {
            Ok(handle) => session.reporter = Some(handle),
            Err(err) => {
                abort_session(&mut session, &chains);
                return Err(SearchError::Spawn(err));
            }
        }

        info!(
            chains = ?chains.iter().map(|c| c.ticker()).collect::<Vec<_>>(),
            "search started"
        );
        self.session = Some(session);
        self.last_stats = None;
        self.state = SearchState::Running;
        Ok(())
    }

    /// Cancel the session and wait for every thread.
    ///
    /// Events still queued are dropped. Does nothing unless Running.
    pub fn stop(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };

        session.cancel.cancel();
        session.join();

        let stats = &session.stats;
        info!(
            attempts = stats.total_attempts(),
            matches = stats.total_matches(),
            failed = stats.failed_derivations(),
            elapsed = ?stats.elapsed(),
            "search stopped"
        );
        self.last_stats = Some(Arc::clone(&session.stats));
        self.state = SearchState::Stopped;
    }

    /// Back to Idle so a new session may start
    pub fn reset(&mut self) -> Result<(), SearchError> {
        match self.state {
            SearchState::Running => Err(SearchError::InvalidState {
                expected: SearchState::Stopped,
                actual: SearchState::Running,
            }),
            SearchState::Idle | SearchState::Stopped => {
                self.last_stats = None;
                self.state = SearchState::Idle;
                Ok(())
            }
        }
    }

    /// Stop searching `chain` for the rest of the session.
    ///
    /// Returns false if the chain was not active.
    pub fn retire_chain(&self, chain: ChainKind) -> bool {
        let Some(session) = &self.session else {
            return false;
        };
        let retired = session.stats.retire(chain);
        if retired {
            info!(chain = %chain, "chain retired");
        }
        retired
    }

    /// Whether any chain is still being searched
    pub fn has_active_chains(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| !s.stats.active_chains().is_empty())
    }

    /// Wait up to `timeout` for the next event.
    ///
    /// `None` on timeout, and always `None` once the session is cancelled.
    pub fn next_event(&self, timeout: Duration) -> Option<SearchEvent> {
        let session = self.session.as_ref()?;
        if session.cancel.is_cancelled() {
            return None;
        }
        let event = session.events.recv_timeout(timeout).ok()?;
        if session.cancel.is_cancelled() {
            return None;
        }
        Some(event)
    }

    /// Start a session and drive it on the calling thread until it is
    /// cancelled, `on_found` asks to stop, or every chain is retired.
    ///
    /// Matches that arrive for a chain already retired are dropped. At most
    /// `event_capacity` events wait in the queue; a worker with a match and
    /// a full queue pauses until `run` catches up, while progress snapshots
    /// that find the queue full are skipped. Returns the final counters.
    pub fn run<F, P>(
        &mut self,
        plan: &SearchPlan,
        cancel: CancelToken,
        mut on_found: F,
        mut on_progress: P,
    ) -> Result<ProgressSnapshot, SearchError>
    where
        F: FnMut(FoundResult) -> FoundAction,
        P: FnMut(&ProgressSnapshot),
    {
        self.start(plan, cancel.clone())?;
        let poll = self.options.report_interval().min(Duration::from_millis(100));

        while !cancel.is_cancelled() && self.has_active_chains() {
            match self.next_event(poll) {
                Some(SearchEvent::Found(found)) => {
                    let chain = found.chain;
                    if !self.stats().is_some_and(|s| s.is_active(chain)) {
                        debug!(chain = %chain, "dropping match for retired chain");
                        continue;
                    }
                    match on_found(found) {
                        FoundAction::KeepSearching => {}
                        FoundAction::RetireChain => {
                            self.retire_chain(chain);
                        }
                        FoundAction::Stop => break,
                    }
                }
                Some(SearchEvent::Progress(snapshot)) => on_progress(&snapshot),
                None => {}
            }
        }

        self.stop();
        Ok(self
            .stats()
            .map(SearchStats::snapshot)
            .unwrap_or_else(|| SearchStats::new(std::iter::empty()).snapshot()))
    }
}

impl Drop for SearchOrchestrator {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Unwind a half-started session without touching the caller's token
fn abort_session(session: &mut Session, chains: &[ChainKind]) {
    for &chain in chains {
        session.stats.retire(chain);
    }
    session.join();
}

fn worker_loop(
    mut generator: ChainGenerator,
    stats: &SearchStats,
    cancel: &CancelToken,
    events: &Sender<SearchEvent>,
    batch: u64,
) {
    let chain = generator.chain();
    let mut counter = AttemptCounter::new(stats, chain, batch);

    while !cancel.is_cancelled() && stats.is_active(chain) {
        let outcome = generator.try_once();
        counter.record();

        match outcome {
            Ok(None) => {}
            Ok(Some(found)) => {
                stats.record_match();
                debug!(chain = %chain, address = %found.address, "match found");
                let abandon = || cancel.is_cancelled() || !stats.is_active(chain);
                if !deliver(events, SearchEvent::Found(found), abandon) {
                    break;
                }
            }
            Err(err) => {
                stats.record_failed_derivation();
                warn!(chain = %chain, error = %err, "key derivation failed, skipping");
            }
        }
    }
}

/// Queue `event`, waiting for room; false once `abandon` holds or the
/// receiver is gone
fn deliver(events: &Sender<SearchEvent>, mut event: SearchEvent, abandon: impl Fn() -> bool) -> bool {
    loop {
        match events.send_timeout(event, DELIVERY_RETRY) {
            Ok(()) => return true,
            Err(SendTimeoutError::Timeout(returned)) => {
                if abandon() {
                    return false;
                }
                event = returned;
            }
            Err(SendTimeoutError::Disconnected(_)) => return false,
        }
    }
}

fn reporter_loop(
    interval: Duration,
    stats: &SearchStats,
    cancel: &CancelToken,
    events: &Sender<SearchEvent>,
    shutdown: &Receiver<()>,
) {
    let ticker = tick(interval);
    loop {
        select! {
            recv(ticker) -> _ => {
                if cancel.is_cancelled() || stats.active_chains().is_empty() {
                    break;
                }
                match events.try_send(SearchEvent::Progress(stats.snapshot())) {
                    Ok(()) | Err(TrySendError::Full(_)) => {}
                    Err(TrySendError::Disconnected(_)) => break,
                }
            }
            recv(shutdown) -> _ => break,
        }
    }
}
