//! Dashboard polling loop.
//!
//! The poller runs as a spawned task owned by [`DashboardPoller`]. It fetches
//! immediately, then on every auto-refresh tick, every filter change and every
//! manual refresh. Fetches run concurrently; each carries a sequence number and
//! the filter generation it was issued under, and a response is only applied
//! when it belongs to the current generation and is newer than the last one
//! applied. Dropping the handle aborts the task and every in-flight fetch.

use std::sync::Arc;
use std::time::Duration;

use bazaar_core::dashboard::{DashboardStats, DateRange};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::{ClientError, StatsFetcher};
use crate::session::{Session, SessionError, require_admin};

/// Error shown to the user for any failed fetch.
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load dashboard data. Please try again.";

/// Default auto-refresh period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Shortest auto-refresh period; shorter configured periods are raised to it.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Snapshot published to observers after every change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    /// Last applied stats.
    pub stats: DashboardStats,
    /// A fetch is outstanding.
    pub loading: bool,
    /// User-visible error from the last failed fetch.
    pub error: Option<String>,
    /// When stats were last applied.
    pub last_updated: Option<DateTime<Utc>>,
    /// Active date filter.
    pub range: DateRange,
    /// Whether periodic refresh is on.
    pub auto_refresh: bool,
}

/// Startup options.
#[derive(Debug, Clone)]
pub struct PollerOptions {
    /// Auto-refresh period.
    pub interval: Duration,
    /// Start with auto-refresh enabled.
    pub auto_refresh: bool,
    /// Initial date filter.
    pub range: DateRange,
}

impl Default for PollerOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            auto_refresh: true,
            range: DateRange::default(),
        }
    }
}

#[derive(Debug)]
enum Command {
    SetRange(DateRange),
    ClearFilters,
    SetAutoRefresh(bool),
    Refresh,
}

/// Handle to a running dashboard poller.
#[derive(Debug)]
pub struct DashboardPoller {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<DashboardState>,
    task: JoinHandle<()>,
}

impl DashboardPoller {
    /// Starts polling for an admin session.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::RedirectToLogin` without fetching anything when
    /// the session is missing or not an admin.
    pub fn start(
        session: Option<&Session>,
        fetcher: Arc<dyn StatsFetcher>,
        options: PollerOptions,
    ) -> Result<Self, SessionError> {
        require_admin(session)?;

        let period = if options.interval < MIN_POLL_INTERVAL {
            warn!(
                interval_ms = options.interval.as_millis(),
                "Poll interval too short, using {}s",
                MIN_POLL_INTERVAL.as_secs()
            );
            MIN_POLL_INTERVAL
        } else {
            options.interval
        };

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(DashboardState {
            range: options.range,
            auto_refresh: options.auto_refresh,
            ..DashboardState::default()
        });

        let task = PollTask {
            fetcher,
            state: state_tx,
            period,
            ticker: None,
            range: options.range,
            generation: 0,
            next_seq: 0,
            last_applied: 0,
            in_flight: JoinSet::new(),
        };
        let task = tokio::spawn(task.run(command_rx, options.auto_refresh));
        info!(interval_secs = period.as_secs(), "Dashboard poller started");

        Ok(Self {
            commands: command_tx,
            state: state_rx,
            task,
        })
    }

    /// Replaces the date filter and fetches.
    pub fn set_range(&self, range: DateRange) {
        self.send(Command::SetRange(range));
    }

    /// Resets the date filter and fetches.
    pub fn clear_filters(&self) {
        self.send(Command::ClearFilters);
    }

    /// Turns periodic refresh on or off.
    ///
    /// Turning it on restarts the timer and fetches immediately.
    pub fn set_auto_refresh(&self, enabled: bool) {
        self.send(Command::SetAutoRefresh(enabled));
    }

    /// Clears the error and fetches.
    pub fn refresh(&self) {
        self.send(Command::Refresh);
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.clone()
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            warn!("Dashboard poller task is gone, command dropped");
        }
    }
}

impl Drop for DashboardPoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

type FetchOutcome = (u64, u64, Result<DashboardStats, ClientError>);

struct PollTask {
    fetcher: Arc<dyn StatsFetcher>,
    state: watch::Sender<DashboardState>,
    period: Duration,
    ticker: Option<Interval>,
    range: DateRange,
    generation: u64,
    next_seq: u64,
    last_applied: u64,
    in_flight: JoinSet<FetchOutcome>,
}

impl PollTask {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>, auto_refresh: bool) {
        if auto_refresh {
            self.start_ticker();
        }
        self.dispatch();

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    match joined {
                        Ok(outcome) => self.apply(outcome),
                        Err(e) => {
                            warn!(error = %e, "Dashboard fetch task failed");
                            self.sync_loading();
                        }
                    }
                }
                () = next_tick(&mut self.ticker) => self.dispatch(),
            }
        }

        self.in_flight.abort_all();
        debug!("Dashboard poller stopped");
    }

    fn handle(&mut self, command: Command) {
        debug!(?command, "Dashboard command");
        match command {
            Command::SetRange(range) => self.change_range(range),
            Command::ClearFilters => self.change_range(DateRange::default()),
            Command::SetAutoRefresh(enabled) => {
                let was_enabled = self.ticker.is_some();
                self.state.send_modify(|s| s.auto_refresh = enabled);
                if enabled && !was_enabled {
                    self.start_ticker();
                    self.dispatch();
                } else if !enabled {
                    self.ticker = None;
                }
            }
            Command::Refresh => {
                self.state.send_modify(|s| s.error = None);
                self.dispatch();
            }
        }
    }

    fn change_range(&mut self, range: DateRange) {
        self.range = range;
        self.generation += 1;
        self.state.send_modify(|s| s.range = range);
        self.dispatch();
    }

    /// First tick fires one full period from now; the immediate fetch is
    /// dispatched separately.
    fn start_ticker(&mut self) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);
    }

    fn dispatch(&mut self) {
        self.next_seq += 1;
        let seq = self.next_seq;
        let generation = self.generation;
        let range = self.range;
        let fetcher = Arc::clone(&self.fetcher);

        debug!(seq, generation, ?range, "Fetching dashboard stats");
        self.in_flight.spawn(async move {
            let result = fetcher.fetch_stats(&range).await;
            (seq, generation, result)
        });
        self.state.send_modify(|s| s.loading = true);
    }

    fn apply(&mut self, (seq, generation, result): FetchOutcome) {
        if generation != self.generation || seq <= self.last_applied {
            debug!(
                seq,
                generation,
                current_generation = self.generation,
                last_applied = self.last_applied,
                "Discarding stale dashboard response"
            );
            self.sync_loading();
            return;
        }
        self.last_applied = seq;

        let loading = !self.in_flight.is_empty();
        match result {
            Ok(stats) => self.state.send_modify(|s| {
                s.stats = stats;
                s.error = None;
                s.last_updated = Some(Utc::now());
                s.loading = loading;
            }),
            Err(e) => {
                warn!(error = %e, seq, "Failed to load dashboard data");
                self.state.send_modify(|s| {
                    s.error = Some(LOAD_ERROR_MESSAGE.to_string());
                    s.loading = loading;
                });
            }
        }
    }

    fn sync_loading(&self) {
        let loading = !self.in_flight.is_empty();
        self.state.send_if_modified(|s| {
            let changed = s.loading != loading;
            s.loading = loading;
            changed
        });
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod poller_tests;
