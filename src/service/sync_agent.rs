use crate::api::RemoteSource;
use crate::service::merge::MergeOutcome;
use crate::service::presenter::Presenter;
use crate::service::quotes_actor::QuotesHandle;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

pub const STATUS_SYNCING: &str = "Syncing with server...";
pub const STATUS_FAILED: &str = "Sync failed. Will retry on the next interval.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Idle,
    Syncing,
}

/// Result of one `sync` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SyncReport {
    Completed { fetched: usize, outcome: MergeOutcome },
    Failed { reason: String },
    /// Another sync was already in flight.
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncStatus {
    pub state: SyncState,
    pub last_report: Option<SyncReport>,
    pub last_finished_at: Option<DateTime<Utc>>,
}

struct Inner {
    state: SyncState,
    last_report: Option<SyncReport>,
    last_finished_at: Option<DateTime<Utc>>,
}

/// Fetches a bounded batch from the remote source and merges it into the
/// quote store. At most one sync is in flight at any time.
pub struct SyncAgent {
    quotes: QuotesHandle,
    remote: Arc<dyn RemoteSource>,
    presenter: Arc<dyn Presenter>,
    batch_size: usize,
    inner: Mutex<Inner>,
}

/// Returns the agent to Idle when a sync attempt ends, however it ends.
struct SyncingGuard<'a> {
    agent: &'a SyncAgent,
}

impl Drop for SyncingGuard<'_> {
    fn drop(&mut self) {
        self.agent.with_inner(|inner| inner.state = SyncState::Idle);
    }
}

impl SyncAgent {
    pub fn new(
        quotes: QuotesHandle,
        remote: Arc<dyn RemoteSource>,
        presenter: Arc<dyn Presenter>,
        batch_size: usize,
    ) -> Self {
        Self {
            quotes,
            remote,
            presenter,
            batch_size: batch_size.max(1),
            inner: Mutex::new(Inner {
                state: SyncState::Idle,
                last_report: None,
                last_finished_at: None,
            }),
        }
    }

    fn with_inner<T>(&self, f: impl FnOnce(&mut Inner) -> T) -> T {
        match self.inner.lock() {
            Ok(mut inner) => f(&mut inner),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }

    pub fn state(&self) -> SyncState {
        self.with_inner(|inner| inner.state)
    }

    pub fn status(&self) -> SyncStatus {
        self.with_inner(|inner| SyncStatus {
            state: inner.state,
            last_report: inner.last_report.clone(),
            last_finished_at: inner.last_finished_at,
        })
    }

    fn try_begin(&self) -> Option<SyncingGuard<'_>> {
        self.with_inner(|inner| match inner.state {
            SyncState::Syncing => None,
            SyncState::Idle => {
                inner.state = SyncState::Syncing;
                Some(())
            }
        })
        .map(|()| SyncingGuard { agent: self })
    }

    /// One Idle → Syncing → Idle cycle. Transport failures end the cycle with
    /// a failed status; nothing is retried here.
    pub async fn sync(&self) -> SyncReport {
        let Some(_guard) = self.try_begin() else {
            debug!("sync already in flight; skipping");
            return SyncReport::Skipped;
        };

        self.presenter.set_status(STATUS_SYNCING);
        let report = self.run_once().await;

        match &report {
            SyncReport::Completed { fetched, outcome } => {
                info!(fetched, added = outcome.added, "sync completed");
                self.presenter.set_status(&completed_status(outcome));
            }
            SyncReport::Failed { reason } => {
                warn!(reason = %reason, "sync failed");
                self.presenter.set_status(STATUS_FAILED);
            }
            SyncReport::Skipped => {}
        }

        self.with_inner(|inner| {
            inner.last_report = Some(report.clone());
            inner.last_finished_at = Some(Utc::now());
        });
        report
    }

    async fn run_once(&self) -> SyncReport {
        let batch = match self.remote.fetch_batch(self.batch_size).await {
            Ok(batch) => batch,
            Err(e) => {
                return SyncReport::Failed {
                    reason: e.to_string(),
                };
            }
        };
        let fetched = batch.len();
        match self.quotes.apply_remote(batch).await {
            Ok(outcome) => SyncReport::Completed { fetched, outcome },
            Err(e) => SyncReport::Failed {
                reason: e.to_string(),
            },
        }
    }

    /// Sync every `period`, first tick one period from now. Each tick runs as its
    /// own task so a slow sync makes the next tick observe `Syncing` and skip.
    pub fn spawn_periodic(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(period_secs = period.as_secs(), "periodic sync started");
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let agent = self.clone();
                tokio::spawn(async move {
                    agent.sync().await;
                });
            }
        })
    }
}

fn completed_status(outcome: &MergeOutcome) -> String {
    if outcome.changed() {
        format!("Quotes synced with server. {} new.", outcome.added)
    } else {
        "Quotes synced with server. Already up to date.".to_string()
    }
}
