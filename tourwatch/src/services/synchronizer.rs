//! Synchronization orchestrator
//!
//! # State Progression
//! IDLE → FETCHING → FILTERING → CLASSIFYING → PERSISTING → COMPLETED
//!
//! A failure at any stage ends the pass in FAILED with nothing committed: the
//! persisted log is only rewritten after every candidate is classified.
//! Only the fetch suspends; the remaining stages run to completion without
//! yielding. One pass at a time per synchronizer.

use crate::error::{SyncError, SyncResult};
use crate::models::{PassState, RefreshMode, SyncReport};
use crate::services::event_filter::EventFilter;
use crate::services::event_log::EventLogStore;
use crate::services::event_source::EventSource;
use crate::services::novelty;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tourwatch_common::time;
use tracing::{debug, info, warn};

/// Runs fetch → filter → classify → persist passes
pub struct Synchronizer {
    source: Box<dyn EventSource>,
    filter: EventFilter,
    store: EventLogStore,
    request_timeout: Duration,
    pass_lock: Mutex<()>,
}

/// Per-pass bookkeeping; never outlives `run_pass`
struct Pass {
    mode: RefreshMode,
    state: PassState,
    started: Instant,
}

impl Pass {
    fn new(mode: RefreshMode) -> Self {
        Self {
            mode,
            state: PassState::Idle,
            started: Instant::now(),
        }
    }

    fn transition_to(&mut self, next: PassState) {
        debug_assert!(
            !self.state.is_terminal(),
            "pass already ended in {}",
            self.state
        );
        debug!(mode = %self.mode, from = %self.state, to = %next, "Pass state transition");
        self.state = next;
    }
}

impl Synchronizer {
    pub fn new(
        source: Box<dyn EventSource>,
        filter: EventFilter,
        store: EventLogStore,
        request_timeout: Duration,
    ) -> Self {
        Self {
            source,
            filter,
            store,
            request_timeout,
            pass_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &EventLogStore {
        &self.store
    }

    /// Run one complete pass
    ///
    /// Fails fast with [`SyncError::PassInFlight`] when another pass is
    /// running on this synchronizer. Cancelling `cancel_token` aborts the
    /// fetch and prevents the log from being rewritten.
    pub async fn run_pass(
        &self,
        mode: RefreshMode,
        cancel_token: &CancellationToken,
    ) -> SyncResult<SyncReport> {
        let _guard = self.pass_lock.try_lock().map_err(|_| {
            warn!(%mode, "Refresh requested while a pass is in flight");
            SyncError::PassInFlight
        })?;

        let mut pass = Pass::new(mode);
        info!(%mode, "Starting synchronization pass");

        match self.execute(&mut pass, cancel_token).await {
            Ok(report) => {
                pass.transition_to(PassState::Completed);
                info!(
                    %mode,
                    total = report.total_events,
                    highlighted = report.highlighted_events,
                    new = report.new_events,
                    elapsed_ms = pass.started.elapsed().as_millis() as u64,
                    "Synchronization pass completed"
                );
                Ok(report)
            }
            Err(e) => {
                let failed_in = pass.state;
                pass.transition_to(PassState::Failed);
                warn!(
                    %mode,
                    stage = %failed_in,
                    category = e.category(),
                    "Synchronization pass failed: {}",
                    e
                );
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        pass: &mut Pass,
        cancel_token: &CancellationToken,
    ) -> SyncResult<SyncReport> {
        // Phase 1: FETCHING
        pass.transition_to(PassState::Fetching);
        let body = self.fetch(cancel_token).await?;

        // Phase 2: FILTERING
        pass.transition_to(PassState::Filtering);
        let outcome = self.filter.apply_body(&body)?;
        let mut events = outcome.candidates;

        // Phase 3: CLASSIFYING
        pass.transition_to(PassState::Classifying);
        let saved = self.store.load()?;
        let new_events = novelty::classify(&mut events, &saved, pass.mode);

        // Phase 4: PERSISTING
        if cancel_token.is_cancelled() {
            return Err(SyncError::Cancelled);
        }
        pass.transition_to(PassState::Persisting);
        self.store.save(&events)?;

        Ok(SyncReport {
            total_events: events.len(),
            highlighted_events: outcome.highlighted_count,
            new_events,
            mode: pass.mode,
            completed_at: time::now(),
            events,
        })
    }

    async fn fetch(&self, cancel_token: &CancellationToken) -> SyncResult<String> {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => Err(SyncError::Cancelled),
            result = tokio::time::timeout(self.request_timeout, self.source.fetch_events()) => {
                result.map_err(|_| SyncError::Timeout(self.request_timeout))?
            }
        }
    }
}
