//! Concurrent fan-out of one target to every registered source.
//!
//! A scan runs in up to two waves. Every [`Phase::Independent`] source starts
//! at once; when all of them are done, the [`Phase::Dependent`] sources start
//! with the partial report of the first wave. Each source is bounded by its own
//! timeout and, optionally, by an overall deadline shared by both waves.
//!
//! The resulting [`ScanReport`] holds exactly one [`Outcome`] per registered
//! source, in registration order, whatever the completion order was.

use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::FutureExt;
use scout_common::error::TargetError;
use scout_common::target::Target;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::outcome::{FailureKind, Outcome};
use crate::report::ScanReport;
use crate::source::{Phase, ScanContext, SourceAdapter};

/// Called from the join point each time a source settles.
pub type ProgressCallback = Arc<dyn Fn(&str, &Outcome) + Send + Sync>;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("no sources registered")]
    NoSources,

    #[error("source '{0}' registered more than once")]
    DuplicateSource(String),

    #[error(transparent)]
    Target(#[from] TargetError),
}

struct Registration {
    adapter: Arc<dyn SourceAdapter>,
    timeout: Duration,
}

#[derive(Default)]
pub struct OrchestratorBuilder {
    sources: Vec<Registration>,
    deadline: Option<Duration>,
    on_progress: Option<ProgressCallback>,
}

impl OrchestratorBuilder {
    /// Registers a source with its own default timeout.
    pub fn register<A: SourceAdapter + 'static>(self, adapter: A) -> Self {
        self.register_shared(Arc::new(adapter))
    }

    pub fn register_shared(self, adapter: Arc<dyn SourceAdapter>) -> Self {
        let timeout = adapter.default_timeout();
        self.register_shared_with_timeout(adapter, timeout)
    }

    pub fn register_with_timeout<A: SourceAdapter + 'static>(
        self,
        adapter: A,
        timeout: Duration,
    ) -> Self {
        self.register_shared_with_timeout(Arc::new(adapter), timeout)
    }

    pub fn register_shared_with_timeout(
        mut self,
        adapter: Arc<dyn SourceAdapter>,
        timeout: Duration,
    ) -> Self {
        self.sources.push(Registration { adapter, timeout });
        self
    }

    /// Caps the whole scan. Sources still running when it expires are
    /// cancelled and recorded as [`FailureKind::Timeout`].
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, &Outcome) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    /// Fails on an empty source set or on a name registered twice.
    pub fn build(self) -> Result<ScanOrchestrator, OrchestratorError> {
        if self.sources.is_empty() {
            return Err(OrchestratorError::NoSources);
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for registration in &self.sources {
            let name = registration.adapter.name();
            if !seen.insert(name) {
                return Err(OrchestratorError::DuplicateSource(name.to_string()));
            }
        }

        Ok(ScanOrchestrator {
            sources: self.sources,
            deadline: self.deadline,
            on_progress: self.on_progress,
        })
    }
}

pub struct ScanOrchestrator {
    sources: Vec<Registration>,
    deadline: Option<Duration>,
    on_progress: Option<ProgressCallback>,
}

impl ScanOrchestrator {
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::default()
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|r| r.adapter.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Parses `raw` and scans it. Only an unusable target is an error.
    pub async fn scan_raw(&self, raw: &str) -> Result<ScanReport, OrchestratorError> {
        let target: Target = raw.parse()?;
        Ok(self.scan(&target).await)
    }

    /// Queries every source and returns one outcome per source.
    pub async fn scan(&self, target: &Target) -> ScanReport {
        let started_at = Utc::now();
        let clock = Instant::now();
        let deadline = self.deadline.map(|budget| clock + budget);
        let target = Arc::new(target.clone());

        let mut slots: Vec<Option<Outcome>> = vec![None; self.sources.len()];
        let (independent, dependent): (Vec<usize>, Vec<usize>) = (0..self.sources.len())
            .partition(|&idx| self.sources[idx].adapter.phase() == Phase::Independent);

        self.fan_out(&independent, &target, None, deadline, &mut slots)
            .await;

        if !dependent.is_empty() {
            let prior = Arc::new(self.partial_report(&target, &slots));
            self.fan_out(&dependent, &target, Some(prior), deadline, &mut slots)
                .await;
        }

        let entries: Vec<(String, Outcome)> = self
            .sources
            .iter()
            .zip(slots)
            .map(|(registration, slot)| {
                let outcome = slot.unwrap_or_else(|| {
                    Outcome::failure(FailureKind::Timeout, "source never completed")
                });
                (registration.adapter.name().to_string(), outcome)
            })
            .collect();

        ScanReport::new(target.url(), entries).timed(started_at, clock.elapsed())
    }

    async fn fan_out(
        &self,
        indices: &[usize],
        target: &Arc<Target>,
        prior: Option<Arc<ScanReport>>,
        deadline: Option<Instant>,
        slots: &mut [Option<Outcome>],
    ) {
        if deadline.is_some_and(|at| at <= Instant::now()) {
            debug!("scan deadline already expired, skipping {} source(s)", indices.len());
            for &idx in indices {
                let outcome = Outcome::failure(
                    FailureKind::Timeout,
                    "scan deadline expired before the source was started",
                );
                self.settle(idx, outcome, slots);
            }
            return;
        }

        let mut set: JoinSet<(usize, Outcome)> = JoinSet::new();

        for &idx in indices {
            let registration = &self.sources[idx];
            let adapter = Arc::clone(&registration.adapter);
            let ctx = ScanContext {
                target: Arc::clone(target),
                timeout: registration.timeout,
                prior: prior.clone(),
            };
            debug!(source = adapter.name(), "dispatching");
            set.spawn(async move { (idx, run_guarded(adapter, ctx).await) });
        }

        let mut expired = false;
        let mut abnormal: Vec<String> = Vec::new();
        loop {
            let next = match deadline {
                Some(at) => match tokio::time::timeout_at(at, set.join_next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        warn!("scan deadline expired, cancelling {} source(s)", set.len());
                        set.abort_all();
                        expired = true;
                        break;
                    }
                },
                None => set.join_next().await,
            };

            match next {
                Some(Ok((idx, outcome))) => {
                    self.settle(idx, outcome, slots);
                }
                Some(Err(e)) => {
                    warn!("source task ended abnormally: {e}");
                    abnormal.push(e.to_string());
                }
                None => break,
            }
        }

        for &idx in indices {
            if slots[idx].is_none() {
                self.settle(idx, unfinished(expired, &abnormal), slots);
            }
        }
    }

    fn settle(&self, idx: usize, outcome: Outcome, slots: &mut [Option<Outcome>]) {
        let name = self.sources[idx].adapter.name();
        match &outcome {
            Outcome::Success { .. } => debug!(source = name, "finished"),
            Outcome::Failure { kind, message } => {
                debug!(source = name, "failed ({kind}): {message}")
            }
        }
        if let Some(callback) = &self.on_progress {
            callback(name, &outcome);
        }
        slots[idx] = Some(outcome);
    }

    fn partial_report(&self, target: &Target, slots: &[Option<Outcome>]) -> ScanReport {
        let entries = self
            .sources
            .iter()
            .zip(slots)
            .filter_map(|(registration, slot)| {
                slot.as_ref()
                    .map(|outcome| (registration.adapter.name().to_string(), outcome.clone()))
            })
            .collect();
        ScanReport::new(target.url(), entries)
    }
}

/// Outcome for a source whose task produced nothing.
fn unfinished(expired: bool, abnormal: &[String]) -> Outcome {
    if expired {
        Outcome::failure(
            FailureKind::Timeout,
            "scan deadline expired before the source finished",
        )
    } else if abnormal.is_empty() {
        Outcome::failure(FailureKind::Panicked, "source task ended without a result")
    } else {
        Outcome::failure(
            FailureKind::Panicked,
            format!("source task ended without a result: {}", abnormal.join("; ")),
        )
    }
}

/// Runs one source under its own timeout, turning panics into failures.
async fn run_guarded(adapter: Arc<dyn SourceAdapter>, ctx: ScanContext) -> Outcome {
    let budget = ctx.timeout;
    let invocation = AssertUnwindSafe(adapter.invoke(&ctx)).catch_unwind();

    match tokio::time::timeout(budget, invocation).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(panic)) => Outcome::failure(FailureKind::Panicked, panic_message(panic.as_ref())),
        Err(_) => Outcome::failure(
            FailureKind::Timeout,
            format!("no result within {:.1}s", budget.as_secs_f64()),
        ),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "source panicked".to_string()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
