//! The contract every intelligence source implements.
//!
//! Sources are driven by the [`orchestrator`](crate::orchestrator) and must
//! turn every failure into an [`Outcome::Failure`] instead of returning an
//! error: one misbehaving source can never take the others down with it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scout_common::target::Target;

use crate::outcome::Outcome;
use crate::report::ScanReport;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// When a source runs relative to the others.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Runs in the first wave, concurrently with every other independent source.
    Independent,
    /// Runs once the first wave has finished and receives its partial report.
    Dependent,
}

/// Everything a source gets to see for one invocation.
#[derive(Clone, Debug)]
pub struct ScanContext {
    pub target: Arc<Target>,
    /// Budget for this invocation. The orchestrator enforces it as well.
    pub timeout: Duration,
    /// Results of the first wave, only set for [`Phase::Dependent`] sources.
    pub prior: Option<Arc<ScanReport>>,
}

#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Report key, unique within one orchestrator.
    fn name(&self) -> &str;

    fn phase(&self) -> Phase {
        Phase::Independent
    }

    fn default_timeout(&self) -> Duration {
        DEFAULT_TIMEOUT
    }

    async fn invoke(&self, ctx: &ScanContext) -> Outcome;
}
