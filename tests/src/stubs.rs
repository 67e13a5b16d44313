//! Scriptable sources for exercising the orchestrator.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use scout_core::sources::analysis::compose_prompt;
use scout_core::{FailureKind, Outcome, Phase, ScanContext, ScanReport, SourceAdapter};

/// Answers with a fixed payload after a delay.
pub struct Delayed {
    name: String,
    delay: Duration,
    payload: String,
    calls: Arc<AtomicUsize>,
}

impl Delayed {
    pub fn new(name: &str, delay_ms: u64, payload: &str) -> Self {
        Self {
            name: name.to_string(),
            delay: Duration::from_millis(delay_ms),
            payload: payload.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared invocation counter.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl SourceAdapter for Delayed {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, _ctx: &ScanContext) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Outcome::success(self.payload.clone())
    }
}

/// Always reports the same failure.
pub struct Failing {
    name: String,
    kind: FailureKind,
}

impl Failing {
    pub fn new(name: &str, kind: FailureKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
        }
    }
}

#[async_trait]
impl SourceAdapter for Failing {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, _ctx: &ScanContext) -> Outcome {
        Outcome::failure(self.kind, format!("{} is unavailable", self.name))
    }
}

/// Panics instead of answering.
pub struct Panicking {
    name: String,
}

impl Panicking {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl SourceAdapter for Panicking {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, _ctx: &ScanContext) -> Outcome {
        panic!("{} blew up", self.name)
    }
}

/// Never answers.
pub struct Silent {
    name: String,
}

impl Silent {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl SourceAdapter for Silent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, _ctx: &ScanContext) -> Outcome {
        std::future::pending::<()>().await;
        Outcome::failure(FailureKind::NoData, "unreachable")
    }
}

/// Dependent source that records the partial report it was given.
pub struct Capturing {
    name: String,
    seen: Arc<Mutex<Option<ScanReport>>>,
}

impl Capturing {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            seen: Arc::new(Mutex::new(None)),
        }
    }

    pub fn seen(&self) -> Arc<Mutex<Option<ScanReport>>> {
        Arc::clone(&self.seen)
    }
}

#[async_trait]
impl SourceAdapter for Capturing {
    fn name(&self) -> &str {
        &self.name
    }

    fn phase(&self) -> Phase {
        Phase::Dependent
    }

    async fn invoke(&self, ctx: &ScanContext) -> Outcome {
        let prior: Option<ScanReport> = ctx.prior.as_deref().cloned();
        let names: Vec<String> = prior
            .iter()
            .flat_map(|report| report.names().map(str::to_string))
            .collect();

        if let Ok(mut seen) = self.seen.lock() {
            *seen = prior;
        }
        Outcome::success(format!("saw {}", names.join(",")))
    }
}

/// Dependent source that builds the analysis prompt from the first wave and
/// keeps it instead of sending it anywhere.
pub struct Prompting {
    name: String,
    prompt: Arc<Mutex<Option<String>>>,
}

impl Prompting {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            prompt: Arc::new(Mutex::new(None)),
        }
    }

    pub fn prompt(&self) -> Arc<Mutex<Option<String>>> {
        Arc::clone(&self.prompt)
    }
}

#[async_trait]
impl SourceAdapter for Prompting {
    fn name(&self) -> &str {
        &self.name
    }

    fn phase(&self) -> Phase {
        Phase::Dependent
    }

    async fn invoke(&self, ctx: &ScanContext) -> Outcome {
        let prompt = compose_prompt(&ctx.target, ctx.prior.as_deref());
        if let Ok(mut slot) = self.prompt.lock() {
            *slot = Some(prompt);
        }
        Outcome::success("prompt composed")
    }
}
