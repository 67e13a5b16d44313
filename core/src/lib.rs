//! # Scout Core
//!
//! Fans one target out to several independent intelligence sources and
//! gathers whatever each of them returns into a single ordered report.
//!
//! ## Layout
//! * **[`source`]**: the [`SourceAdapter`](source::SourceAdapter) contract every source implements.
//! * **[`outcome`]**: tagged success/failure result of one source.
//! * **[`orchestrator`]**: concurrent, deadline-bounded dispatch of all sources.
//! * **[`report`]**: the ordered [`ScanReport`](report::ScanReport) handed to consumers.
//! * **[`sources`]**: concrete sources (`nuclei`, `shodan`, `wayback`, `ai_analysis`).
//! * **[`sinks`]**: report writers (JSON, PDF).
//!
//! High-level code should depend on the contract in [`source`] rather than on
//! the concrete sources, which are only assembled in [`sources::registry`].

pub mod orchestrator;
pub mod outcome;
pub mod report;
pub mod sinks;
pub mod source;
pub mod sources;

pub use orchestrator::{OrchestratorError, ScanOrchestrator};
pub use outcome::{FailureKind, Outcome};
pub use report::ScanReport;
pub use source::{Phase, ScanContext, SourceAdapter};
