#![cfg(test)]
use std::collections::BTreeSet;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use scout_common::target::Target;
use scout_core::{FailureKind, Outcome, ScanOrchestrator};

use crate::stubs::{Capturing, Delayed, Failing, Panicking, Prompting, Silent};

fn target() -> Target {
    "https://example.com".parse().unwrap()
}

/// Every registered source shows up exactly once in the report.
#[tokio::test]
async fn report_keys_match_registered_sources() {
    let orchestrator = ScanOrchestrator::builder()
        .register(Delayed::new("alpha", 10, "a"))
        .register(Failing::new("beta", FailureKind::NoData))
        .register(Delayed::new("gamma", 5, "c"))
        .build()
        .unwrap();

    let report = orchestrator.scan(&target()).await;

    let keys: BTreeSet<&str> = report.names().collect();
    let expected: BTreeSet<&str> = ["alpha", "beta", "gamma"].into_iter().collect();
    assert_eq!(keys, expected);
    assert_eq!(report.len(), 3);
}

/// A source that fails or panics does not disturb the others.
#[tokio::test]
async fn failures_stay_isolated() {
    let orchestrator = ScanOrchestrator::builder()
        .register(Delayed::new("first", 20, "one"))
        .register(Panicking::new("broken"))
        .register(Failing::new("offline", FailureKind::TransportError))
        .register(Delayed::new("last", 10, "two"))
        .build()
        .unwrap();

    let report = orchestrator.scan(&target()).await;

    assert_eq!(report.get("first"), Some(&Outcome::success("one")));
    assert_eq!(report.get("last"), Some(&Outcome::success("two")));
    assert_eq!(
        report.get("broken").and_then(Outcome::failure_kind),
        Some(FailureKind::Panicked)
    );
    assert_eq!(
        report.get("offline").and_then(Outcome::failure_kind),
        Some(FailureKind::TransportError)
    );
}

/// Order follows registration even when the first source finishes last.
#[tokio::test]
async fn order_is_registration_order() {
    let orchestrator = ScanOrchestrator::builder()
        .register(Delayed::new("slow", 150, "s"))
        .register(Delayed::new("fast", 0, "f"))
        .register(Delayed::new("medium", 50, "m"))
        .build()
        .unwrap();

    let report = orchestrator.scan(&target()).await;

    let names: Vec<&str> = report.names().collect();
    assert_eq!(names, ["slow", "fast", "medium"]);
}

/// Sources run concurrently: total time is close to the slowest one.
#[tokio::test]
async fn sources_run_concurrently() {
    let orchestrator = ScanOrchestrator::builder()
        .register(Delayed::new("a", 200, "a"))
        .register(Delayed::new("b", 300, "b"))
        .register(Delayed::new("c", 100, "c"))
        .build()
        .unwrap();

    let started = Instant::now();
    let report = orchestrator.scan(&target()).await;
    let elapsed = started.elapsed();

    assert_eq!(report.successes().count(), 3);
    assert!(elapsed >= Duration::from_millis(300), "finished too early: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(500), "ran sequentially: {elapsed:?}");
}

/// The dependent source is handed the complete first wave.
#[tokio::test]
async fn dependent_source_receives_first_wave() {
    let capture = Capturing::new("summary");
    let seen = capture.seen();

    let orchestrator = ScanOrchestrator::builder()
        .register(Delayed::new("A", 30, "alpha"))
        .register(capture)
        .register(Failing::new("B", FailureKind::BadStatus))
        .build()
        .unwrap();

    let report = orchestrator.scan(&target()).await;

    let prior = seen.lock().unwrap().clone().expect("dependent source was not invoked");
    let prior_names: Vec<&str> = prior.names().collect();
    assert_eq!(prior_names, ["A", "B"]);
    assert_eq!(prior.get("A"), Some(&Outcome::success("alpha")));
    assert!(prior.get("summary").is_none());

    assert_eq!(report.get("summary"), Some(&Outcome::success("saw A,B")));
    let names: Vec<&str> = report.names().collect();
    assert_eq!(names, ["A", "summary", "B"]);
}

/// Both first-wave payloads reach the analysis prompt of the dependent source.
#[tokio::test]
async fn analysis_prompt_embeds_both_first_wave_payloads() {
    let analysis = Prompting::new("ai_analysis");
    let prompt = analysis.prompt();

    let orchestrator = ScanOrchestrator::builder()
        .register(Delayed::new("first", 30, "A"))
        .register(Delayed::new("second", 10, "B"))
        .register(analysis)
        .build()
        .unwrap();

    let report = orchestrator.scan(&target()).await;
    assert_eq!(report.get("ai_analysis"), Some(&Outcome::success("prompt composed")));

    let prompt = prompt.lock().unwrap().clone().expect("analysis source was not invoked");
    assert!(prompt.contains("### first\nA"), "{prompt}");
    assert!(prompt.contains("### second\nB"), "{prompt}");
    assert!(prompt.find("### first") < prompt.find("### second"));
}

/// A source that never answers is cut off at its own timeout.
#[tokio::test]
async fn silent_source_times_out() {
    let orchestrator = ScanOrchestrator::builder()
        .register_with_timeout(Silent::new("void"), Duration::from_secs(1))
        .register(Delayed::new("ok", 0, "fine"))
        .build()
        .unwrap();

    let started = Instant::now();
    let report = orchestrator.scan(&target()).await;
    let elapsed = started.elapsed();

    assert_eq!(
        report.get("void").and_then(Outcome::failure_kind),
        Some(FailureKind::Timeout)
    );
    assert_eq!(report.get("ok"), Some(&Outcome::success("fine")));
    assert!(elapsed >= Duration::from_millis(950), "timed out early: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(1_500), "timeout not enforced: {elapsed:?}");
}

/// The overall deadline bounds the scan and keeps finished results.
#[tokio::test]
async fn deadline_bounds_the_whole_scan() {
    let orchestrator = ScanOrchestrator::builder()
        .register(Delayed::new("quick", 10, "q"))
        .register(Silent::new("stuck"))
        .deadline(Duration::from_millis(300))
        .build()
        .unwrap();

    let started = Instant::now();
    let report = orchestrator.scan(&target()).await;

    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(report.get("quick"), Some(&Outcome::success("q")));
    assert_eq!(
        report.get("stuck").and_then(Outcome::failure_kind),
        Some(FailureKind::Timeout)
    );
}

/// Repeated scans with deterministic sources give the same outcomes and call
/// each source once per scan.
#[tokio::test]
async fn repeated_scans_are_consistent() {
    let alpha = Delayed::new("alpha", 5, "a");
    let calls = alpha.calls();
    let orchestrator = ScanOrchestrator::builder()
        .register(alpha)
        .register(Failing::new("beta", FailureKind::NoData))
        .build()
        .unwrap();

    let first = orchestrator.scan(&target()).await;
    let second = orchestrator.scan(&target()).await;

    let outcomes = |report: &scout_core::ScanReport| -> Vec<(String, Outcome)> {
        report
            .iter()
            .map(|(name, outcome)| (name.to_string(), outcome.clone()))
            .collect()
    };
    assert_eq!(outcomes(&first), outcomes(&second));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn malformed_target_is_rejected_before_dispatch() {
    let alpha = Delayed::new("alpha", 0, "a");
    let calls = alpha.calls();
    let orchestrator = ScanOrchestrator::builder().register(alpha).build().unwrap();

    assert!(orchestrator.scan_raw("   ").await.is_err());
    assert!(orchestrator.scan_raw("ftp://example.com").await.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
