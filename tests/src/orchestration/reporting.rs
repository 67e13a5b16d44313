#![cfg(test)]
use scout_common::config::{Config, SourceKind};
use scout_common::error::ConfigError;
use scout_core::sinks::{JsonSink, PdfSink, ResultSink};
use scout_core::sources::{self, SetupError};
use scout_core::{FailureKind, ScanOrchestrator};
use serde_json::Value;

use crate::stubs::{Delayed, Failing};

/// A finished report survives the trip through the JSON sink with its order
/// and its success/failure tags intact.
#[tokio::test]
async fn json_report_keeps_order_and_tags() -> anyhow::Result<()> {
    let orchestrator = ScanOrchestrator::builder()
        .register(Delayed::new("wayback", 40, "12 captures"))
        .register(Failing::new("shodan", FailureKind::BadStatus))
        .register(Delayed::new("nuclei", 0, "no findings"))
        .build()?;
    let report = orchestrator.scan_raw("example.com").await?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("report.json");
    JsonSink::new(&path).write(&report)?;

    let text = std::fs::read_to_string(&path)?;
    let positions: Vec<usize> = ["\"wayback\"", "\"shodan\"", "\"nuclei\""]
        .iter()
        .filter_map(|key| text.find(key))
        .collect();
    assert_eq!(positions.len(), 3);
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

    let json: Value = serde_json::from_str(&text)?;
    assert_eq!(json["target"], "https://example.com/");

    let sources = &json["sources"];

    assert_eq!(sources["wayback"]["status"], "success");
    assert_eq!(sources["wayback"]["payload"], "12 captures");
    assert_eq!(sources["shodan"]["status"], "failure");
    assert_eq!(sources["shodan"]["kind"], "bad_status");
    Ok(())
}

#[tokio::test]
async fn pdf_report_is_written() -> anyhow::Result<()> {
    let orchestrator = ScanOrchestrator::builder()
        .register(Delayed::new("wayback", 0, &"capture line\n".repeat(200)))
        .register(Failing::new("ai_analysis", FailureKind::Timeout))
        .build()?;
    let report = orchestrator.scan_raw("https://example.com/login").await?;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("report.pdf");
    PdfSink::new(&path).write(&report)?;

    let bytes = std::fs::read(&path)?;
    assert!(bytes.starts_with(b"%PDF"));
    Ok(())
}

#[test]
fn registry_follows_configured_sources() -> anyhow::Result<()> {
    let cfg = Config {
        sources: vec![SourceKind::Wayback, SourceKind::Nuclei],
        ..Config::default()
    };
    let orchestrator = sources::registry(&cfg)?.build()?;
    assert_eq!(orchestrator.source_names(), ["wayback", "nuclei"]);
    Ok(())
}

#[test]
fn registry_refuses_missing_credentials() {
    let cfg = Config {
        sources: vec![SourceKind::Wayback, SourceKind::Shodan],
        ..Config::default()
    };
    assert!(matches!(
        sources::registry(&cfg),
        Err(SetupError::Config(ConfigError::MissingCredential { source_name: "shodan", .. }))
    ));
}
