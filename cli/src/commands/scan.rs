use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use colored::*;
use tracing::Instrument;

use crate::{
    mprint,
    terminal::{colors, format, print, prompt, spinner},
};
use scout_common::{config::Config, success, target::Target, warn};
use scout_core::ScanReport;
use scout_core::sinks::{JsonSink, PdfSink, ResultSink};
use scout_core::sources;

pub async fn scan(target: Option<String>, cfg: &Config) -> anyhow::Result<()> {
    let raw: String = match target {
        Some(raw) => raw,
        None => match prompt::ask_target().context("reading the target")? {
            Some(raw) => raw,
            None => {
                warn!("Please enter a valid URL.");
                return Ok(());
            }
        },
    };
    let target: Target = raw
        .parse()
        .with_context(|| format!("'{raw}' is not a scannable target"))?;

    let span = spinner::scan_span(cfg.sources.len());
    let progress = spinner::ProgressReporter::new(span.clone(), cfg.sources.len());
    let orchestrator = sources::registry(cfg)
        .context("preparing sources")?
        .on_progress(move |name, outcome| progress.source_settled(name, outcome))
        .build()?;

    success!(
        "Scanning {} with {} sources: {}",
        target.url(),
        orchestrator.len(),
        orchestrator.source_names().join(", ")
    );

    let report: ScanReport = orchestrator.scan(&target).instrument(span).await;

    scan_ends(&report, cfg);
    write_sinks(&report, cfg);
    Ok(())
}

fn scan_ends(report: &ScanReport, cfg: &Config) {
    if cfg.quiet > 0 {
        mprint!();
    }

    print::header("scan results", cfg.quiet);
    print_sources(report, cfg);
    print_summary(report, cfg);
}

fn print_sources(report: &ScanReport, cfg: &Config) {
    if cfg.quiet >= 2 {
        return;
    }
    for (idx, (name, outcome)) in report.iter().enumerate() {
        print::tree_head(idx, name);
        print::as_tree_one_level(vec![format::status_to_detail(outcome)]);
        print::as_tree_body(&format::outcome_to_lines(outcome, cfg.display_chars));
        if idx + 1 != report.len() {
            mprint!();
        }
    }
}

fn print_summary(report: &ScanReport, cfg: &Config) {
    let answered: usize = report.successes().count();
    let answered: ColoredString = format!("{answered}/{} sources", report.len()).bold().green();
    let total_time: ColoredString = format_elapsed(report.elapsed()).bold().yellow();
    let output: &ColoredString =
        &format!("Scan Complete: {answered} answered in {total_time}").color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(output);
        }
        _ => {
            mprint!();
            success!("{}", output)
        }
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

fn write_sinks(report: &ScanReport, cfg: &Config) {
    let mut sinks: Vec<(Box<dyn ResultSink>, &Path)> = Vec::new();
    if let Some(path) = &cfg.json_out {
        sinks.push((Box::new(JsonSink::new(path)), path));
    }
    if let Some(path) = &cfg.pdf_out {
        sinks.push((Box::new(PdfSink::new(path)), path));
    }

    for (sink, path) in sinks {
        match sink.write(report) {
            Ok(()) => success!("{} report saved to {}", sink.name(), path.display()),
            Err(e) => scout_common::error!("{} report not written: {e}", sink.name()),
        }
    }
    if cfg.quiet == 0 {
        print::end_of_program();
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
