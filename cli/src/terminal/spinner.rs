use std::sync::atomic::{AtomicUsize, Ordering};

use colored::*;
use indicatif::ProgressStyle;
use scout_core::Outcome;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::terminal::colors;

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Span whose progress bar stays on screen while the scan runs.
pub fn scan_span(total: usize) -> Span {
    let span = info_span!("scan", indicatif.pb_show = true);
    span.pb_set_style(&spinner_style());
    span.pb_set_message(&format!("Waiting on {total} sources..."));
    span
}

fn spinner_style() -> ProgressStyle {
    match ProgressStyle::with_template("{spinner:.blue} {msg}") {
        Ok(style) => style.tick_strings(TICKS),
        Err(_) => ProgressStyle::default_spinner(),
    }
}

/// Turns orchestrator progress callbacks into spinner messages.
pub struct ProgressReporter {
    span: Span,
    total: usize,
    settled: AtomicUsize,
}

impl ProgressReporter {
    pub fn new(span: Span, total: usize) -> Self {
        Self {
            span,
            total,
            settled: AtomicUsize::new(0),
        }
    }

    pub fn source_settled(&self, name: &str, outcome: &Outcome) {
        let settled = self.settled.fetch_add(1, Ordering::Relaxed) + 1;
        let status: ColoredString = if outcome.is_success() {
            outcome.tag().color(colors::SUCCESS)
        } else {
            outcome.tag().color(colors::FAILURE)
        };
        self.span.pb_set_message(&format!(
            "{}/{} sources settled, last: {} ({})",
            settled.to_string().green().bold(),
            self.total,
            name,
            status
        ));
    }
}
