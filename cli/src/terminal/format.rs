use crate::terminal::colors;
use colored::*;
use scout_common::config::{Config, SourceKind};
use scout_core::Outcome;
use scout_core::sinks::truncate;

pub type Detail = (String, ColoredString);

pub fn status_to_detail(outcome: &Outcome) -> Detail {
    let value: ColoredString = match outcome {
        Outcome::Success { .. } => "SUCCESS".color(colors::SUCCESS).bold(),
        Outcome::Failure { kind, .. } => {
            format!("FAILURE ({kind})").color(colors::FAILURE).bold()
        }
    };
    ("Status".to_string(), value)
}

/// Payload or failure message, cut to `max_chars` and split into lines.
pub fn outcome_to_lines(outcome: &Outcome, max_chars: usize) -> Vec<String> {
    let text: &str = match outcome {
        Outcome::Success { payload } => payload,
        Outcome::Failure { message, .. } => message,
    };
    truncate(text, max_chars)
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Readiness of one source under the current configuration.
pub fn readiness_to_detail(kind: SourceKind, cfg: &Config, nuclei_found: bool) -> Detail {
    let value: ColoredString = match kind {
        SourceKind::Nuclei if !nuclei_found => "nuclei binary not found".color(colors::FAILURE),
        _ => match cfg.missing_credential(kind) {
            Some(var) => format!("missing {var}").color(colors::CREDENTIAL),
            None => "ready".color(colors::SUCCESS),
        },
    };
    ("Status".to_string(), value)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
