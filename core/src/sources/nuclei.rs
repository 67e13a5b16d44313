//! Template based vulnerability scan through the `nuclei` binary.
//!
//! The binary is started with an argument vector, never through a shell, and
//! is killed if the invocation is dropped (timeout or scan deadline).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::outcome::{FailureKind, Outcome};
use crate::source::{ScanContext, SourceAdapter};

use super::http::excerpt;

pub const NAME: &str = "nuclei";
const BINARY: &str = "nuclei";
const DEFAULT_ARGS: [&str; 3] = ["-silent", "-jsonl", "-no-color"];

pub struct NucleiAdapter {
    binary: Option<PathBuf>,
    args: Vec<String>,
    timeout: Duration,
}

impl NucleiAdapter {
    /// `binary` overrides the `PATH` lookup.
    pub fn new(binary: Option<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary,
            args: DEFAULT_ARGS.iter().map(|a| a.to_string()).collect(),
            timeout,
        }
    }

    /// Replaces the flags passed after `-u <url>`.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    fn locate(&self) -> Result<PathBuf, Outcome> {
        find_binary(self.binary.as_deref()).ok_or_else(|| {
            let message = match &self.binary {
                Some(path) => format!("{} is not an executable file", path.display()),
                None => format!("{BINARY} not found on PATH"),
            };
            Outcome::failure(FailureKind::ToolUnavailable, message)
        })
    }

    /// Full argument vector for one target.
    pub fn command_args(&self, url: &str) -> Vec<String> {
        let mut args = vec!["-u".to_string(), url.to_string()];
        args.extend(self.args.iter().cloned());
        args
    }
}

#[async_trait]
impl SourceAdapter for NucleiAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn default_timeout(&self) -> Duration {
        self.timeout
    }

    async fn invoke(&self, ctx: &ScanContext) -> Outcome {
        let binary = match self.locate() {
            Ok(binary) => binary,
            Err(outcome) => return outcome,
        };

        debug!(source = NAME, "running {} against {}", binary.display(), ctx.target.url());
        let mut command = Command::new(&binary);
        command
            .args(self.command_args(ctx.target.url()))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(ctx.timeout, command.output()).await {
            Err(_) => {
                return Outcome::failure(
                    FailureKind::Timeout,
                    format!("{BINARY} still running after {:.1}s", ctx.timeout.as_secs_f64()),
                );
            }
            Ok(Ok(output)) => output,
            Ok(Err(e)) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) => {
                return Outcome::failure(
                    FailureKind::ToolUnavailable,
                    format!("cannot execute {}: {e}", binary.display()),
                );
            }
            Ok(Err(e)) => {
                return Outcome::failure(
                    FailureKind::ToolUnavailable,
                    format!("failed to run {}: {e}", binary.display()),
                );
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Outcome::failure(
                FailureKind::BadStatus,
                format!("{BINARY} exited with {}: {}", output.status, excerpt(&stderr)),
            );
        }

        Outcome::success(summarize_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// The explicit binary when it resolves to an executable, otherwise the
/// first `nuclei` on `PATH`.
pub fn find_binary(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => which::which(path).ok(),
        None => which::which(BINARY).ok(),
    }
}

#[derive(Deserialize)]
struct Finding {
    #[serde(rename = "template-id")]
    template_id: Option<String>,
    #[serde(rename = "matched-at")]
    matched_at: Option<String>,
    host: Option<String>,
    info: Option<FindingInfo>,
}

#[derive(Deserialize)]
struct FindingInfo {
    name: Option<String>,
    severity: Option<String>,
}

/// One line per finding; JSON lines are condensed, anything else is kept as is.
pub fn summarize_output(stdout: &str) -> String {
    let lines: Vec<String> = stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match serde_json::from_str::<Finding>(line) {
            Ok(finding) => render_finding(&finding),
            Err(_) => line.to_string(),
        })
        .collect();

    if lines.is_empty() {
        "no findings".to_string()
    } else {
        lines.join("\n")
    }
}

fn render_finding(finding: &Finding) -> String {
    let severity = finding
        .info
        .as_ref()
        .and_then(|info| info.severity.as_deref())
        .unwrap_or("unknown");
    let template = finding.template_id.as_deref().unwrap_or("unknown-template");
    let location = finding
        .matched_at
        .as_deref()
        .or(finding.host.as_deref())
        .unwrap_or("-");

    match finding.info.as_ref().and_then(|info| info.name.as_deref()) {
        Some(name) => format!("[{severity}] {template} {location} ({name})"),
        None => format!("[{severity}] {template} {location}"),
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
