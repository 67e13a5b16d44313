//! Historical captures from the Wayback Machine CDX index.
//!
//! The index answers with a JSON array of rows, the first row being the
//! column header (`urlkey`, `timestamp`, `original`, ...). An unknown host
//! gives an empty body or a header-only array.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::outcome::{FailureKind, Outcome};
use crate::source::{ScanContext, SourceAdapter};

use super::http;

pub const NAME: &str = "wayback";
const DEFAULT_BASE_URL: &str = "http://web.archive.org";
const DEFAULT_LIMIT: usize = 500;
const SAMPLE_SIZE: usize = 10;

pub struct WaybackAdapter {
    client: Client,
    base_url: String,
    limit: usize,
    timeout: Duration,
}

impl WaybackAdapter {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            client: http::build_client(timeout)?,
            base_url: DEFAULT_BASE_URL.to_string(),
            limit: DEFAULT_LIMIT,
            timeout,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Maximum number of captures requested from the index.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

#[async_trait]
impl SourceAdapter for WaybackAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn default_timeout(&self) -> Duration {
        self.timeout
    }

    async fn invoke(&self, ctx: &ScanContext) -> Outcome {
        let endpoint = format!("{}/cdx/search/cdx", self.base_url.trim_end_matches('/'));
        let limit = self.limit.to_string();
        let request = self.client.get(&endpoint).query(&[
            ("url", ctx.target.host()),
            ("output", "json"),
            ("limit", limit.as_str()),
        ]);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return http::classify(NAME, e),
        };

        match http::read_body(NAME, response).await {
            Ok((StatusCode::OK, body)) => interpret_rows(&body),
            Ok((status, _)) => Outcome::failure(
                FailureKind::NoData,
                format!("archive index answered {status}, no captures available"),
            ),
            Err(outcome) => outcome,
        }
    }
}

/// Turns a CDX JSON answer into a capture summary.
pub fn interpret_rows(body: &str) -> Outcome {
    if body.trim().is_empty() {
        return Outcome::failure(FailureKind::NoData, "no archived captures");
    }

    let rows: Vec<Vec<String>> = match serde_json::from_str(body) {
        Ok(rows) => rows,
        Err(e) => {
            return Outcome::failure(
                FailureKind::MalformedResponse,
                format!("unexpected archive index body: {e}"),
            );
        }
    };

    let Some((header, captures)) = rows.split_first() else {
        return Outcome::failure(FailureKind::NoData, "no archived captures");
    };
    if captures.is_empty() {
        return Outcome::failure(FailureKind::NoData, "no archived captures");
    }

    let column = |name: &str| header.iter().position(|h| h == name);
    let (Some(ts_col), Some(url_col)) = (column("timestamp"), column("original")) else {
        return Outcome::failure(
            FailureKind::MalformedResponse,
            "archive index header lacks timestamp/original columns",
        );
    };

    let mut timestamps: Vec<&str> = captures
        .iter()
        .filter_map(|row| row.get(ts_col).map(String::as_str))
        .collect();
    timestamps.sort_unstable();

    let mut originals: Vec<&str> = Vec::new();
    for row in captures {
        if let Some(url) = row.get(url_col)
            && !originals.contains(&url.as_str())
        {
            originals.push(url);
        }
    }

    let mut payload = format!(
        "{} captures ({} distinct URLs)",
        captures.len(),
        originals.len()
    );
    if let (Some(first), Some(last)) = (timestamps.first(), timestamps.last()) {
        payload.push_str(&format!(
            " between {} and {}",
            format_timestamp(first),
            format_timestamp(last)
        ));
    }
    for url in originals.iter().take(SAMPLE_SIZE) {
        payload.push_str("\n  ");
        payload.push_str(url);
    }
    if originals.len() > SAMPLE_SIZE {
        payload.push_str(&format!("\n  … {} more", originals.len() - SAMPLE_SIZE));
    }

    Outcome::success(payload)
}

/// `20190301123456` -> `2019-03-01`; anything else is returned unchanged.
fn format_timestamp(ts: &str) -> String {
    match ts.get(..8) {
        Some(date) if date.bytes().all(|b| b.is_ascii_digit()) => {
            format!("{}-{}-{}", &date[..4], &date[4..6], &date[6..8])
        }
        _ => ts.to_string(),
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
