//! # Scan Target Model
//!
//! A target is whatever the user typed: a full URL (`https://example.com/login`)
//! or a bare domain/address (`example.com`, `203.0.113.7`). Sources need it in
//! different shapes, so parsing keeps the original text and derives:
//! * a **URL** for tools that crawl (`nuclei`), defaulting to `https://`.
//! * a bare **host** for lookups keyed by name or address (`shodan`, `wayback`).

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use url::Url;

use crate::error::TargetError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    raw: String,
    url: Url,
    host: String,
}

impl Target {
    /// The text exactly as supplied (trimmed).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Normalized URL, `https://` is assumed when no scheme was given.
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Host without scheme, credentials, port, path, query or fragment.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The host as an IP address, when the target was given as one.
    pub fn ip(&self) -> Option<IpAddr> {
        self.host.parse().ok()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Target {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(TargetError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(TargetError::Whitespace(raw.to_string()));
        }

        let url = parse_url(raw)?;
        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host.trim_start_matches('[').trim_end_matches(']'),
            _ => return Err(TargetError::MissingHost(raw.to_string())),
        };

        Ok(Self {
            raw: raw.to_string(),
            host: host.to_ascii_lowercase(),
            url,
        })
    }
}

fn parse_url(raw: &str) -> Result<Url, TargetError> {
    let candidate: String = match raw.split_once("://") {
        Some((scheme, _)) => {
            let scheme = scheme.to_ascii_lowercase();
            if scheme != "http" && scheme != "https" {
                return Err(TargetError::UnsupportedScheme(scheme));
            }
            raw.to_string()
        }
        None => format!("https://{raw}"),
    };

    Url::parse(&candidate).map_err(|e| TargetError::Invalid {
        target: raw.to_string(),
        reason: e.to_string(),
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
