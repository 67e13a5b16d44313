//! Exposed services for the target's address, from the Shodan host API.
//!
//! The host endpoint is keyed by IP address, so domain targets are resolved
//! first.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::outcome::{FailureKind, Outcome};
use crate::source::{ScanContext, SourceAdapter};

use super::http;

pub const NAME: &str = "shodan";
const DEFAULT_BASE_URL: &str = "https://api.shodan.io";
const MAX_LISTED: usize = 20;

pub struct ShodanAdapter {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl ShodanAdapter {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            client: http::build_client(timeout)?,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SourceAdapter for ShodanAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn default_timeout(&self) -> Duration {
        self.timeout
    }

    async fn invoke(&self, ctx: &ScanContext) -> Outcome {
        let ip = match ctx.target.ip() {
            Some(ip) => ip,
            None => match resolve(ctx.target.host()).await {
                Ok(ip) => {
                    debug!(source = NAME, "resolved {} to {ip}", ctx.target.host());
                    ip
                }
                Err(outcome) => return outcome,
            },
        };

        let endpoint = format!(
            "{}/shodan/host/{ip}",
            self.base_url.trim_end_matches('/')
        );
        let request = self
            .client
            .get(&endpoint)
            .query(&[("key", self.api_key.as_str())]);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return http::classify(NAME, e.without_url()),
        };

        match http::read_body(NAME, response).await {
            Ok((status, body)) if status.is_success() => summarize_host(&body),
            Ok((StatusCode::NOT_FOUND, _)) => Outcome::failure(
                FailureKind::NoData,
                format!("no information available for {ip}"),
            ),
            Ok((status, body)) => http::bad_status(NAME, status, &body),
            Err(outcome) => outcome,
        }
    }
}

/// Resolves a host name, preferring IPv4 since that is what Shodan indexes best.
async fn resolve(host: &str) -> Result<IpAddr, Outcome> {
    let addrs: Vec<IpAddr> = match tokio::net::lookup_host((host, 0)).await {
        Ok(addrs) => addrs.map(|addr| addr.ip()).collect(),
        Err(e) => {
            return Err(Outcome::failure(
                FailureKind::TransportError,
                format!("could not resolve {host}: {e}"),
            ));
        }
    };

    addrs
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| {
            Outcome::failure(
                FailureKind::TransportError,
                format!("{host} resolved to no addresses"),
            )
        })
}

#[derive(Debug, Deserialize)]
struct HostInfo {
    ip_str: Option<String>,
    org: Option<String>,
    isp: Option<String>,
    os: Option<String>,
    country_name: Option<String>,
    #[serde(default)]
    ports: Vec<u16>,
    #[serde(default)]
    hostnames: Vec<String>,
    #[serde(default)]
    vulns: Vec<String>,
    #[serde(default)]
    data: Vec<ServiceBanner>,
}

#[derive(Debug, Deserialize)]
struct ServiceBanner {
    port: Option<u16>,
    transport: Option<String>,
    product: Option<String>,
    version: Option<String>,
}

/// Renders the interesting parts of a host record.
pub fn summarize_host(body: &str) -> Outcome {
    let info: HostInfo = match serde_json::from_str(body) {
        Ok(info) => info,
        Err(e) => {
            return Outcome::failure(
                FailureKind::MalformedResponse,
                format!("unexpected host record: {e}"),
            );
        }
    };

    let mut lines: Vec<String> = Vec::new();
    let field = |label: &str, value: &Option<String>| {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(|v| format!("{label}: {v}"))
    };

    lines.extend(field("IP", &info.ip_str));
    lines.extend(field("Organization", &info.org));
    lines.extend(field("ISP", &info.isp));
    lines.extend(field("OS", &info.os));
    lines.extend(field("Country", &info.country_name));

    if !info.hostnames.is_empty() {
        lines.push(format!("Hostnames: {}", info.hostnames.join(", ")));
    }

    let mut ports = info.ports.clone();
    ports.sort_unstable();
    ports.dedup();
    if !ports.is_empty() {
        let ports: Vec<String> = ports.iter().map(u16::to_string).collect();
        lines.push(format!("Open ports: {}", ports.join(", ")));
    }

    for banner in info.data.iter().take(MAX_LISTED) {
        let Some(port) = banner.port else { continue };
        let transport = banner.transport.as_deref().unwrap_or("tcp");
        let product = match (&banner.product, &banner.version) {
            (Some(product), Some(version)) => format!("{product} {version}"),
            (Some(product), None) => product.clone(),
            _ => continue,
        };
        lines.push(format!("  {port}/{transport} {product}"));
    }

    if !info.vulns.is_empty() {
        let mut vulns = info.vulns.clone();
        vulns.sort();
        let listed: Vec<&str> = vulns.iter().take(MAX_LISTED).map(String::as_str).collect();
        let suffix = if vulns.len() > MAX_LISTED {
            format!(" (+{} more)", vulns.len() - MAX_LISTED)
        } else {
            String::new()
        };
        lines.push(format!("Vulnerabilities: {}{suffix}", listed.join(", ")));
    }

    if lines.is_empty() {
        return Outcome::failure(FailureKind::NoData, "host record is empty");
    }
    Outcome::success(lines.join("\n"))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
