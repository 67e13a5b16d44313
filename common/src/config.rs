//! Run configuration, built once at process start and passed by reference.
//!
//! Nothing below `main` reads the environment: credentials are collected here
//! and handed to each source when it is constructed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

pub const SHODAN_KEY_VAR: &str = "SHODAN_API_KEY";
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";
pub const GROQ_KEY_VAR: &str = "GROQ_API_KEY";

/// Every intelligence source `scout` knows how to query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Nuclei,
    Shodan,
    Wayback,
    AiAnalysis,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Nuclei,
        SourceKind::Shodan,
        SourceKind::Wayback,
        SourceKind::AiAnalysis,
    ];

    /// Stable name used as the report key.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Nuclei => "nuclei",
            SourceKind::Shodan => "shodan",
            SourceKind::Wayback => "wayback",
            SourceKind::AiAnalysis => "ai_analysis",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SourceKind::Nuclei => "template based vulnerability scan (local binary)",
            SourceKind::Shodan => "exposed services and banners from the Shodan host API",
            SourceKind::Wayback => "historical captures from the Wayback Machine CDX index",
            SourceKind::AiAnalysis => "language model summary of the security risks",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nuclei" => Ok(SourceKind::Nuclei),
            "shodan" => Ok(SourceKind::Shodan),
            "wayback" => Ok(SourceKind::Wayback),
            "ai_analysis" | "ai" | "openai" => Ok(SourceKind::AiAnalysis),
            other => Err(ConfigError::UnknownSource(other.to_string())),
        }
    }
}

/// OpenAI compatible chat completion backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    OpenAi,
    Groq,
}

impl Provider {
    pub fn base_url(&self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Groq => "https://api.groq.com/openai/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o-mini",
            Provider::Groq => "llama-3.3-70b-versatile",
        }
    }

    pub fn key_var(&self) -> &'static str {
        match self {
            Provider::OpenAi => OPENAI_KEY_VAR,
            Provider::Groq => GROQ_KEY_VAR,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::OpenAi => f.write_str("openai"),
            Provider::Groq => f.write_str("groq"),
        }
    }
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "groq" => Ok(Provider::Groq),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// API keys taken from the process environment.
#[derive(Clone, Default)]
pub struct Credentials {
    pub shodan: Option<String>,
    pub openai: Option<String>,
    pub groq: Option<String>,
}

impl Credentials {
    /// Reads the known key variables. Blank values count as missing.
    pub fn from_env() -> Self {
        Self {
            shodan: read_var(SHODAN_KEY_VAR),
            openai: read_var(OPENAI_KEY_VAR),
            groq: read_var(GROQ_KEY_VAR),
        }
    }

    pub fn for_provider(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::OpenAi => self.openai.as_deref(),
            Provider::Groq => self.groq.as_deref(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Credentials")
            .field("shodan", &redact(&self.shodan))
            .field("openai", &redact(&self.openai))
            .field("groq", &redact(&self.groq))
            .finish()
    }
}

fn read_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Per-source request budgets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeouts {
    pub nuclei: Duration,
    pub shodan: Duration,
    pub wayback: Duration,
    pub analysis: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            nuclei: Duration::from_secs(300),
            shodan: Duration::from_secs(30),
            wayback: Duration::from_secs(30),
            analysis: Duration::from_secs(60),
        }
    }
}

impl Timeouts {
    /// Applies the same budget to every source.
    pub fn uniform(timeout: Duration) -> Self {
        Self {
            nuclei: timeout,
            shodan: timeout,
            wayback: timeout,
            analysis: timeout,
        }
    }

    pub fn for_source(&self, kind: SourceKind) -> Duration {
        match kind {
            SourceKind::Nuclei => self.nuclei,
            SourceKind::Shodan => self.shodan,
            SourceKind::Wayback => self.wayback,
            SourceKind::AiAnalysis => self.analysis,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisSettings {
    pub provider: Provider,
    /// Falls back to [`Provider::default_model`].
    pub model: Option<String>,
    /// Run the analysis alongside the other sources with a target-only prompt
    /// instead of waiting for their results.
    pub independent: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAi,
            model: None,
            independent: false,
        }
    }
}

impl AnalysisSettings {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Hides the banner.
    pub no_banner: bool,
    /// 0 prints everything, 1 hides decoration, 2 prints only the summary.
    pub quiet: u8,
    /// Sources to query, in report order.
    pub sources: Vec<SourceKind>,
    pub timeouts: Timeouts,
    /// Overall budget for a whole scan, on top of the per-source timeouts.
    pub deadline: Option<Duration>,
    /// Explicit path to the nuclei binary, otherwise looked up on `PATH`.
    pub nuclei_bin: Option<PathBuf>,
    pub analysis: AnalysisSettings,
    pub credentials: Credentials,
    pub json_out: Option<PathBuf>,
    pub pdf_out: Option<PathBuf>,
    /// Characters of each payload shown in the terminal.
    pub display_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            no_banner: false,
            quiet: 0,
            sources: SourceKind::ALL.to_vec(),
            timeouts: Timeouts::default(),
            deadline: None,
            nuclei_bin: None,
            analysis: AnalysisSettings::default(),
            credentials: Credentials::default(),
            json_out: None,
            pdf_out: None,
            display_chars: 1_000,
        }
    }
}

impl Config {
    /// Default settings with credentials read from the environment.
    ///
    /// When `env_file` is given it must exist; otherwise a `.env` in the
    /// working directory is loaded if present. Variables already set in the
    /// process environment win over the file.
    pub fn from_env(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path)?;
            }
            None => match dotenvy::dotenv() {
                Ok(_) => {}
                Err(e) if e.not_found() => {}
                Err(e) => return Err(e.into()),
            },
        }

        Ok(Self {
            credentials: Credentials::from_env(),
            ..Self::default()
        })
    }

    pub fn is_enabled(&self, kind: SourceKind) -> bool {
        self.sources.contains(&kind)
    }

    /// Checks everything that must hold before a scan starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }

        for kind in &self.sources {
            if let Some(var) = self.missing_credential(*kind) {
                return Err(ConfigError::MissingCredential {
                    source_name: kind.as_str(),
                    var,
                });
            }
        }
        Ok(())
    }

    /// Name of the environment variable a source still needs, if any.
    pub fn missing_credential(&self, kind: SourceKind) -> Option<&'static str> {
        match kind {
            SourceKind::Shodan if self.credentials.shodan.is_none() => Some(SHODAN_KEY_VAR),
            SourceKind::AiAnalysis
                if self
                    .credentials
                    .for_provider(self.analysis.provider)
                    .is_none() =>
            {
                Some(self.analysis.provider.key_var())
            }
            _ => None,
        }
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
