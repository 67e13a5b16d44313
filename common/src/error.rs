use thiserror::Error;

/// Problems detected while assembling the run configuration.
///
/// All of these are fatal and surface before any source is contacted.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing credential {var} required by source '{source_name}'")]
    MissingCredential {
        source_name: &'static str,
        var: &'static str,
    },

    #[error("no sources enabled")]
    NoSources,

    #[error("unknown source '{0}' (expected one of: nuclei, shodan, wayback, ai_analysis)")]
    UnknownSource(String),

    #[error("unknown analysis provider '{0}' (expected 'openai' or 'groq')")]
    UnknownProvider(String),

    #[error("failed to load environment file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

/// Reasons a user supplied target cannot be scanned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("target is empty")]
    Empty,

    #[error("target '{0}' contains whitespace")]
    Whitespace(String),

    #[error("unsupported scheme '{0}', only http and https are scanned")]
    UnsupportedScheme(String),

    #[error("target '{0}' has no host component")]
    MissingHost(String),

    #[error("invalid target '{target}': {reason}")]
    Invalid { target: String, reason: String },
}
