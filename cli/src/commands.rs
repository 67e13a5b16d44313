pub mod scan;
pub mod sources;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use scout_common::config::{Config, Provider, SourceKind, Timeouts};

#[derive(Parser)]
#[command(name = "scout")]
#[command(about = "Concurrent reconnaissance of a website across several intelligence sources.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Hide the banner
    #[arg(long, global = true)]
    pub no_banner: bool,

    /// Less output, repeat for even less (-qq prints only the summary)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Read API keys from this file instead of ./.env
    #[arg(long, value_name = "PATH", global = true)]
    pub env_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Query every enabled source about one website
    #[command(alias = "s")]
    Scan(ScanArgs),
    /// List the known sources and whether they are ready to run
    #[command(alias = "ls")]
    Sources,
}

#[derive(Args)]
pub struct ScanArgs {
    /// URL or domain, asked for interactively when omitted
    pub target: Option<String>,

    /// Comma separated subset of sources to query
    #[arg(long, value_delimiter = ',', value_name = "LIST")]
    pub sources: Vec<SourceKind>,

    /// Write the report as JSON
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Write the report as PDF
    #[arg(long, value_name = "PATH")]
    pub pdf: Option<PathBuf>,

    /// Upper bound for the whole scan, in seconds
    #[arg(long, value_name = "SECS")]
    pub deadline: Option<u64>,

    /// Timeout applied to every source, in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to the nuclei binary
    #[arg(long, value_name = "PATH")]
    pub nuclei_bin: Option<PathBuf>,

    /// Language model backend (openai, groq)
    #[arg(long, default_value = "openai")]
    pub provider: Provider,

    /// Model name, defaults to the provider's default
    #[arg(long)]
    pub model: Option<String>,

    /// Run the analysis alongside the other sources instead of after them
    #[arg(long)]
    pub independent_ai: bool,

    /// Characters of each result shown in the terminal
    #[arg(long, default_value_t = 1000, value_name = "CHARS")]
    pub display_chars: usize,
}

impl ScanArgs {
    /// Overrides the environment defaults with the flags given.
    pub fn apply(&self, cfg: &mut Config) {
        if !self.sources.is_empty() {
            let mut sources: Vec<SourceKind> = Vec::with_capacity(self.sources.len());
            for kind in &self.sources {
                if !sources.contains(kind) {
                    sources.push(*kind);
                }
            }
            cfg.sources = sources;
        }
        if let Some(secs) = self.timeout {
            cfg.timeouts = Timeouts::uniform(Duration::from_secs(secs));
        }
        cfg.deadline = self.deadline.map(Duration::from_secs);
        cfg.nuclei_bin = self.nuclei_bin.clone();
        cfg.analysis.provider = self.provider;
        cfg.analysis.model = self.model.clone();
        cfg.analysis.independent = self.independent_ai;
        cfg.json_out = self.json.clone();
        cfg.pdf_out = self.pdf.clone();
        cfg.display_chars = self.display_chars;
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
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
