//! Concrete intelligence sources and their assembly from a [`Config`].

pub mod analysis;
pub mod http;
pub mod nuclei;
pub mod shodan;
pub mod wayback;

use std::sync::Arc;

use scout_common::config::{Config, SourceKind};
use scout_common::error::ConfigError;
use thiserror::Error;

use crate::orchestrator::OrchestratorBuilder;
use crate::source::SourceAdapter;

pub use analysis::AnalysisAdapter;
pub use nuclei::NucleiAdapter;
pub use shodan::ShodanAdapter;
pub use wayback::WaybackAdapter;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Creates one source.
pub fn build_source(kind: SourceKind, cfg: &Config) -> Result<Arc<dyn SourceAdapter>, SetupError> {
    let timeout = cfg.timeouts.for_source(kind);
    let missing = |var: &'static str| ConfigError::MissingCredential {
        source_name: kind.as_str(),
        var,
    };

    let adapter: Arc<dyn SourceAdapter> = match kind {
        SourceKind::Nuclei => Arc::new(NucleiAdapter::new(cfg.nuclei_bin.clone(), timeout)),
        SourceKind::Shodan => {
            let key = cfg
                .credentials
                .shodan
                .as_deref()
                .ok_or_else(|| missing(scout_common::config::SHODAN_KEY_VAR))?;
            Arc::new(ShodanAdapter::new(key, timeout)?)
        }
        SourceKind::Wayback => Arc::new(WaybackAdapter::new(timeout)?),
        SourceKind::AiAnalysis => {
            let settings = &cfg.analysis;
            let key = cfg
                .credentials
                .for_provider(settings.provider)
                .ok_or_else(|| missing(settings.provider.key_var()))?;
            let adapter =
                AnalysisAdapter::new(settings.provider, key, settings.model(), timeout)?;
            if settings.independent {
                Arc::new(adapter.independent())
            } else {
                Arc::new(adapter)
            }
        }
    };
    Ok(adapter)
}

/// Registers every enabled source, in the configured order.
pub fn registry(cfg: &Config) -> Result<OrchestratorBuilder, SetupError> {
    cfg.validate()?;

    let mut builder = crate::orchestrator::ScanOrchestrator::builder();
    for kind in &cfg.sources {
        builder = builder.register_shared(build_source(*kind, cfg)?);
    }
    if let Some(deadline) = cfg.deadline {
        builder = builder.deadline(deadline);
    }
    Ok(builder)
}
