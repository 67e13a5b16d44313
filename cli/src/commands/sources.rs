use colored::*;

use crate::{
    mprint,
    terminal::{colors, format, print},
};
use scout_common::config::{Config, SourceKind};
use scout_core::sources::nuclei;

pub fn list(cfg: &Config) {
    let nuclei_found: bool = nuclei::find_binary(cfg.nuclei_bin.as_deref()).is_some();

    for (idx, kind) in SourceKind::ALL.iter().enumerate() {
        print::tree_head(idx, kind.as_str());
        print::as_tree_one_level(vec![
            (
                "About".to_string(),
                kind.description().color(colors::TEXT_DEFAULT),
            ),
            (
                "Timeout".to_string(),
                format!("{}s", cfg.timeouts.for_source(*kind).as_secs()).normal(),
            ),
            format::readiness_to_detail(*kind, cfg, nuclei_found),
        ]);
        if idx + 1 != SourceKind::ALL.len() {
            mprint!();
        }
    }
}
