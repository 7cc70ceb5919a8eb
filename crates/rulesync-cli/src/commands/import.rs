use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use rulesync_core::model::FeatureSelector;
use rulesync_core::{FeatureKind, LocalFs, RulesyncConfig, ToolId};
use rulesync_sync::{import, ImportOptions};

use super::ensure_success;
use crate::output::format::format_report;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct ImportArgs {
    /// Tool to import from
    #[arg(long)]
    pub from: ToolId,

    /// Features to import: rules, commands, subagents or `*` (default: all)
    #[arg(long, value_delimiter = ',')]
    pub features: Vec<FeatureSelector>,

    /// Accept frontmatter that does not match the tool's schema
    #[arg(long)]
    pub no_validate: bool,
}

pub fn run(args: &ImportArgs, root: &Path, format: OutputFormat) -> Result<()> {
    let config = RulesyncConfig::load(&LocalFs, root).context("Failed to load rulesync.json")?;

    let features = if args.features.is_empty() {
        FeatureKind::ALL.to_vec()
    } else {
        FeatureSelector::expand(&args.features)
    };

    let options = ImportOptions {
        tool: args.from,
        features,
        validate: config.validate && !args.no_validate,
    };

    let report = import(&LocalFs, root, &options)
        .with_context(|| format!("Failed to import from {}", args.from))?;

    if report.written.is_empty() && report.failures.is_empty() {
        println!("No {} files found to import.", args.from);
        return Ok(());
    }

    println!("{}", format_report(&report, "Imported", format));
    ensure_success(&report)
}
