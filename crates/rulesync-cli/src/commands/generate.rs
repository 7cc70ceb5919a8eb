use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use rulesync_core::model::FeatureSelector;
use rulesync_core::{LocalFs, RulesyncConfig, Target};
use rulesync_sync::{generate_all, GenerateOptions};

use super::{ensure_success, output_dir};
use crate::output::format::format_report;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct GenerateArgs {
    /// Tools to generate for, comma-separated or `*` (default: from rulesync.json)
    #[arg(long, value_delimiter = ',')]
    pub targets: Vec<Target>,

    /// Features to generate: rules, commands, subagents or `*`
    #[arg(long, value_delimiter = ',')]
    pub features: Vec<FeatureSelector>,

    /// Remove existing tool files before writing
    #[arg(long)]
    pub delete: bool,

    /// Directory to write tool files into, relative to the root (repeatable)
    #[arg(long = "base-dir")]
    pub base_dirs: Vec<PathBuf>,

    /// Accept frontmatter that does not match the schemas
    #[arg(long)]
    pub no_validate: bool,
}

impl GenerateArgs {
    /// Command-line values win over the config file.
    fn apply(&self, config: &mut RulesyncConfig) {
        if !self.targets.is_empty() {
            config.targets = self.targets.clone();
        }
        if !self.features.is_empty() {
            config.features = self.features.clone();
        }
        if !self.base_dirs.is_empty() {
            config.base_dirs = self.base_dirs.clone();
        }
        config.delete |= self.delete;
        config.validate &= !self.no_validate;
    }
}

pub fn run(args: &GenerateArgs, root: &Path, format: OutputFormat) -> Result<()> {
    let mut config =
        RulesyncConfig::load(&LocalFs, root).context("Failed to load rulesync.json")?;
    args.apply(&mut config);

    let options = GenerateOptions::from_config(&config);
    if options.tools.is_empty() {
        anyhow::bail!("No target tools selected. Use --targets or set `targets` in rulesync.json.");
    }
    if options.features.is_empty() {
        anyhow::bail!("No features selected. Use --features or set `features` in rulesync.json.");
    }

    let outputs: Vec<PathBuf> = config
        .base_dirs
        .iter()
        .map(|base_dir| output_dir(root, base_dir))
        .collect();
    tracing::info!("Generating into {} base dir(s)", outputs.len());
    let report = generate_all(&LocalFs, root, &outputs, &options)
        .context("Failed to generate tool files")?;

    println!("{}", format_report(&report, "Generated", format));
    ensure_success(&report)
}
