use std::path::Path;

use anyhow::{Context, Result};
use rulesync_core::{FileStore, LocalFs, RulesyncConfig};

use crate::output::OutputFormat;

pub fn run(root: &Path, format: OutputFormat) -> Result<()> {
    let config = RulesyncConfig::load(&LocalFs, root).context("Failed to load rulesync.json")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => {
            let path = RulesyncConfig::path(root);
            let source = if LocalFs.exists(&path) {
                path.display().to_string()
            } else {
                "defaults (no rulesync.json)".to_string()
            };
            let join = |items: Vec<String>| items.join(", ");

            println!("Source:    {source}");
            println!(
                "Tools:     {}",
                join(config.enabled_tools().iter().map(ToString::to_string).collect())
            );
            println!(
                "Features:  {}",
                join(config.enabled_features().iter().map(ToString::to_string).collect())
            );
            println!(
                "Base dirs: {}",
                join(config.base_dirs.iter().map(|d| d.display().to_string()).collect())
            );
            println!("Delete:    {}", config.delete);
            println!("Validate:  {}", config.validate);
        }
    }
    Ok(())
}
