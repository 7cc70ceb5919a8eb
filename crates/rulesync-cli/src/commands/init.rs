use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use rulesync_core::registry::canonical_dir;
use rulesync_core::{
    CanonicalFrontmatter, CanonicalRecord, FeatureKind, FileStore, LocalFs, RulesyncConfig, Target,
};

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing rulesync.json and sample rule
    #[arg(long)]
    pub force: bool,
}

const SAMPLE_RULE_BODY: &str = "\
# Project Overview

Describe the project, its layout and how to build and test it here.
Every assistant targeted by this rule receives it as its root instructions.
";

pub fn run(args: &InitArgs, root: &Path) -> Result<()> {
    let store = LocalFs;

    for kind in FeatureKind::ALL {
        let dir = root.join(canonical_dir(kind));
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let sample = CanonicalRecord::new(
        FeatureKind::Rules,
        "overview.md",
        CanonicalFrontmatter::new("Project overview and general development guidelines")
            .with_targets([Target::Wildcard])
            .with_field("root", true),
        SAMPLE_RULE_BODY,
    )
    .context("Failed to build sample rule")?;

    let sample_path = sample.path(root);
    if store.exists(&sample_path) && !args.force {
        println!("Skipped {} (already exists)", sample_path.display());
    } else {
        sample
            .write(&store, root)
            .context("Failed to write sample rule")?;
        println!("Created {}", sample_path.display());
    }

    let config_path = RulesyncConfig::path(root);
    if store.exists(&config_path) && !args.force {
        println!("Skipped {} (already exists)", config_path.display());
    } else {
        RulesyncConfig::default()
            .save(&store, root)
            .context("Failed to write rulesync.json")?;
        println!("Created {}", config_path.display());
    }

    println!();
    println!("Next steps:");
    println!("  Edit .rulesync/rules/overview.md         Describe your project");
    println!("  rulesync import --from claudecode        Pull in existing tool files");
    println!("  rulesync generate                        Write files for every tool");
    Ok(())
}
