pub mod config;
pub mod generate;
pub mod import;
pub mod init;
pub mod tools;

use std::path::{Path, PathBuf};

use clap::Subcommand;
use rulesync_sync::SyncReport;

#[derive(Subcommand)]
pub enum Commands {
    /// Create .rulesync/ with a sample rule and a default rulesync.json
    Init(init::InitArgs),
    /// Write tool files from the canonical files in .rulesync/
    Generate(generate::GenerateArgs),
    /// Convert one tool's files into canonical files in .rulesync/
    Import(import::ImportArgs),
    /// List supported tools and the ones present in this project
    Tools,
    /// Print the effective configuration
    Config,
}

/// Resolve a configured base directory against the project root.
pub fn output_dir(root: &Path, base_dir: &Path) -> PathBuf {
    if base_dir == Path::new(".") {
        root.to_path_buf()
    } else {
        root.join(base_dir)
    }
}

/// Turn per-file failures into a non-zero exit once the report is printed.
pub fn ensure_success(report: &SyncReport) -> anyhow::Result<()> {
    if !report.is_success() {
        anyhow::bail!("{} file(s) failed", report.failures.len());
    }
    Ok(())
}
