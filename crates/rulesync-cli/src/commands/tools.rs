use std::path::Path;

use anyhow::{Context, Result};
use rulesync_core::{registry, LocalFs};
use rulesync_sync::detect_tools;

use crate::output::OutputFormat;

pub fn run(root: &Path, format: OutputFormat) -> Result<()> {
    let detected = detect_tools(&LocalFs, root).context("Failed to scan for tool files")?;

    match format {
        OutputFormat::Json => {
            let supported: Vec<_> = registry::all()
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "tool": c.tool,
                        "feature": c.kind,
                        "dir": c.settable_dir,
                        "readDirs": c.readable_dirs().collect::<Vec<_>>(),
                        "rootFile": c.root_file,
                        "extension": c.extension,
                    })
                })
                .collect();
            let out = serde_json::json!({
                "supported": supported,
                "detected": detected,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("Supported tools:");
            for c in registry::all() {
                let mut line = format!(
                    "  {:<11} {:<10} {}",
                    c.tool.as_str(),
                    c.kind.as_str(),
                    c.settable_dir
                );
                if let Some(root_file) = c.root_file {
                    line.push_str(&format!(" (root: {root_file})"));
                }
                for legacy in c.legacy_dirs {
                    line.push_str(&format!(" (also reads {legacy})"));
                }
                println!("{line}");
            }
            println!();
            if detected.is_empty() {
                println!("No tool files found in {}.", root.display());
            } else {
                println!("Found in {}:", root.display());
                for d in &detected {
                    println!("  - {}", d.description());
                }
            }
        }
    }
    Ok(())
}
