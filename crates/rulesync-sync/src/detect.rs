use std::path::Path;

use rulesync_core::registry;
use rulesync_core::store::resolve;
use rulesync_core::{FeatureKind, FileStore, ToolId};
use serde::Serialize;

use crate::error::SyncError;

/// A tool with at least one file present in the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedTool {
    pub tool: ToolId,
    /// Kinds with files on disk, and how many of each.
    pub kinds: Vec<(FeatureKind, usize)>,
}

impl DetectedTool {
    pub fn description(&self) -> String {
        let kinds: Vec<String> = self
            .kinds
            .iter()
            .map(|(kind, count)| format!("{count} {kind}"))
            .collect();
        format!("{}: {}", self.tool, kinds.join(", "))
    }
}

/// Find which tools already have rules, commands or subagents under
/// `base_dir`.
pub fn detect_tools(store: &dyn FileStore, base_dir: &Path) -> Result<Vec<DetectedTool>, SyncError> {
    let mut detected = Vec::new();

    for tool in ToolId::ALL {
        let mut kinds = Vec::new();
        for kind in FeatureKind::ALL {
            let Some(config) = registry::lookup(tool, kind) else {
                continue;
            };

            let mut count = 0;
            if let Some((dir, file)) = config.root_location() {
                if store.exists(&resolve(base_dir, &dir, &file)) {
                    count += 1;
                }
            }
            for dir in config.readable_dirs() {
                count += store
                    .list_files(&base_dir.join(dir), config.extension, true)?
                    .len();
            }

            if count > 0 {
                kinds.push((kind, count));
            }
        }

        if !kinds.is_empty() {
            detected.push(DetectedTool { tool, kinds });
        }
    }

    Ok(detected)
}
