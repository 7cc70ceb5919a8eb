use std::collections::BTreeSet;
use std::path::Path;

use rulesync_core::registry;
use rulesync_core::{CoreError, FeatureKind, FileStore, ToolId};

use crate::error::SyncError;
use crate::load::load_tool_artifacts;
use crate::report::SyncReport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub tool: ToolId,
    pub features: Vec<FeatureKind>,
    pub validate: bool,
}

/// Read `options.tool`'s files under `project_root` and write them as
/// canonical files under `.rulesync/`.
///
/// Imported records target every tool. Existing canonical files with the
/// same name are overwritten, but two tool files that map to the same
/// canonical file in one run are a failure for the later one. The root
/// file is read first, so it wins over a plain `overview` rule.
pub fn import(
    store: &dyn FileStore,
    project_root: &Path,
    options: &ImportOptions,
) -> Result<SyncReport, SyncError> {
    let mut report = SyncReport::default();

    for &kind in &options.features {
        let Some(config) = registry::lookup(options.tool, kind) else {
            tracing::debug!("{} has no {kind}, skipping", options.tool);
            continue;
        };

        let loaded = load_tool_artifacts(store, project_root, config, options.validate)?;
        report.failures.extend(loaded.failures);

        let mut claimed = BTreeSet::new();
        for artifact in &loaded.items {
            let record = match artifact.to_canonical() {
                Ok(record) => record,
                Err(e) => {
                    report.fail(artifact.path(), &e);
                    continue;
                }
            };

            let target = record.path(project_root);
            if !claimed.insert(target.clone()) {
                let err = CoreError::Config(format!(
                    "{} was already imported from another {} file",
                    target.display(),
                    options.tool
                ));
                report.fail(artifact.path(), &err);
                continue;
            }

            match record.write(store, project_root) {
                Ok(path) => {
                    tracing::debug!("Imported {} as {}", artifact.path().display(), path.display());
                    report.written.push(path);
                }
                Err(e) => report.fail(artifact.path(), &e),
            }
        }
    }

    tracing::info!(
        "Imported {} file(s) from {} ({} failed)",
        report.written.len(),
        options.tool,
        report.failures.len()
    );
    Ok(report)
}
