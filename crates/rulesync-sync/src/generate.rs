use std::path::{Path, PathBuf};

use rulesync_core::registry::{self, ToolConfig, CANONICAL_ROOT};
use rulesync_core::store::resolve;
use rulesync_core::{
    is_targeted_by, CanonicalRecord, CoreError, FeatureKind, FileStore, RulesyncConfig,
    ToolArtifact, ToolId,
};

use crate::error::SyncError;
use crate::load::load_canonical;
use crate::report::SyncReport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub tools: Vec<ToolId>,
    pub features: Vec<FeatureKind>,
    /// Remove the tool's existing files before writing.
    pub delete: bool,
    pub validate: bool,
}

impl GenerateOptions {
    pub fn from_config(config: &RulesyncConfig) -> Self {
        Self {
            tools: config.enabled_tools(),
            features: config.enabled_features(),
            delete: config.delete,
            validate: config.validate,
        }
    }
}

/// Write tool files under `output_dir` from the canonical files under
/// `source_root`.
pub fn generate(
    store: &dyn FileStore,
    source_root: &Path,
    output_dir: &Path,
    options: &GenerateOptions,
) -> Result<SyncReport, SyncError> {
    generate_all(store, source_root, &[output_dir.to_path_buf()], options)
}

/// Write tool files under each of `output_dirs` from the canonical files
/// under `source_root`.
///
/// Every enabled feature is loaded once and fanned out to each output
/// directory and each enabled tool that supports it. A canonical file that
/// fails to load is reported once, however many outputs there are.
pub fn generate_all(
    store: &dyn FileStore,
    source_root: &Path,
    output_dirs: &[PathBuf],
    options: &GenerateOptions,
) -> Result<SyncReport, SyncError> {
    if !store.exists(&source_root.join(CANONICAL_ROOT)) {
        return Err(SyncError::NotInitialized(source_root.to_path_buf()));
    }

    let mut report = SyncReport::default();

    for &kind in &options.features {
        let loaded = load_canonical(store, source_root, kind, options.validate)?;
        report.failures.extend(loaded.failures);

        for output_dir in output_dirs {
            for &tool in &options.tools {
                let Some(config) = registry::lookup(tool, kind) else {
                    tracing::debug!("{tool} has no {kind}, skipping");
                    continue;
                };

                if options.delete {
                    remove_existing(store, output_dir, config, &mut report)?;
                }

                let targeted = loaded.items.iter().filter(|r| is_targeted_by(r, tool));
                write_tool(store, source_root, output_dir, config, targeted, options, &mut report);
            }
        }
    }

    tracing::info!(
        "Generated {} file(s) in {} director{} ({} failed)",
        report.written.len(),
        output_dirs.len(),
        if output_dirs.len() == 1 { "y" } else { "ies" },
        report.failures.len()
    );
    Ok(report)
}

fn write_tool<'a>(
    store: &dyn FileStore,
    source_root: &Path,
    output_dir: &Path,
    config: &ToolConfig,
    records: impl Iterator<Item = &'a CanonicalRecord>,
    options: &GenerateOptions,
    report: &mut SyncReport,
) {
    let mut root_source: Option<PathBuf> = None;

    for record in records {
        let source = record.path(source_root);
        let artifact =
            match ToolArtifact::from_canonical(config, output_dir, record, options.validate) {
                Ok(artifact) => artifact,
                Err(e) => {
                    report.fail(&source, &e);
                    continue;
                }
            };

        if artifact.is_root() {
            if let Some(first) = &root_source {
                let err = CoreError::Config(format!(
                    "{} already has a root rule from {}",
                    config.tool,
                    first.display()
                ));
                report.fail(&source, &err);
                continue;
            }
            root_source = Some(source.clone());
        }

        match artifact.write(store) {
            Ok(path) => {
                tracing::debug!("Wrote {} from {}", path.display(), source.display());
                report.written.push(path);
            }
            Err(e) => report.fail(artifact.path(), &e),
        }
    }
}

/// Delete the tool's generated files: everything in its settable directory
/// with its extension, plus its root file. Legacy directories are left alone.
fn remove_existing(
    store: &dyn FileStore,
    output_dir: &Path,
    config: &ToolConfig,
    report: &mut SyncReport,
) -> Result<(), SyncError> {
    let dir = Path::new(config.settable_dir);
    let mut paths: Vec<PathBuf> = store
        .list_files(&output_dir.join(dir), config.extension, true)?
        .into_iter()
        .map(|file| resolve(output_dir, dir, &file))
        .collect();

    if let Some((root_dir, root_file)) = config.root_location() {
        let path = resolve(output_dir, &root_dir, &root_file);
        if store.exists(&path) {
            paths.push(path);
        }
    }

    for path in paths {
        match store.remove(&path) {
            Ok(()) => {
                tracing::debug!("Removed {}", path.display());
                report.removed.push(path);
            }
            Err(e) => report.fail(&path, &e),
        }
    }
    Ok(())
}
