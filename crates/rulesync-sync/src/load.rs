use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rulesync_core::registry::{canonical_dir, canonical_legacy_dirs, ToolConfig, CANONICAL_EXTENSION};
use rulesync_core::store::resolve;
use rulesync_core::{CanonicalRecord, FeatureKind, FileStore, ToolArtifact};

use crate::error::SyncError;
use crate::report::FileFailure;

/// Everything that parsed, plus a failure entry for each file that did not.
#[derive(Debug)]
pub struct Loaded<T> {
    pub items: Vec<T>,
    pub failures: Vec<FileFailure>,
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> Loaded<T> {
    fn fail(&mut self, path: PathBuf, error: &rulesync_core::CoreError) {
        tracing::warn!("Skipping {}: {error}", path.display());
        self.failures.push(FileFailure::new(path, error));
    }
}

/// Parse every canonical file of `kind` under `root`.
///
/// The current directory is read recursively, legacy directories only at
/// their top level. A file name already seen in an earlier directory
/// shadows later ones.
pub fn load_canonical(
    store: &dyn FileStore,
    root: &Path,
    kind: FeatureKind,
    validate: bool,
) -> Result<Loaded<CanonicalRecord>, SyncError> {
    let dirs = std::iter::once((canonical_dir(kind), true))
        .chain(canonical_legacy_dirs(kind).iter().map(|d| (*d, false)));

    let mut loaded = Loaded::default();
    let mut seen = BTreeSet::new();

    for (dir, recursive) in dirs {
        let files = store.list_files(&root.join(dir), CANONICAL_EXTENSION, recursive)?;
        for file in files {
            if !seen.insert(file.clone()) {
                tracing::warn!(
                    "Ignoring {} in {dir}: shadowed by {}",
                    file.display(),
                    canonical_dir(kind)
                );
                continue;
            }
            match CanonicalRecord::from_file_in(store, root, kind, Path::new(dir), &file, validate)
            {
                Ok(record) => loaded.items.push(record),
                Err(e) => loaded.fail(resolve(root, Path::new(dir), &file), &e),
            }
        }
    }

    tracing::info!(
        "Loaded {} canonical {kind} ({} failed)",
        loaded.items.len(),
        loaded.failures.len()
    );
    Ok(loaded)
}

/// Parse every file `config`'s tool has for its kind under `base_dir`,
/// including the root file when present.
pub fn load_tool_artifacts(
    store: &dyn FileStore,
    base_dir: &Path,
    config: &ToolConfig,
    validate: bool,
) -> Result<Loaded<ToolArtifact>, SyncError> {
    let mut loaded = Loaded::default();

    if let Some((dir, file)) = config.root_location() {
        let path = resolve(base_dir, &dir, &file);
        if store.exists(&path) {
            match ToolArtifact::from_root_file(store, config, base_dir, validate) {
                Ok(artifact) => loaded.items.push(artifact),
                Err(e) => loaded.fail(path, &e),
            }
        }
    }

    let mut seen = BTreeSet::new();
    for dir in config.readable_dirs() {
        let files = store.list_files(&base_dir.join(dir), config.extension, true)?;
        for file in files {
            if !seen.insert(file.clone()) {
                tracing::warn!("Ignoring {} in {dir}: already read", file.display());
                continue;
            }
            match ToolArtifact::from_file_in(store, config, base_dir, Path::new(dir), &file, validate)
            {
                Ok(artifact) => loaded.items.push(artifact),
                Err(e) => loaded.fail(resolve(base_dir, Path::new(dir), &file), &e),
            }
        }
    }

    tracing::info!(
        "Loaded {} {} {} file(s) ({} failed)",
        loaded.items.len(),
        config.tool,
        config.kind,
        loaded.failures.len()
    );
    Ok(loaded)
}
