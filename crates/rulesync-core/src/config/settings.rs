use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{FeatureKind, FeatureSelector, Target, ToolId};
use crate::store::FileStore;

/// Project settings read from `rulesync.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RulesyncConfig {
    #[serde(default = "default_targets")]
    pub targets: Vec<Target>,
    #[serde(default = "default_features")]
    pub features: Vec<FeatureSelector>,
    /// Directories, relative to the project root, that get tool files.
    #[serde(default = "default_base_dirs")]
    pub base_dirs: Vec<PathBuf>,
    /// Remove existing tool files before generating.
    #[serde(default)]
    pub delete: bool,
    #[serde(default = "default_validate")]
    pub validate: bool,
}

fn default_targets() -> Vec<Target> {
    vec![Target::Wildcard]
}

fn default_features() -> Vec<FeatureSelector> {
    vec![FeatureSelector::All]
}

fn default_base_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from(".")]
}

fn default_validate() -> bool {
    true
}

impl Default for RulesyncConfig {
    fn default() -> Self {
        Self {
            targets: default_targets(),
            features: default_features(),
            base_dirs: default_base_dirs(),
            delete: false,
            validate: default_validate(),
        }
    }
}

impl RulesyncConfig {
    pub const FILE_NAME: &'static str = "rulesync.json";

    pub fn path(project_root: &Path) -> PathBuf {
        project_root.join(Self::FILE_NAME)
    }

    /// Read `rulesync.json` from the project root, falling back to defaults
    /// when the file does not exist.
    pub fn load(store: &dyn FileStore, project_root: &Path) -> Result<Self, CoreError> {
        let path = Self::path(project_root);
        let bytes = match store.read(&path) {
            Ok(bytes) => bytes,
            Err(CoreError::NotFound { .. }) => {
                tracing::debug!("No {} found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };
        serde_json::from_slice(&bytes)
            .map_err(|e| CoreError::Config(format!("{}: {e}", path.display())))
    }

    pub fn save(&self, store: &dyn FileStore, project_root: &Path) -> Result<(), CoreError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        store.write(&Self::path(project_root), &json)
    }

    /// Tools selected by `targets`, in registry order.
    pub fn enabled_tools(&self) -> Vec<ToolId> {
        ToolId::ALL
            .into_iter()
            .filter(|tool| self.targets.iter().any(|t| t.matches(*tool)))
            .collect()
    }

    pub fn enabled_features(&self) -> Vec<FeatureKind> {
        FeatureSelector::expand(&self.features)
    }
}
