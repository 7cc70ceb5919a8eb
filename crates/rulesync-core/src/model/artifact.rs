use std::path::{Path, PathBuf};

use crate::convert;
use crate::error::CoreError;
use crate::frontmatter::{parse_bytes, serialize, Frontmatter};
use crate::model::{CanonicalRecord, FeatureKind, ToolId};
use crate::registry::ToolConfig;
use crate::store::{resolve, FileStore};

/// One rule, command or subagent file in a tool's own layout.
///
/// The directory is never chosen by the caller: it is the tool's settable
/// directory, or the directory of its root file for root rules.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolArtifact {
    tool: ToolId,
    kind: FeatureKind,
    base_dir: PathBuf,
    relative_dir_path: PathBuf,
    relative_file_path: PathBuf,
    frontmatter: Frontmatter,
    body: String,
    root: bool,
}

impl ToolArtifact {
    /// Build an artifact from explicit fields.
    pub fn new(
        config: &ToolConfig,
        base_dir: impl Into<PathBuf>,
        relative_file_path: impl Into<PathBuf>,
        frontmatter: Frontmatter,
        body: impl Into<String>,
        validate: bool,
    ) -> Result<Self, CoreError> {
        let mut artifact = Self {
            tool: config.tool,
            kind: config.kind,
            base_dir: base_dir.into(),
            relative_dir_path: PathBuf::from(config.settable_dir),
            relative_file_path: relative_file_path.into(),
            frontmatter,
            body: body.into(),
            root: false,
        };
        if validate {
            artifact.validate(config)?;
        }
        Ok(artifact)
    }

    /// Build the tool's root instruction file (e.g. `CLAUDE.md`).
    pub fn new_root(
        config: &ToolConfig,
        base_dir: impl Into<PathBuf>,
        frontmatter: Frontmatter,
        body: impl Into<String>,
        validate: bool,
    ) -> Result<Self, CoreError> {
        let (dir, file) = config.root_location().ok_or(CoreError::UnsupportedFeature {
            tool: config.tool,
            kind: config.kind,
        })?;
        let mut artifact = Self::new(config, base_dir, file, frontmatter, body, false)?;
        artifact.relative_dir_path = dir;
        artifact.root = true;
        if validate {
            artifact.validate(config)?;
        }
        Ok(artifact)
    }

    /// Read `<base_dir>/<settable_dir>/<relative_file_path>`.
    pub fn from_file(
        store: &dyn FileStore,
        config: &ToolConfig,
        base_dir: &Path,
        relative_file_path: &Path,
        validate: bool,
    ) -> Result<Self, CoreError> {
        Self::from_file_in(
            store,
            config,
            base_dir,
            Path::new(config.settable_dir),
            relative_file_path,
            validate,
        )
    }

    /// Read from any of the tool's readable directories.
    pub fn from_file_in(
        store: &dyn FileStore,
        config: &ToolConfig,
        base_dir: &Path,
        relative_dir: &Path,
        relative_file_path: &Path,
        validate: bool,
    ) -> Result<Self, CoreError> {
        if !config.readable_dirs().any(|d| Path::new(d) == relative_dir) {
            return Err(CoreError::Config(format!(
                "{} is not a {} directory for {}",
                relative_dir.display(),
                config.kind,
                config.tool
            )));
        }
        let path = resolve(base_dir, relative_dir, relative_file_path);
        let (frontmatter, body) = read_document(store, &path)?;
        tracing::debug!("Parsed {} {} file {}", config.tool, config.kind, path.display());
        Self::new(config, base_dir, relative_file_path, frontmatter, body, validate)
            .map_err(|e| with_path(e, &path))
    }

    /// Read the tool's root instruction file.
    pub fn from_root_file(
        store: &dyn FileStore,
        config: &ToolConfig,
        base_dir: &Path,
        validate: bool,
    ) -> Result<Self, CoreError> {
        let (dir, file) = config.root_location().ok_or(CoreError::UnsupportedFeature {
            tool: config.tool,
            kind: config.kind,
        })?;
        let path = resolve(base_dir, &dir, &file);
        let (frontmatter, body) = read_document(store, &path)?;
        Self::new_root(config, base_dir, frontmatter, body, validate)
            .map_err(|e| with_path(e, &path))
    }

    /// Convert a canonical record into this tool's layout.
    pub fn from_canonical(
        config: &ToolConfig,
        base_dir: &Path,
        record: &CanonicalRecord,
        validate: bool,
    ) -> Result<Self, CoreError> {
        convert::from_canonical(config, base_dir, record, validate)
    }

    /// Convert back to a canonical record. Targets become `["*"]`: a single
    /// tool file carries no information about other tools.
    pub fn to_canonical(&self) -> Result<CanonicalRecord, CoreError> {
        convert::to_canonical(self)
    }

    fn validate(&mut self, config: &ToolConfig) -> Result<(), CoreError> {
        match config.schema.validate(&self.frontmatter) {
            Ok(normalized) => {
                self.frontmatter = normalized;
                Ok(())
            }
            Err(source) => Err(CoreError::Validation {
                path: self.relative_path(),
                source,
            }),
        }
    }

    pub fn tool(&self) -> ToolId {
        self.tool
    }

    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn relative_dir_path(&self) -> &Path {
        &self.relative_dir_path
    }

    pub fn relative_file_path(&self) -> &Path {
        &self.relative_file_path
    }

    pub fn frontmatter(&self) -> &Frontmatter {
        &self.frontmatter
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_root(&self) -> bool {
        self.root
    }

    /// Path relative to the base directory.
    pub fn relative_path(&self) -> PathBuf {
        resolve(Path::new(""), &self.relative_dir_path, &self.relative_file_path)
    }

    pub fn path(&self) -> PathBuf {
        resolve(&self.base_dir, &self.relative_dir_path, &self.relative_file_path)
    }

    pub fn file_content(&self) -> Result<String, CoreError> {
        serialize(&self.frontmatter, &self.body).map_err(|source| CoreError::Parse {
            path: self.path(),
            source,
        })
    }

    pub fn write(&self, store: &dyn FileStore) -> Result<PathBuf, CoreError> {
        let path = self.path();
        store.write(&path, &self.file_content()?)?;
        Ok(path)
    }
}

fn read_document(store: &dyn FileStore, path: &Path) -> Result<(Frontmatter, String), CoreError> {
    let bytes = store.read(path)?;
    let doc = parse_bytes(&bytes).map_err(|source| CoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((doc.frontmatter, doc.body))
}

/// Replace the relative path in a validation error with the full one.
fn with_path(err: CoreError, path: &Path) -> CoreError {
    match err {
        CoreError::Validation { source, .. } => CoreError::Validation {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;
    use crate::store::LocalFs;
    use serde_yaml::Value;
    use tempfile::TempDir;

    fn config(tool: ToolId, kind: FeatureKind) -> &'static ToolConfig {
        registry::lookup(tool, kind).unwrap()
    }

    #[test]
    fn test_from_file_reads_settable_dir() {
        let tmp = TempDir::new().unwrap();
        LocalFs
            .write(
                &tmp.path().join(".claude/commands/deploy.md"),
                "---\ndescription: Deploy the app\nallowed-tools: Bash\n---\n\nRun the deploy script.\n",
            )
            .unwrap();

        let artifact = ToolArtifact::from_file(
            &LocalFs,
            config(ToolId::ClaudeCode, FeatureKind::Commands),
            tmp.path(),
            Path::new("deploy.md"),
            true,
        )
        .unwrap();

        assert_eq!(artifact.relative_dir_path(), Path::new(".claude/commands"));
        assert_eq!(artifact.body(), "Run the deploy script.\n");
        assert_eq!(
            artifact.frontmatter().get("allowed-tools"),
            Some(&Value::from("Bash"))
        );
        assert_eq!(artifact.path(), tmp.path().join(".claude/commands/deploy.md"));
    }

    #[test]
    fn test_from_file_missing_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = ToolArtifact::from_file(
            &LocalFs,
            config(ToolId::Cursor, FeatureKind::Commands),
            tmp.path(),
            Path::new("ghost.md"),
            true,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn test_from_file_validation_failure_carries_full_path() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join(".roo/commands/x.md");
        LocalFs.write(&file, "---\nmode: code\n---\n\nBody").unwrap();

        let cfg = config(ToolId::Roo, FeatureKind::Commands);
        let err = ToolArtifact::from_file(&LocalFs, cfg, tmp.path(), Path::new("x.md"), true)
            .unwrap_err();
        match err {
            CoreError::Validation { path, source } => {
                assert_eq!(path, file);
                assert_eq!(source.fields().collect::<Vec<_>>(), vec!["description"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        // Same file is accepted when validation is off
        let artifact =
            ToolArtifact::from_file(&LocalFs, cfg, tmp.path(), Path::new("x.md"), false).unwrap();
        assert_eq!(artifact.body(), "Body");
    }

    #[test]
    fn test_from_file_in_legacy_dir_normalizes_location() {
        let tmp = TempDir::new().unwrap();
        LocalFs
            .write(
                &tmp.path().join(".codex/prompts/fix.md"),
                "---\ndescription: Fix the bug\n---\n\nFind it and fix it.",
            )
            .unwrap();

        let cfg = config(ToolId::CodexCli, FeatureKind::Commands);
        let artifact = ToolArtifact::from_file_in(
            &LocalFs,
            cfg,
            tmp.path(),
            Path::new(".codex/prompts"),
            Path::new("fix.md"),
            true,
        )
        .unwrap();
        assert_eq!(artifact.relative_dir_path(), Path::new(".codex/commands"));
    }

    #[test]
    fn test_from_file_in_rejects_foreign_dir() {
        let tmp = TempDir::new().unwrap();
        let err = ToolArtifact::from_file_in(
            &LocalFs,
            config(ToolId::CodexCli, FeatureKind::Commands),
            tmp.path(),
            Path::new(".claude/commands"),
            Path::new("fix.md"),
            true,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn test_root_file_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let cfg = config(ToolId::Copilot, FeatureKind::Rules);
        let mut fm = Frontmatter::new();
        fm.insert(Value::from("description"), Value::from("Project overview"));

        let artifact = ToolArtifact::new_root(cfg, tmp.path(), fm, "# Overview\n", true).unwrap();
        assert!(artifact.is_root());
        assert_eq!(
            artifact.relative_path(),
            PathBuf::from(".github/copilot-instructions.md")
        );
        artifact.write(&LocalFs).unwrap();

        let read = ToolArtifact::from_root_file(&LocalFs, cfg, tmp.path(), true).unwrap();
        assert_eq!(read, artifact);
    }

    #[test]
    fn test_root_file_unsupported() {
        let tmp = TempDir::new().unwrap();
        let err = ToolArtifact::from_root_file(
            &LocalFs,
            config(ToolId::Roo, FeatureKind::Rules),
            tmp.path(),
            true,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedFeature { .. }));
    }
}
