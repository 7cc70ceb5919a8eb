use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::error::CoreError;
use crate::frontmatter::{parse_bytes, serialize, Frontmatter};
use crate::model::{FeatureKind, Target};
use crate::registry::{canonical_dir, canonical_schema};
use crate::store::{resolve, FileStore};

const TARGETS_KEY: &str = "targets";
const DESCRIPTION_KEY: &str = "description";

/// Frontmatter of a canonical record.
///
/// `targets` and `description` are typed; kind-specific keys (`root`,
/// `globs`, `name`) and anything unrecognized live in `fields`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanonicalFrontmatter {
    /// `None` means every tool is targeted.
    pub targets: Option<Vec<Target>>,
    pub description: String,
    pub fields: Frontmatter,
}

impl CanonicalFrontmatter {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            targets: None,
            description: description.into(),
            fields: Frontmatter::new(),
        }
    }

    pub fn with_targets(mut self, targets: impl IntoIterator<Item = Target>) -> Self {
        self.targets = Some(targets.into_iter().collect());
        self
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(Value::from(key), value.into());
        self
    }

    /// Whether this rule is the project's root instruction file.
    pub fn root(&self) -> bool {
        self.fields
            .get("root")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    pub fn globs(&self) -> Vec<String> {
        match self.fields.get("globs") {
            Some(Value::Sequence(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(s)) => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    /// Flatten into a mapping: `targets`, `description`, then `fields`.
    pub fn to_mapping(&self) -> Frontmatter {
        let mut mapping = Frontmatter::new();
        if let Some(targets) = &self.targets {
            mapping.insert(
                Value::from(TARGETS_KEY),
                Value::Sequence(targets.iter().map(|t| Value::from(t.to_string())).collect()),
            );
        }
        mapping.insert(
            Value::from(DESCRIPTION_KEY),
            Value::from(self.description.as_str()),
        );
        for (key, value) in &self.fields {
            mapping.insert(key.clone(), value.clone());
        }
        mapping
    }

    /// Build from a parsed mapping. Unparseable targets are skipped with a
    /// warning, a
    /// missing description becomes empty; run schema validation first
    /// when those cases must be rejected.
    pub fn from_mapping(mapping: &Frontmatter) -> Self {
        let targets = match mapping.get(TARGETS_KEY) {
            Some(Value::Sequence(items)) => {
                Some(items.iter().filter_map(parse_target).collect())
            }
            Some(value @ Value::String(_)) => Some(parse_target(value).into_iter().collect()),
            _ => None,
        };

        let description = mapping
            .get(DESCRIPTION_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let fields = mapping
            .iter()
            .filter(|(k, _)| {
                !matches!(k.as_str(), Some(TARGETS_KEY) | Some(DESCRIPTION_KEY))
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self {
            targets,
            description,
            fields,
        }
    }
}

fn parse_target(value: &Value) -> Option<Target> {
    let parsed = value.as_str().and_then(|s| s.parse::<Target>().ok());
    if parsed.is_none() {
        tracing::warn!("Ignoring unknown target {value:?}");
    }
    parsed
}

/// A tool-agnostic rule, command or subagent stored under `.rulesync/`.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    kind: FeatureKind,
    relative_dir_path: PathBuf,
    relative_file_path: PathBuf,
    frontmatter: CanonicalFrontmatter,
    body: String,
    file_content: String,
}

impl CanonicalRecord {
    /// Build a record from explicit fields, validating the frontmatter
    /// against the kind's canonical schema.
    pub fn new(
        kind: FeatureKind,
        relative_file_path: impl Into<PathBuf>,
        frontmatter: CanonicalFrontmatter,
        body: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let relative_file_path = relative_file_path.into();
        let path = Path::new(canonical_dir(kind)).join(&relative_file_path);
        canonical_schema(kind)
            .validate(&frontmatter.to_mapping())
            .map_err(|source| CoreError::Validation { path, source })?;
        Self::from_parts(kind, relative_file_path, frontmatter, body.into())
    }

    /// Read `<base_dir>/.rulesync/<kind>/<relative_file_path>`.
    pub fn from_file(
        store: &dyn FileStore,
        base_dir: &Path,
        kind: FeatureKind,
        relative_file_path: &Path,
        validate: bool,
    ) -> Result<Self, CoreError> {
        Self::from_file_in(
            store,
            base_dir,
            kind,
            Path::new(canonical_dir(kind)),
            relative_file_path,
            validate,
        )
    }

    /// Read a canonical file from `relative_dir`, which may be a legacy
    /// location. The resulting record always belongs to the current
    /// canonical directory.
    pub fn from_file_in(
        store: &dyn FileStore,
        base_dir: &Path,
        kind: FeatureKind,
        relative_dir: &Path,
        relative_file_path: &Path,
        validate: bool,
    ) -> Result<Self, CoreError> {
        let path = resolve(base_dir, relative_dir, relative_file_path);
        let bytes = store.read(&path)?;
        let doc = parse_bytes(&bytes).map_err(|source| CoreError::Parse {
            path: path.clone(),
            source,
        })?;

        let mapping = if validate {
            canonical_schema(kind)
                .validate(&doc.frontmatter)
                .map_err(|source| CoreError::Validation {
                    path: path.clone(),
                    source,
                })?
        } else {
            doc.frontmatter
        };

        tracing::debug!("Parsed canonical {kind} file {}", path.display());
        Self::from_parts(
            kind,
            relative_file_path.to_path_buf(),
            CanonicalFrontmatter::from_mapping(&mapping),
            doc.body,
        )
    }

    fn from_parts(
        kind: FeatureKind,
        relative_file_path: PathBuf,
        frontmatter: CanonicalFrontmatter,
        body: String,
    ) -> Result<Self, CoreError> {
        let relative_dir_path = PathBuf::from(canonical_dir(kind));
        let file_content = serialize(&frontmatter.to_mapping(), &body).map_err(|source| {
            CoreError::Parse {
                path: relative_dir_path.join(&relative_file_path),
                source,
            }
        })?;
        Ok(Self {
            kind,
            relative_dir_path,
            relative_file_path,
            frontmatter,
            body,
            file_content,
        })
    }

    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    pub fn relative_dir_path(&self) -> &Path {
        &self.relative_dir_path
    }

    pub fn relative_file_path(&self) -> &Path {
        &self.relative_file_path
    }

    pub fn frontmatter(&self) -> &CanonicalFrontmatter {
        &self.frontmatter
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Serialized form, always consistent with `frontmatter` and `body`.
    pub fn file_content(&self) -> &str {
        &self.file_content
    }

    pub fn path(&self, base_dir: &Path) -> PathBuf {
        resolve(base_dir, &self.relative_dir_path, &self.relative_file_path)
    }

    pub fn write(&self, store: &dyn FileStore, base_dir: &Path) -> Result<PathBuf, CoreError> {
        let path = self.path(base_dir);
        store.write(&path, &self.file_content)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ToolId;
    use crate::store::LocalFs;
    use tempfile::TempDir;

    #[test]
    fn test_new_generates_file_content() {
        let record = CanonicalRecord::new(
            FeatureKind::Commands,
            "review.md",
            CanonicalFrontmatter::new("Review the diff")
                .with_targets([Target::Tool(ToolId::Cursor), Target::Wildcard]),
            "Look at the staged changes.\n",
        )
        .unwrap();

        assert_eq!(record.relative_dir_path(), Path::new(".rulesync/commands"));
        assert!(record.file_content().starts_with("---\n"));
        assert!(record.file_content().contains("description: Review the diff"));
        assert!(record
            .file_content()
            .ends_with("---\n\nLook at the staged changes.\n"));
    }

    #[test]
    fn test_new_rejects_subagent_without_name() {
        let err = CanonicalRecord::new(
            FeatureKind::Subagents,
            "planner.md",
            CanonicalFrontmatter::new("Plans work"),
            "You plan.",
        )
        .unwrap_err();
        match err {
            CoreError::Validation { source, .. } => {
                assert_eq!(source.fields().collect::<Vec<_>>(), vec!["name"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_file_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let record = CanonicalRecord::new(
            FeatureKind::Rules,
            "style.md",
            CanonicalFrontmatter::new("Code style")
                .with_targets([Target::Tool(ToolId::ClaudeCode)])
                .with_field("globs", Value::Sequence(vec![Value::from("**/*.rs")])),
            "Use rustfmt.\n",
        )
        .unwrap();
        record.write(&LocalFs, tmp.path()).unwrap();

        let read = CanonicalRecord::from_file(
            &LocalFs,
            tmp.path(),
            FeatureKind::Rules,
            Path::new("style.md"),
            true,
        )
        .unwrap();
        assert_eq!(read, record);
        assert_eq!(read.frontmatter().globs(), vec!["**/*.rs"]);
    }

    #[test]
    fn test_from_file_missing() {
        let tmp = TempDir::new().unwrap();
        let err = CanonicalRecord::from_file(
            &LocalFs,
            tmp.path(),
            FeatureKind::Commands,
            Path::new("nope.md"),
            true,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn test_from_file_validation_toggle() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".rulesync/commands/bare.md");
        LocalFs.write(&path, "---\ntargets: [\"*\"]\n---\n\nBody").unwrap();

        let err = CanonicalRecord::from_file(
            &LocalFs,
            tmp.path(),
            FeatureKind::Commands,
            Path::new("bare.md"),
            true,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));

        let lenient = CanonicalRecord::from_file(
            &LocalFs,
            tmp.path(),
            FeatureKind::Commands,
            Path::new("bare.md"),
            false,
        )
        .unwrap();
        assert_eq!(lenient.frontmatter().description, "");
        assert_eq!(lenient.body(), "Body");
    }

    #[test]
    fn test_from_mapping_skips_unknown_targets() {
        let doc = crate::frontmatter::parse("---\ntargets: [cursr, roo]\ndescription: d\n---\n\nB")
            .unwrap();
        let fm = CanonicalFrontmatter::from_mapping(&doc.frontmatter);
        assert_eq!(fm.targets, Some(vec![Target::Tool(ToolId::Roo)]));

        assert_eq!(parse_target(&Value::from("cursr")), None);
        assert_eq!(parse_target(&Value::Bool(true)), None);
        assert_eq!(parse_target(&Value::from("*")), Some(Target::Wildcard));
    }

    #[test]
    fn test_mapping_keeps_unknown_fields_in_order() {
        let mapping = crate::frontmatter::parse(
            "---\ndescription: d\nmodel: opus\ntargets: [roo]\nroot: true\n---\n",
        )
        .unwrap()
        .frontmatter;
        let fm = CanonicalFrontmatter::from_mapping(&mapping);
        assert_eq!(fm.targets, Some(vec![Target::Tool(ToolId::Roo)]));
        assert!(fm.root());
        let keys: Vec<_> = fm
            .to_mapping()
            .keys()
            .filter_map(|k| k.as_str().map(str::to_string))
            .collect();
        assert_eq!(keys, vec!["targets", "description", "model", "root"]);
    }
}
