//! Conversion between canonical records and tool artifacts.

use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::error::CoreError;
use crate::frontmatter::Frontmatter;
use crate::model::{CanonicalFrontmatter, CanonicalRecord, FeatureKind, Target, ToolArtifact, ToolId};
use crate::registry::{self, ToolConfig, CANONICAL_EXTENSION, ROOT_RULE_FILE_NAME};

/// How one canonical frontmatter key appears in a tool's frontmatter.
/// Keys without a mapping are copied unchanged in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMapping {
    /// Not written to the tool; ignored if the tool file has it.
    Drop(&'static str),
    Rename {
        canonical: &'static str,
        tool: &'static str,
    },
    /// A canonical list stored by the tool as one delimited string.
    Join {
        canonical: &'static str,
        tool: &'static str,
        separator: &'static str,
    },
}

impl FieldMapping {
    fn canonical_key(&self) -> &'static str {
        match self {
            Self::Drop(key) => key,
            Self::Rename { canonical, .. } | Self::Join { canonical, .. } => canonical,
        }
    }

    fn tool_key(&self) -> &'static str {
        match self {
            Self::Drop(key) => key,
            Self::Rename { tool, .. } | Self::Join { tool, .. } => tool,
        }
    }
}

/// Whether `tool` should receive `record`.
///
/// Absent targets mean every tool; `*` matches every tool; otherwise the
/// tool must be listed. An empty list targets nothing.
pub fn is_targeted_by(record: &CanonicalRecord, tool: ToolId) -> bool {
    match &record.frontmatter().targets {
        None => true,
        Some(targets) => targets.iter().any(|t| t.matches(tool)),
    }
}

/// Map a canonical record into `config`'s tool layout.
///
/// The body is kept verbatim and the file stem is kept with the tool's
/// extension applied. Root rules go to the tool's root file when it has
/// one.
pub fn from_canonical(
    config: &ToolConfig,
    base_dir: &Path,
    record: &CanonicalRecord,
    validate: bool,
) -> Result<ToolArtifact, CoreError> {
    if record.kind() != config.kind {
        return Err(CoreError::Config(format!(
            "cannot write {} record {} as {} {}",
            record.kind(),
            record.relative_file_path().display(),
            config.tool,
            config.kind
        )));
    }

    let frontmatter = map_to_tool(config.field_mapping, &record.frontmatter().to_mapping());
    let is_root = config.kind == FeatureKind::Rules
        && record.frontmatter().root()
        && config.root_file.is_some();

    if is_root {
        ToolArtifact::new_root(config, base_dir, frontmatter, record.body(), validate)
    } else {
        let file = swap_extension(
            record.relative_file_path(),
            CANONICAL_EXTENSION,
            config.extension,
        );
        ToolArtifact::new(config, base_dir, file, frontmatter, record.body(), validate)
    }
}

/// Map a tool artifact back to a canonical record targeting every tool.
pub fn to_canonical(artifact: &ToolArtifact) -> Result<CanonicalRecord, CoreError> {
    let config = registry::require(artifact.tool(), artifact.kind())?;

    let mut mapping = map_to_canonical(config.field_mapping, artifact.frontmatter());
    let file = if artifact.is_root() {
        mapping.insert(Value::from("root"), Value::from(true));
        PathBuf::from(ROOT_RULE_FILE_NAME)
    } else {
        swap_extension(
            artifact.relative_file_path(),
            config.extension,
            CANONICAL_EXTENSION,
        )
    };

    let mut frontmatter = CanonicalFrontmatter::from_mapping(&mapping);
    frontmatter.targets = Some(vec![Target::Wildcard]);

    CanonicalRecord::new(artifact.kind(), file, frontmatter, artifact.body())
}

fn map_to_tool(mappings: &[FieldMapping], canonical: &Frontmatter) -> Frontmatter {
    let mut out = Frontmatter::new();
    for (key, value) in canonical {
        let rule = key
            .as_str()
            .and_then(|k| mappings.iter().find(|m| m.canonical_key() == k));
        match rule {
            Some(FieldMapping::Drop(_)) => {}
            Some(FieldMapping::Rename { tool, .. }) => {
                out.insert(Value::from(*tool), value.clone());
            }
            Some(FieldMapping::Join {
                tool, separator, ..
            }) => {
                out.insert(Value::from(*tool), join_list(value, separator));
            }
            None => {
                out.insert(key.clone(), value.clone());
            }
        }
    }
    out
}

fn map_to_canonical(mappings: &[FieldMapping], tool: &Frontmatter) -> Frontmatter {
    let mut out = Frontmatter::new();
    for (key, value) in tool {
        let rule = key
            .as_str()
            .and_then(|k| mappings.iter().find(|m| m.tool_key() == k));
        match rule {
            Some(FieldMapping::Drop(_)) => {}
            Some(FieldMapping::Rename { canonical, .. }) => {
                out.insert(Value::from(*canonical), value.clone());
            }
            Some(FieldMapping::Join {
                canonical,
                separator,
                ..
            }) => {
                out.insert(Value::from(*canonical), split_list(value, separator));
            }
            None => {
                out.insert(key.clone(), value.clone());
            }
        }
    }
    out
}

fn join_list(value: &Value, separator: &str) -> Value {
    match value {
        Value::Sequence(items) => Value::from(
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(separator),
        ),
        other => other.clone(),
    }
}

fn split_list(value: &Value, separator: &str) -> Value {
    match value {
        Value::String(s) => Value::Sequence(
            split_outside_braces(s, separator)
                .into_iter()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(Value::from)
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Split on `separator` only where it is not inside a `{...}` group, so
/// brace globs such as `src/{a,b}/*.rs` stay whole.
fn split_outside_braces<'a>(s: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return vec![s];
    }

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;
    while i < s.len() {
        let rest = &s[i..];
        if depth == 0 && rest.starts_with(separator) {
            parts.push(&s[start..i]);
            i += separator.len();
            start = i;
            continue;
        }
        match rest.chars().next() {
            Some('{') => depth += 1,
            Some('}') => depth = depth.saturating_sub(1),
            _ => {}
        }
        i += rest.chars().next().map_or(1, char::len_utf8);
    }
    parts.push(&s[start..]);
    parts
}

/// `dir/name<from>` becomes `dir/name<to>`. Falls back to the plain file
/// stem when the name does not end in `from`.
fn swap_extension(path: &Path, from: &str, to: &str) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = match file_name.strip_suffix(from) {
        Some(stem) => stem.to_string(),
        None => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.clone()),
    };
    path.with_file_name(format!("{stem}{to}"))
}
