//! Static table of where each tool keeps its files and what their
//! frontmatter looks like.

use std::path::{Path, PathBuf};

use crate::convert::FieldMapping;
use crate::error::CoreError;
use crate::frontmatter::{FieldSpec, FieldType, Schema};
use crate::model::{FeatureKind, ToolId};

/// Root of the canonical tree.
pub const CANONICAL_ROOT: &str = ".rulesync";
pub const CANONICAL_EXTENSION: &str = ".md";
/// File name given to a root rule imported from a tool's root file.
pub const ROOT_RULE_FILE_NAME: &str = "overview.md";

const TARGETS: FieldSpec = FieldSpec::optional("targets", FieldType::Targets);
const DESCRIPTION: FieldSpec = FieldSpec::required("description", FieldType::String);
const NAME: FieldSpec = FieldSpec::required("name", FieldType::String);

static CANONICAL_RULE: Schema = Schema::new(&[
    TARGETS,
    DESCRIPTION,
    FieldSpec::optional("root", FieldType::Bool),
    FieldSpec::optional("globs", FieldType::StringList),
]);
static CANONICAL_COMMAND: Schema = Schema::new(&[TARGETS, DESCRIPTION]);
static CANONICAL_SUBAGENT: Schema = Schema::new(&[TARGETS, NAME, DESCRIPTION]);

const DESCRIPTION_ONLY: Schema = Schema::new(&[DESCRIPTION]);
const GLOB_RULE: Schema = Schema::new(&[
    DESCRIPTION,
    FieldSpec::optional("globs", FieldType::StringList),
]);
const COPILOT_RULE: Schema = Schema::new(&[
    DESCRIPTION,
    FieldSpec::optional("applyTo", FieldType::String),
]);
const CURSOR_RULE: Schema = Schema::new(&[
    DESCRIPTION,
    FieldSpec::optional("globs", FieldType::String),
    FieldSpec::optional("alwaysApply", FieldType::Bool),
]);
const SUBAGENT: Schema = Schema::new(&[NAME, DESCRIPTION]);

const DROP_TARGETS: &[FieldMapping] = &[FieldMapping::Drop("targets")];
const RULE_MAPPING: &[FieldMapping] = &[FieldMapping::Drop("targets"), FieldMapping::Drop("root")];
const COPILOT_RULE_MAPPING: &[FieldMapping] = &[
    FieldMapping::Drop("targets"),
    FieldMapping::Drop("root"),
    FieldMapping::Join {
        canonical: "globs",
        tool: "applyTo",
        separator: ",",
    },
];
const CURSOR_RULE_MAPPING: &[FieldMapping] = &[
    FieldMapping::Drop("targets"),
    FieldMapping::Rename {
        canonical: "root",
        tool: "alwaysApply",
    },
    FieldMapping::Join {
        canonical: "globs",
        tool: "globs",
        separator: ",",
    },
];

/// How one tool stores one kind of file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolConfig {
    pub tool: ToolId,
    pub kind: FeatureKind,
    /// Directory written to, relative to the base directory.
    pub settable_dir: &'static str,
    /// Extra directories read from but never written to.
    pub legacy_dirs: &'static [&'static str],
    /// Single file holding the root rule, relative to the base directory.
    pub root_file: Option<&'static str>,
    /// Full suffix of artifact file names, e.g. `.prompt.md`.
    pub extension: &'static str,
    pub schema: Schema,
    pub field_mapping: &'static [FieldMapping],
}

impl ToolConfig {
    /// The settable directory first, then legacy ones.
    pub fn readable_dirs(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.settable_dir).chain(self.legacy_dirs.iter().copied())
    }

    /// Directory and file name of the root file, if the tool has one.
    pub fn root_location(&self) -> Option<(PathBuf, PathBuf)> {
        let root = Path::new(self.root_file?);
        let dir = match root.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Some((dir, PathBuf::from(root.file_name()?)))
    }
}

static TOOL_CONFIGS: &[ToolConfig] = &[
    // Claude Code
    ToolConfig {
        tool: ToolId::ClaudeCode,
        kind: FeatureKind::Rules,
        settable_dir: ".claude/memories",
        legacy_dirs: &[],
        root_file: Some("CLAUDE.md"),
        extension: ".md",
        schema: GLOB_RULE,
        field_mapping: RULE_MAPPING,
    },
    ToolConfig {
        tool: ToolId::ClaudeCode,
        kind: FeatureKind::Commands,
        settable_dir: ".claude/commands",
        legacy_dirs: &[],
        root_file: None,
        extension: ".md",
        schema: DESCRIPTION_ONLY,
        field_mapping: DROP_TARGETS,
    },
    ToolConfig {
        tool: ToolId::ClaudeCode,
        kind: FeatureKind::Subagents,
        settable_dir: ".claude/agents",
        legacy_dirs: &[],
        root_file: None,
        extension: ".md",
        schema: SUBAGENT,
        field_mapping: DROP_TARGETS,
    },
    // Codex CLI: commands and subagents are simulated in the project tree;
    // prompts written by hand under .codex/prompts are still picked up.
    ToolConfig {
        tool: ToolId::CodexCli,
        kind: FeatureKind::Rules,
        settable_dir: ".codex/memories",
        legacy_dirs: &[],
        root_file: Some("AGENTS.md"),
        extension: ".md",
        schema: GLOB_RULE,
        field_mapping: RULE_MAPPING,
    },
    ToolConfig {
        tool: ToolId::CodexCli,
        kind: FeatureKind::Commands,
        settable_dir: ".codex/commands",
        legacy_dirs: &[".codex/prompts"],
        root_file: None,
        extension: ".md",
        schema: DESCRIPTION_ONLY,
        field_mapping: DROP_TARGETS,
    },
    ToolConfig {
        tool: ToolId::CodexCli,
        kind: FeatureKind::Subagents,
        settable_dir: ".codex/subagents",
        legacy_dirs: &[],
        root_file: None,
        extension: ".md",
        schema: SUBAGENT,
        field_mapping: DROP_TARGETS,
    },
    // GitHub Copilot
    ToolConfig {
        tool: ToolId::Copilot,
        kind: FeatureKind::Rules,
        settable_dir: ".github/instructions",
        legacy_dirs: &[],
        root_file: Some(".github/copilot-instructions.md"),
        extension: ".instructions.md",
        schema: COPILOT_RULE,
        field_mapping: COPILOT_RULE_MAPPING,
    },
    ToolConfig {
        tool: ToolId::Copilot,
        kind: FeatureKind::Commands,
        settable_dir: ".github/prompts",
        legacy_dirs: &[],
        root_file: None,
        extension: ".prompt.md",
        schema: DESCRIPTION_ONLY,
        field_mapping: DROP_TARGETS,
    },
    ToolConfig {
        tool: ToolId::Copilot,
        kind: FeatureKind::Subagents,
        settable_dir: ".github/subagents",
        legacy_dirs: &[],
        root_file: None,
        extension: ".md",
        schema: SUBAGENT,
        field_mapping: DROP_TARGETS,
    },
    // Cursor has no root file; the root rule is an always-applied rule.
    ToolConfig {
        tool: ToolId::Cursor,
        kind: FeatureKind::Rules,
        settable_dir: ".cursor/rules",
        legacy_dirs: &[],
        root_file: None,
        extension: ".mdc",
        schema: CURSOR_RULE,
        field_mapping: CURSOR_RULE_MAPPING,
    },
    ToolConfig {
        tool: ToolId::Cursor,
        kind: FeatureKind::Commands,
        settable_dir: ".cursor/commands",
        legacy_dirs: &[],
        root_file: None,
        extension: ".md",
        schema: DESCRIPTION_ONLY,
        field_mapping: DROP_TARGETS,
    },
    ToolConfig {
        tool: ToolId::Cursor,
        kind: FeatureKind::Subagents,
        settable_dir: ".cursor/subagents",
        legacy_dirs: &[],
        root_file: None,
        extension: ".md",
        schema: SUBAGENT,
        field_mapping: DROP_TARGETS,
    },
    // Roo Code
    ToolConfig {
        tool: ToolId::Roo,
        kind: FeatureKind::Rules,
        settable_dir: ".roo/rules",
        legacy_dirs: &[],
        root_file: None,
        extension: ".md",
        schema: GLOB_RULE,
        field_mapping: RULE_MAPPING,
    },
    ToolConfig {
        tool: ToolId::Roo,
        kind: FeatureKind::Commands,
        settable_dir: ".roo/commands",
        legacy_dirs: &[],
        root_file: None,
        extension: ".md",
        schema: DESCRIPTION_ONLY,
        field_mapping: DROP_TARGETS,
    },
];

pub fn all() -> &'static [ToolConfig] {
    TOOL_CONFIGS
}

pub fn lookup(tool: ToolId, kind: FeatureKind) -> Option<&'static ToolConfig> {
    TOOL_CONFIGS
        .iter()
        .find(|c| c.tool == tool && c.kind == kind)
}

/// Like [`lookup`], but an unsupported pair is an error.
pub fn require(tool: ToolId, kind: FeatureKind) -> Result<&'static ToolConfig, CoreError> {
    lookup(tool, kind).ok_or(CoreError::UnsupportedFeature { tool, kind })
}

pub fn canonical_dir(kind: FeatureKind) -> &'static str {
    match kind {
        FeatureKind::Rules => ".rulesync/rules",
        FeatureKind::Commands => ".rulesync/commands",
        FeatureKind::Subagents => ".rulesync/subagents",
    }
}

/// Older layouts kept rules directly under `.rulesync/`. Listed
/// non-recursively so the per-kind subdirectories are not picked up twice.
pub fn canonical_legacy_dirs(kind: FeatureKind) -> &'static [&'static str] {
    match kind {
        FeatureKind::Rules => &[CANONICAL_ROOT],
        FeatureKind::Commands | FeatureKind::Subagents => &[],
    }
}

pub fn canonical_schema(kind: FeatureKind) -> &'static Schema {
    match kind {
        FeatureKind::Rules => &CANONICAL_RULE,
        FeatureKind::Commands => &CANONICAL_COMMAND,
        FeatureKind::Subagents => &CANONICAL_SUBAGENT,
    }
}
