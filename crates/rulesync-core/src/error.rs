use std::path::PathBuf;

use thiserror::Error;

use crate::frontmatter::{FrontmatterError, ValidationError};
use crate::model::{FeatureKind, ToolId};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Parse error in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: FrontmatterError,
    },

    #[error("Invalid frontmatter in {}: {source}", path.display())]
    Validation {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },

    #[error("{tool} does not support {kind}")]
    UnsupportedFeature { tool: ToolId, kind: FeatureKind },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Short machine-readable name of the error kind, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Parse { .. } => "parse",
            Self::Validation { .. } => "validation",
            Self::UnsupportedFeature { .. } => "unsupported_feature",
            Self::UnknownTool(_) => "unknown_tool",
            Self::UnknownFeature(_) => "unknown_feature",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
        }
    }
}
