pub mod config;
pub mod convert;
pub mod error;
pub mod frontmatter;
pub mod model;
pub mod registry;
pub mod store;

pub use config::RulesyncConfig;
pub use convert::{from_canonical, is_targeted_by, to_canonical, FieldMapping};
pub use error::CoreError;
pub use frontmatter::{Document, Frontmatter, Schema, ValidationError};
pub use model::{CanonicalFrontmatter, CanonicalRecord, FeatureKind, Target, ToolArtifact, ToolId};
pub use registry::ToolConfig;
pub use store::{FileStore, LocalFs};
