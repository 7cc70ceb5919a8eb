pub mod artifact;
pub mod canonical;
pub mod tool;

pub use artifact::ToolArtifact;
pub use canonical::{CanonicalFrontmatter, CanonicalRecord};
pub use tool::{FeatureKind, FeatureSelector, Target, ToolId};
