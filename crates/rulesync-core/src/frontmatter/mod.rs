pub mod codec;
pub mod schema;

pub use codec::{parse, parse_bytes, serialize, Document, Frontmatter, FrontmatterError};
pub use schema::{FieldProblem, FieldSpec, FieldType, ProblemKind, Schema, ValidationError};
