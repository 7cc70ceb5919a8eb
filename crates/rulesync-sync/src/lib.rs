pub mod detect;
pub mod error;
pub mod generate;
pub mod import;
pub mod load;
pub mod report;

pub use detect::{detect_tools, DetectedTool};
pub use error::SyncError;
pub use generate::{generate, generate_all, GenerateOptions};
pub use import::{import, ImportOptions};
pub use load::{load_canonical, load_tool_artifacts, Loaded};
pub use report::{FileFailure, SyncReport};
