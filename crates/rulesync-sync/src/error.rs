use std::path::PathBuf;

use rulesync_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("No .rulesync directory in {} (run `rulesync init`)", .0.display())]
    NotInitialized(PathBuf),
}
