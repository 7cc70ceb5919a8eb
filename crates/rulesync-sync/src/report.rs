use std::path::{Path, PathBuf};

use rulesync_core::CoreError;
use serde::Serialize;

/// One file that could not be read, converted or written.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub kind: &'static str,
    pub message: String,
}

impl FileFailure {
    pub fn new(path: impl AsRef<Path>, error: &CoreError) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Outcome of a bulk run. Failures are per file and never abort the run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub written: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn merge(&mut self, other: SyncReport) {
        self.written.extend(other.written);
        self.removed.extend(other.removed);
        self.failures.extend(other.failures);
    }

    pub(crate) fn fail(&mut self, path: impl AsRef<Path>, error: &CoreError) {
        tracing::warn!("{}: {error}", path.as_ref().display());
        self.failures.push(FileFailure::new(path, error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_and_success() {
        let mut a = SyncReport {
            written: vec![PathBuf::from("a.md")],
            ..Default::default()
        };
        assert!(a.is_success());

        let mut b = SyncReport::default();
        b.fail(
            "b.md",
            &CoreError::NotFound {
                path: PathBuf::from("b.md"),
            },
        );
        a.merge(b);

        assert_eq!(a.written.len(), 1);
        assert_eq!(a.failures.len(), 1);
        assert_eq!(a.failures[0].kind, "not_found");
        assert!(!a.is_success());
    }
}
