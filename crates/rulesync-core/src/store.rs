use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::CoreError;

/// File access used by the conversion pipeline.
pub trait FileStore {
    /// Read a whole file. A missing file is [`CoreError::NotFound`].
    fn read(&self, path: &Path) -> Result<Vec<u8>, CoreError>;

    /// Write a whole file, creating parent directories as needed.
    fn write(&self, path: &Path, content: &str) -> Result<(), CoreError>;

    fn exists(&self, path: &Path) -> bool;

    /// Files under `dir` whose names end in `suffix`, relative to `dir` and
    /// sorted. A missing directory yields an empty list.
    fn list_files(
        &self,
        dir: &Path,
        suffix: &str,
        recursive: bool,
    ) -> Result<Vec<PathBuf>, CoreError>;

    fn remove(&self, path: &Path) -> Result<(), CoreError>;
}

/// [`FileStore`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileStore for LocalFs {
    fn read(&self, path: &Path) -> Result<Vec<u8>, CoreError> {
        fs::read(path).map_err(|e| not_found_or_io(e, path))
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn list_files(
        &self,
        dir: &Path,
        suffix: &str,
        recursive: bool,
    ) -> Result<Vec<PathBuf>, CoreError> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut walker = WalkDir::new(dir).min_depth(1);
        if !recursive {
            walker = walker.max_depth(1);
        }

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| CoreError::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if !entry.file_name().to_string_lossy().ends_with(suffix) {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(dir) {
                files.push(relative.to_path_buf());
            }
        }
        files.sort();
        Ok(files)
    }

    fn remove(&self, path: &Path) -> Result<(), CoreError> {
        fs::remove_file(path).map_err(|e| not_found_or_io(e, path))
    }
}

fn not_found_or_io(e: std::io::Error, path: &Path) -> CoreError {
    if e.kind() == ErrorKind::NotFound {
        CoreError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        CoreError::Io(e)
    }
}

/// Join `base_dir/relative_dir/relative_file`, treating `.` and an empty
/// `relative_dir` as the base directory itself.
pub fn resolve(base_dir: &Path, relative_dir: &Path, relative_file: &Path) -> PathBuf {
    if relative_dir.as_os_str().is_empty() || relative_dir == Path::new(".") {
        base_dir.join(relative_file)
    } else {
        base_dir.join(relative_dir).join(relative_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parents_and_reads_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a/b/c.md");
        LocalFs.write(&path, "hello").unwrap();
        assert!(LocalFs.exists(&path));
        assert_eq!(LocalFs.read(&path).unwrap(), b"hello");
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = LocalFs.read(&tmp.path().join("missing.md")).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn test_list_files_filters_and_sorts() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("prompts");
        for name in ["b.prompt.md", "a.prompt.md", "notes.md", "nested/c.prompt.md"] {
            LocalFs.write(&dir.join(name), "x").unwrap();
        }

        let all = LocalFs.list_files(&dir, ".prompt.md", true).unwrap();
        assert_eq!(
            all,
            vec![
                PathBuf::from("a.prompt.md"),
                PathBuf::from("b.prompt.md"),
                PathBuf::from("nested/c.prompt.md"),
            ]
        );

        let top = LocalFs.list_files(&dir, ".md", false).unwrap();
        assert_eq!(top.len(), 3);
        assert!(!top.contains(&PathBuf::from("nested/c.prompt.md")));
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(LocalFs
            .list_files(&tmp.path().join("nope"), ".md", true)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_resolve_dot_dir() {
        assert_eq!(
            resolve(Path::new("/repo"), Path::new("."), Path::new("CLAUDE.md")),
            PathBuf::from("/repo/CLAUDE.md")
        );
        assert_eq!(
            resolve(Path::new("/repo"), Path::new(".roo/rules"), Path::new("x.md")),
            PathBuf::from("/repo/.roo/rules/x.md")
        );
    }
}
