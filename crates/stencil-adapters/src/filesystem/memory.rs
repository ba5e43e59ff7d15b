//! In-memory filesystem adapter for testing and dry runs.

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::RwLock;
use stencil_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::FileMode,
    error::StencilResult,
};

#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, MemoryFile>,
    directories: HashSet<PathBuf>,
}

#[derive(Debug, Clone)]
struct MemoryFile {
    content: String,
    mode: FileMode,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        self.inner.read().files.get(path).map(|f| f.content.clone())
    }

    pub fn mode(&self, path: &Path) -> Option<FileMode> {
        self.inner.read().files.get(path).map(|f| f.mode)
    }

    /// All files, in path order.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner.read().files.keys().cloned().collect()
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> StencilResult<()> {
        let mut inner = self.inner.write();
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> StencilResult<()> {
        let mut inner = self.inner.write();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        let mode = inner
            .files
            .get(path)
            .map_or(FileMode::default(), |existing| existing.mode);
        inner.files.insert(
            path.to_path_buf(),
            MemoryFile {
                content: content.to_string(),
                mode,
            },
        );
        Ok(())
    }

    fn set_mode(&self, path: &Path, mode: FileMode) -> StencilResult<()> {
        let mut inner = self.inner.write();
        match inner.files.get_mut(path) {
            Some(file) => {
                file.mode = mode;
                Ok(())
            }
            None => Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            }
            .into()),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.inner.read();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_parent_directory() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/out/a.txt"), "x").is_err());

        fs.create_dir_all(Path::new("/out")).unwrap();
        fs.write_file(Path::new("/out/a.txt"), "x").unwrap();
        assert!(fs.exists(Path::new("/out")));
        assert_eq!(fs.read_file(Path::new("/out/a.txt")).as_deref(), Some("x"));
    }

    #[test]
    fn tracks_modes() {
        let fs = MemoryFilesystem::new();
        fs.write_file(Path::new("run"), "x").unwrap();
        assert_eq!(fs.mode(Path::new("run")), Some(FileMode::Regular));

        fs.set_mode(Path::new("run"), FileMode::Executable).unwrap();
        fs.write_file(Path::new("run"), "y").unwrap();
        assert_eq!(fs.mode(Path::new("run")), Some(FileMode::Executable));
        assert!(fs.set_mode(Path::new("missing"), FileMode::ReadOnly).is_err());
    }
}
