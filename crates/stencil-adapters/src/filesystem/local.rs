//! Local filesystem adapter using std::fs.

use std::fs;
use std::io;
use std::path::Path;

use stencil_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::FileMode,
    error::{StencilError, StencilResult},
};
use tracing::trace;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> StencilResult<()> {
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    /// Generated files are often read-only; they are made writable again
    /// before being replaced.
    fn write_file(&self, path: &Path, content: &str) -> StencilResult<()> {
        if let Ok(metadata) = fs::metadata(path) {
            let mut perms = metadata.permissions();
            if perms.readonly() {
                trace!(path = %path.display(), "clearing read-only flag before overwrite");
                #[allow(clippy::permissions_set_readonly_false)]
                perms.set_readonly(false);
                fs::set_permissions(path, perms)
                    .map_err(|e| map_io_error(path, e, "make writable"))?;
            }
        }
        fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn set_mode(&self, path: &Path, mode: FileMode) -> StencilResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(mode.bits()))
                .map_err(|e| map_io_error(path, e, "set permissions"))?;
        }
        #[cfg(not(unix))]
        {
            // only the read-only bit exists here
            let mut perms = fs::metadata(path)
                .map_err(|e| map_io_error(path, e, "get metadata"))?
                .permissions();
            perms.set_readonly(mode.is_readonly());
            fs::set_permissions(path, perms)
                .map_err(|e| map_io_error(path, e, "set permissions"))?;
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> StencilError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_and_reads_back() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let nested = dir.path().join("a/b");

        fs.create_dir_all(&nested).unwrap();
        fs.write_file(&nested.join("c.txt"), "hello").unwrap();

        assert!(fs.exists(&nested.join("c.txt")));
        assert_eq!(std::fs::read_to_string(nested.join("c.txt")).unwrap(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn applies_permission_triplet() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let file = dir.path().join("run.sh");
        fs.write_file(&file, "#!/bin/sh").unwrap();

        for mode in [FileMode::Executable, FileMode::ReadOnlyExecutable, FileMode::ReadOnly] {
            fs.set_mode(&file, mode).unwrap();
            let bits = std::fs::metadata(&file).unwrap().permissions().mode() & 0o777;
            assert_eq!(bits, mode.bits());
        }
    }

    #[test]
    fn overwrites_read_only_files() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let file = dir.path().join("generated.ts");

        fs.write_file(&file, "v1").unwrap();
        fs.set_mode(&file, FileMode::ReadOnly).unwrap();
        fs.write_file(&file, "v2").unwrap();

        assert_eq!(std::fs::read_to_string(&file).unwrap(), "v2");
    }

    #[test]
    fn missing_file_is_a_filesystem_error() {
        let dir = TempDir::new().unwrap();
        let err = LocalFilesystem::new()
            .set_mode(&dir.path().join("nope"), FileMode::ReadOnly)
            .unwrap_err();
        assert!(matches!(
            err,
            StencilError::Application(ApplicationError::FilesystemError { .. })
        ));
    }
}
