//! Driven (output) ports - implemented by infrastructure.

use std::path::Path;

use crate::domain::FileMode;
use crate::error::StencilResult;

pub use crate::domain::manifest::TypeManifestReader;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `stencil_adapters::filesystem::LocalFilesystem` (production)
/// - `stencil_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StencilResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> StencilResult<()>;

    /// Apply a permission triplet.
    fn set_mode(&self, path: &Path, mode: FileMode) -> StencilResult<()>;

    fn exists(&self, path: &Path) -> bool;
}
