//! Infrastructure adapters for Stencil.
//!
//! This crate implements the ports defined in `stencil-core::application::ports`.
//! It contains all I/O: the local filesystem and manifest files on disk.

pub mod filesystem;
pub mod manifest;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use manifest::{InMemoryManifest, JsonManifestReader};
