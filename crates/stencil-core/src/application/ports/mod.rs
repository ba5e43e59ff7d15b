//! Application ports (traits) for external dependencies.
//!
//! Adapters in `stencil-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: called by the application, implemented by
//!   infrastructure
//!   - `Filesystem`: writing generated files
//!   - `TypeManifestReader`: read-only type lookups for the options renderer

pub mod output;

pub use output::{Filesystem, TypeManifestReader};
