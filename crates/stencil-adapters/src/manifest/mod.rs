//! Type manifest adapters.

mod json;
mod memory;

pub use json::JsonManifestReader;
pub use memory::InMemoryManifest;
