pub mod common;
pub mod generated;

pub use common::RelativePath;
pub use generated::{GeneratedFile, GeneratedFileInfo, GeneratedFiles};
