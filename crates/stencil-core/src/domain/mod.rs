// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Stencil.
//!
//! Pure tree and text algorithms over in-memory configuration. All file and
//! manifest access goes through ports defined in the application layer.
//!
//! - **No I/O**: values in, values out
//! - **Inputs are never mutated** unless an API says so (`deep_merge_into`)
//! - **Opaque nodes are atoms**: merged and copied by identity, never looked into
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod keys;
pub mod manifest;
pub mod merge;
pub mod render;
pub mod util;
pub mod value;

pub use entities::{GeneratedFile, GeneratedFileInfo, GeneratedFiles, RelativePath};

pub use error::{DomainError, ErrorCategory};

pub use keys::{
    DEFAULT_MAX_DEPTH, KeyCase, KeyPath, KeyPredicate, KeyTransformer, decamelize_keys,
};
pub use manifest::{OptionDecl, TypeKind, TypeManifestEntry, TypeManifestReader};
pub use merge::{MergeMode, deep_merge, deep_merge_into, merge_layers};
pub use render::{
    JavaSyntax, OptionsRenderer, PythonSyntax, RenderedOptions, SourceBuilder, SourceLine,
    TargetLanguage, TargetSyntax,
};
pub use util::{
    FileMode, dedup, enum_member_name, is_truthy, normalize_module_name, permission_triplet,
};
pub use value::{ConfigValue, Mapping, OpaqueNode, SharedNode};
