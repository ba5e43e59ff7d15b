// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (values travel through services untouched)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Traversal Errors
    // ========================================================================
    #[error("circular reference detected at '{path}'")]
    CircularReference { path: String },

    #[error("key '{path}' collides with a sibling after rewriting to '{key}'")]
    KeyCollision { path: String, key: String },

    #[error("value nested too deeply at '{path}' (limit is {max_depth} keys)")]
    DepthExceeded { path: String, max_depth: usize },

    #[error("opaque value '{label}' at '{path}' cannot be serialized")]
    OpaqueValue { label: String, path: String },

    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("invalid source file '{path}': {reason}")]
    InvalidSourceFile { path: String, reason: String },

    #[error("invalid class name '{name}': {reason}")]
    InvalidClassName { name: String, reason: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Duplicate generated path: {path}")]
    DuplicatePath { path: String },

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    #[error("unsupported target language '{name}'")]
    UnsupportedLanguage { name: String },

    #[error("type '{fqn}' is not declared in the manifest")]
    UnknownType { fqn: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::CircularReference { path } => vec![
                format!("The value at '{}' refers back to one of its parents", path),
                "Replace the shared reference with a copy of the value".into(),
            ],
            Self::KeyCollision { key, .. } => vec![
                format!("Another key in the same object is already spelled '{}'", key),
                "Rename one of the keys, or keep this subtree's casing with --keep".into(),
            ],
            Self::DepthExceeded { max_depth, .. } => vec![
                format!("Configuration may nest at most {} keys deep", max_depth),
                "Raise the limit with `transform.max_depth` in the config file".into(),
            ],
            Self::OpaqueValue { label, .. } => vec![
                format!("'{}' is a live handle, not data", label),
                "Convert it to plain values before writing a file".into(),
            ],
            Self::InvalidSourceFile { path, reason } => vec![
                format!("{}: {}", path, reason),
                "Lambda entrypoints must end in `.lambda.ts`".into(),
            ],
            Self::InvalidClassName { .. } => vec![
                "Use a Java class name such as `projenrc` or `org.acme.Projenrc`".into(),
            ],
            Self::UnsupportedLanguage { name } => vec![
                format!("'{}' is not a target language", name),
                "Supported languages: java, python".into(),
            ],
            Self::UnknownType { fqn } => vec![
                format!("'{}' was not found in the type manifest", fqn),
                "Check the fully-qualified name and the manifest file".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidSourceFile { .. }
            | Self::InvalidClassName { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::DuplicatePath { .. }
            | Self::CircularReference { .. }
            | Self::KeyCollision { .. }
            | Self::DepthExceeded { .. }
            | Self::OpaqueValue { .. } => ErrorCategory::Validation,
            Self::UnknownType { .. } | Self::UnsupportedLanguage { .. } => ErrorCategory::NotFound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
