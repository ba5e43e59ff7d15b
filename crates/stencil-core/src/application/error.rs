//! Application layer errors.
//!
//! These errors represent failures in orchestration and in the ports.
//! Errors about the input trees themselves are `DomainError`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Target file exists and overwriting was not requested.
    #[error("File already exists at {path}")]
    FileExists { path: PathBuf },

    /// The type manifest could not be read or parsed.
    #[error("Failed to load type manifest from {source_name}: {reason}")]
    ManifestLoad { source_name: String, reason: String },

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl ApplicationError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::FileExists { path } => vec![
                format!("{} was generated before", path.display()),
                "Use --force to overwrite it".into(),
            ],
            Self::ManifestLoad { source_name, .. } => vec![
                format!("Could not read manifest: {}", source_name),
                "The manifest must be a jsii-style JSON document with a `types` object".into(),
            ],
            Self::ValidationFailed(_) => vec!["Check the error details above".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. } => ErrorCategory::Internal,
            Self::FileExists { .. } | Self::ValidationFailed(_) => ErrorCategory::Validation,
            Self::ManifestLoad { .. } => ErrorCategory::Configuration,
        }
    }
}
