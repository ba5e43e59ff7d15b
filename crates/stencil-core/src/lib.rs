//! Stencil Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Stencil
//! project synthesis engine, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           stencil-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (SynthService, JavaProjenrcService,    │
//! │   LambdaConstructService, Generation)   │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │   (Driven: Filesystem, Manifest)        │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     stencil-adapters (Infrastructure)   │
//! │ (LocalFilesystem, JsonManifestReader)   │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (ConfigValue, merge, KeyTransformer,    │
//! │  OptionsRenderer, SourceBuilder)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use stencil_core::domain::{ConfigValue, KeyTransformer, deep_merge};
//!
//! let base = ConfigValue::from(serde_json::json!({ "dependsOn": ["db"] }));
//! let layer = ConfigValue::from(serde_json::json!({ "restartPolicy": "always" }));
//!
//! let merged = deep_merge(&[
//!     base.as_mapping().cloned().unwrap_or_default(),
//!     layer.as_mapping().cloned().unwrap_or_default(),
//! ]);
//!
//! let snake = KeyTransformer::default()
//!     .transform(&ConfigValue::Mapping(merged))
//!     .unwrap();
//! assert!(snake.get("depends_on").is_some());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerationService, JavaProjenrcService, LambdaConstructService, SynthService,
        ports::{Filesystem, TypeManifestReader},
    };
    pub use crate::domain::{
        ConfigValue, FileMode, GeneratedFile, KeyCase, KeyPath, KeyTransformer, Mapping,
        MergeMode, OpaqueNode, OptionsRenderer, RenderedOptions, SharedNode, SourceBuilder,
        TargetLanguage, TypeManifestEntry, deep_merge, deep_merge_into,
    };
    pub use crate::error::{StencilError, StencilResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
