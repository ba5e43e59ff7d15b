//! Application layer for Stencil.
//!
//! This layer contains:
//! - **Services**: use-case orchestration (synthesis, projenrc and lambda
//!   generation, writing generated files)
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: application-specific error types
//!
//! Services coordinate the domain layer; the tree algorithms themselves live
//! in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    GenerationService, JavaProjenrcService, LambdaConstructService, LambdaOptions, LambdaRuntime,
    ProjenrcOptions, SynthService, WriteOutcome, WritePolicy,
};

pub use ports::{Filesystem, TypeManifestReader};

pub use error::ApplicationError;
