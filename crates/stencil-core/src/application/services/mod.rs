//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports: synthesize layered
//! configuration, generate source files, and write them out.

pub mod generation_service;
pub mod lambda_service;
pub mod projenrc_service;
pub mod synth_service;

pub use generation_service::{GenerationService, WriteOutcome, WritePolicy};
pub use lambda_service::{LambdaConstructService, LambdaOptions, LambdaRuntime};
pub use projenrc_service::{JavaClassName, JavaProjenrcService, ProjenrcOptions};
pub use synth_service::SynthService;
