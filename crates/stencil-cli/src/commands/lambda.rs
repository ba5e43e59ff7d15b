//! `stencil lambda`: generate a typed construct for a handler entrypoint.

use stencil_adapters::LocalFilesystem;
use stencil_core::{
    application::{GenerationService, LambdaConstructService, LambdaOptions, WritePolicy},
    domain::GeneratedFiles,
};
use tracing::{debug, instrument};

use crate::{
    cli::LambdaArgs,
    commands::report_outcomes,
    error::CliResult,
    output::OutputManager,
};

/// Construct files are always regenerated; they are read-only outputs.
#[instrument(skip_all, fields(entrypoint = %args.entrypoint))]
pub fn execute(args: LambdaArgs, output: &OutputManager) -> CliResult<()> {
    let options = LambdaOptions {
        entrypoint: args.entrypoint,
        construct_file: args.construct_file,
        construct_name: args.construct_name,
        runtime: args.runtime,
        bundle_outfile: args.bundle_outfile,
    };
    debug!(esbuild_target = options.runtime.esbuild_target(), "bundler target");

    let file = LambdaConstructService::new().generate(&options)?;
    let files = GeneratedFiles::from_iter([file]);

    let generation = GenerationService::new(Box::new(LocalFilesystem::new()));
    let outcomes = if args.dry_run {
        generation.plan(&args.out, &files, WritePolicy::Overwrite)?
    } else {
        generation.write(&args.out, &files, WritePolicy::Overwrite)?
    };

    report_outcomes(output, &outcomes, args.dry_run)
}
