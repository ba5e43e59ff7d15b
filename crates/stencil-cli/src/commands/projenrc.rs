//! `stencil projenrc`: generate the Java entry point that builds a project.

use stencil_adapters::{JsonManifestReader, LocalFilesystem};
use stencil_core::application::{
    GenerationService, JavaProjenrcService, ProjenrcOptions, WritePolicy,
};
use tracing::{info, instrument};

use crate::{
    cli::ProjenrcArgs,
    commands::{read_mapping, report_outcomes},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(project_type = %args.project_type))]
pub fn execute(args: ProjenrcArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let manifest = JsonManifestReader::from_path(&args.manifest)?;
    let init_options = read_mapping(&args.options)?;
    let options = projenrc_options(&args, config);

    let service = JavaProjenrcService::new(Box::new(manifest));
    let Some(file) = service.generate(&args.project_type, &init_options, &options)? else {
        output.warning(&format!(
            "could not resolve '{}' and its options in the manifest; nothing generated",
            args.project_type
        ))?;
        return Ok(());
    };
    let files = [file].into_iter().collect();

    // an existing projenrc belongs to the user
    let generation = GenerationService::new(Box::new(LocalFilesystem::new()));
    let outcomes = if args.dry_run {
        generation.plan(&args.out, &files, WritePolicy::SkipExisting)?
    } else {
        generation.write(&args.out, &files, WritePolicy::SkipExisting)?
    };
    info!(dry_run = args.dry_run, "projenrc handled");

    report_outcomes(output, &outcomes, args.dry_run)
}

fn projenrc_options(args: &ProjenrcArgs, config: &AppConfig) -> ProjenrcOptions {
    ProjenrcOptions {
        class_name: args
            .class_name
            .clone()
            .unwrap_or_else(|| config.projenrc.class_name.clone()),
        test_scope: config.projenrc.test_scope && !args.main_scope,
        indent_width: config.render.indent_width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::{Cli, Commands};

    fn projenrc_args(extra: &[&str]) -> ProjenrcArgs {
        let base = [
            "stencil",
            "projenrc",
            "--manifest",
            ".jsii",
            "--project-type",
            "projen.java.JavaProject",
            "--options",
            "opts.json",
        ];
        match Cli::parse_from(base.iter().chain(extra)).command {
            Commands::Projenrc(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_supplies_defaults() {
        let mut config = AppConfig::default();
        config.projenrc.class_name = "org.acme.Build".into();
        config.render.indent_width = 2;

        let options = projenrc_options(&projenrc_args(&[]), &config);
        assert_eq!(options.class_name, "org.acme.Build");
        assert!(options.test_scope);
        assert_eq!(options.indent_width, 2);
    }

    #[test]
    fn flags_override_config() {
        let args = projenrc_args(&["--class-name", "Projenrc", "--main-scope"]);
        let options = projenrc_options(&args, &AppConfig::default());
        assert_eq!(options.class_name, "Projenrc");
        assert!(!options.test_scope);
    }
}
