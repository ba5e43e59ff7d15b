//! `stencil merge`: deep-merge JSON layers and optionally re-key them.

use std::path::Path;

use stencil_adapters::LocalFilesystem;
use stencil_core::{
    application::{GenerationService, SynthService, WritePolicy},
    domain::{GeneratedFiles, KeyTransformer, MergeMode, RelativePath},
    error::StencilError,
};
use tracing::{debug, instrument};

use crate::{
    cli::MergeArgs,
    commands::{read_mapping, report_outcomes},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(layers = args.layers.len()))]
pub fn execute(args: MergeArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let layers = args
        .layers
        .iter()
        .map(|path| read_mapping(path))
        .collect::<CliResult<Vec<_>>>()?;

    let service = build_service(&args, config);
    debug!(mode = ?service.mode(), "layers loaded");

    let Some(out) = &args.out else {
        let document = service.to_json(layers)?;
        let text = serde_json::to_string_pretty(&document).map_err(std::io::Error::other)?;
        output.document(&text)?;
        return Ok(());
    };

    let (root, file_name) = split_output_path(out)?;
    let file = service.json_file(file_name, layers, true, args.readonly)?;
    let files = GeneratedFiles::from_iter([file]);

    let outcomes = GenerationService::new(Box::new(LocalFilesystem::new())).write(
        root,
        &files,
        WritePolicy::Overwrite,
    )?;
    report_outcomes(output, &outcomes, false)
}

fn build_service(args: &MergeArgs, config: &AppConfig) -> SynthService {
    let mode = if args.destructive {
        MergeMode::Destructive
    } else {
        MergeMode::NonDestructive
    };
    let service = SynthService::new(mode);

    let case = match (args.case, args.decamelize) {
        (Some(case), _) => case,
        (None, true) => config.transform.case,
        (None, false) => return service,
    };

    let transformer = KeyTransformer::new(case)
        .preserving_below(args.keep.iter().map(String::as_str))
        .with_max_depth(args.max_depth.unwrap_or(config.transform.max_depth));
    service.with_transformer(transformer)
}

/// Split `--out` into the directory to write under and the file name.
fn split_output_path(out: &Path) -> CliResult<(&Path, RelativePath)> {
    let name = out
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::InvalidInput {
            message: format!("'{}' is not a file path", out.display()),
            source: None,
        })?;
    let root = out
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = RelativePath::try_new(name).map_err(StencilError::from)?;
    Ok((root, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use stencil_core::domain::{ConfigValue, KeyCase};

    use crate::cli::{Cli, Commands};

    fn merge_args(argv: &[&str]) -> MergeArgs {
        let cli = Cli::parse_from(["stencil", "merge"].iter().chain(argv));
        match cli.command {
            Commands::Merge(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    fn layer() -> stencil_core::domain::Mapping {
        ConfigValue::from(serde_json::json!({ "dependsOn": 1 }))
            .into_mapping()
            .unwrap()
    }

    #[test]
    fn no_case_means_no_transformer() {
        let service = build_service(&merge_args(&["a.json"]), &AppConfig::default());
        assert_eq!(service.mode(), MergeMode::NonDestructive);
        let out = service.to_json(vec![layer()]).unwrap();
        assert_eq!(out, serde_json::json!({ "dependsOn": 1 }));
    }

    #[test]
    fn decamelize_uses_configured_case() {
        let mut config = AppConfig::default();
        config.transform.case = KeyCase::Kebab;
        let service = build_service(&merge_args(&["a.json", "--decamelize"]), &config);

        let out = service.to_json(vec![layer()]).unwrap();
        assert_eq!(out, serde_json::json!({ "depends-on": 1 }));
    }

    #[test]
    fn explicit_case_and_destructive_mode() {
        let args = merge_args(&["a.json", "--destructive", "--case", "screaming"]);
        let service = build_service(&args, &AppConfig::default());
        assert_eq!(service.mode(), MergeMode::Destructive);

        let out = service.to_json(vec![layer()]).unwrap();
        assert_eq!(out, serde_json::json!({ "DEPENDS_ON": 1 }));
    }

    #[test]
    fn output_path_is_split() {
        let (root, name) = split_output_path(Path::new("out/settings.json")).unwrap();
        assert_eq!(root, Path::new("out"));
        assert_eq!(name.to_string(), "settings.json");

        let (root, _) = split_output_path(Path::new("settings.json")).unwrap();
        assert_eq!(root, Path::new("."));
    }
}
