//! `stencil render`: render an options object in another language.

use stencil_adapters::JsonManifestReader;
use stencil_core::domain::{
    OptionsRenderer, TargetLanguage, TypeKind, TypeManifestEntry, TypeManifestReader,
};
use tracing::{debug, instrument};

use crate::{
    cli::RenderArgs,
    commands::read_mapping,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(type_fqn = %args.type_fqn))]
pub fn execute(args: RenderArgs, config: &AppConfig, output: &OutputManager) -> CliResult<()> {
    let manifest = JsonManifestReader::from_path(&args.manifest)?;
    let options = read_mapping(&args.options)?;
    let language = args
        .language
        .map_or(config.render.language, TargetLanguage::from);

    let options_type = resolve_options_type(&manifest, &args.type_fqn)?;
    debug!(options_type = %options_type.fqn, %language, "rendering");

    let rendered =
        OptionsRenderer::for_language(language).render(&options, &options_type, &manifest);

    if output.is_json() {
        output.json(&rendered)?;
        return Ok(());
    }

    if !rendered.imports.is_empty() {
        output.header("Imports:")?;
        for import in &rendered.imports {
            output.print(&format!("  {import}"))?;
        }
        output.print("")?;
    }
    if rendered.is_empty() {
        output.warning("no options to render")?;
    } else {
        output.document(&rendered.join(config.render.indent_width))?;
    }
    Ok(())
}

/// A class resolves to the options struct its constructor takes.
fn resolve_options_type(
    manifest: &dyn TypeManifestReader,
    fqn: &str,
) -> CliResult<TypeManifestEntry> {
    let entry = manifest
        .lookup_type(fqn)
        .ok_or_else(|| CliError::TypeNotFound { fqn: fqn.into() })?;
    if entry.kind != TypeKind::Class {
        return Ok(entry);
    }

    let options_fqn = entry
        .initializer_options
        .clone()
        .ok_or_else(|| CliError::InvalidInput {
            message: format!("class '{fqn}' takes no options"),
            source: None,
        })?;
    manifest
        .lookup_type(&options_fqn)
        .ok_or(CliError::TypeNotFound { fqn: options_fqn })
}
