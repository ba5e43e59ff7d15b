//! Command handlers.
//!
//! Each handler turns parsed arguments into service calls and prints the
//! result. No business logic lives here.

use std::path::Path;

use stencil_core::{
    application::WriteOutcome,
    domain::{ConfigValue, Mapping},
};

use crate::{
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub mod completions;
pub mod config;
pub mod lambda;
pub mod merge;
pub mod projenrc;
pub mod render;

/// Read a JSON file holding an object.
///
/// JSON has no way to spell an absent value, so the result never holds
/// `ConfigValue::Undefined`.
pub(crate) fn read_mapping(path: &Path) -> CliResult<Mapping> {
    let text = std::fs::read_to_string(path).with_input_path(path)?;
    let json: serde_json::Value = serde_json::from_str(&text).with_input_path(path)?;

    let value = ConfigValue::from(json);
    let kind = value.kind();
    value.into_mapping().ok_or_else(|| CliError::NotAnObject {
        path: path.to_path_buf(),
        kind,
    })
}

/// Report what was (or, for a dry run, would be) written.
pub(crate) fn report_outcomes(
    output: &OutputManager,
    outcomes: &[WriteOutcome],
    dry_run: bool,
) -> CliResult<()> {
    if output.is_json() {
        output.json(&outcomes)?;
        return Ok(());
    }

    for outcome in outcomes {
        let path = outcome.path().display();
        match (outcome, dry_run) {
            (WriteOutcome::Written(_), true) => output.info(&format!("would write {path}"))?,
            (WriteOutcome::Written(_), false) => output.success(&format!("wrote {path}"))?,
            (WriteOutcome::Skipped(_), _) => {
                output.warning(&format!("{path} already exists, skipped"))?
            }
        }
    }
    Ok(())
}
