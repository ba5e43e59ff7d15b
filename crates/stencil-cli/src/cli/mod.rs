//! CLI argument definitions using the clap derive API.
//!
//! This module is the only place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use stencil_core::{
    application::LambdaRuntime,
    domain::{KeyCase, TargetLanguage},
};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name    = "stencil",
    bin_name = "stencil",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Layered project configuration and source synthesis",
    long_about = "Stencil merges layered configuration trees, re-keys them for the \
                  target tool, and renders project options as source code in \
                  other languages.",
    after_help = "EXAMPLES:\n\
        \x20 stencil merge base.json overrides.json --decamelize\n\
        \x20 stencil render --manifest .jsii --type projen.java.JavaProject --options opts.json\n\
        \x20 stencil projenrc --manifest .jsii --project-type projen.java.JavaProject --options opts.json\n\
        \x20 stencil lambda --entrypoint src/resize.lambda.ts\n\
        \x20 stencil completions bash > /usr/share/bash-completion/completions/stencil",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Deep-merge JSON layers into one document.
    #[command(
        visible_alias = "m",
        about = "Merge configuration layers",
        after_help = "EXAMPLES:\n\
            \x20 stencil merge base.json prod.json\n\
            \x20 stencil merge compose.json --decamelize --keep services.web.environment\n\
            \x20 stencil merge a.json b.json --case kebab --out settings.json --readonly"
    )]
    Merge(MergeArgs),

    /// Render an options mapping as a constructor expression.
    #[command(
        visible_alias = "r",
        about = "Render options for another language",
        after_help = "EXAMPLES:\n\
            \x20 stencil render --manifest .jsii --type projen.java.JavaProject --options opts.json\n\
            \x20 stencil render --manifest .jsii --type projen.ProjectOptions --options opts.json --lang python"
    )]
    Render(RenderArgs),

    /// Generate a Java projenrc entry point.
    #[command(
        about = "Generate a Java projenrc class",
        after_help = "EXAMPLES:\n\
            \x20 stencil projenrc --manifest .jsii --project-type projen.java.JavaProject --options opts.json\n\
            \x20 stencil projenrc --manifest .jsii --project-type projen.java.JavaProject \\\n\
            \x20     --options opts.json --class-name org.acme.Projenrc --main-scope --dry-run"
    )]
    Projenrc(ProjenrcArgs),

    /// Generate a typed Lambda construct for a handler entrypoint.
    #[command(
        about = "Generate a Lambda construct",
        after_help = "EXAMPLES:\n\
            \x20 stencil lambda --entrypoint src/resize-image.lambda.ts\n\
            \x20 stencil lambda --entrypoint src/api/get.lambda.ts --runtime nodejs12.x \\\n\
            \x20     --bundle-outfile build/get/index.js --construct-name GetHandler"
    )]
    Lambda(LambdaArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stencil completions bash > ~/.local/share/bash-completion/completions/stencil\n\
            \x20 stencil completions zsh  > ~/.zfunc/_stencil\n\
            \x20 stencil completions fish > ~/.config/fish/completions/stencil.fish"
    )]
    Completions(CompletionsArgs),

    #[command(
        about = "Inspect configuration",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 stencil config get render.language\n\
            \x20 stencil config list\n\
            \x20 stencil config path"
    )]
    Config(ConfigCommands),
}

// ── merge ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MergeArgs {
    /// JSON files, lowest precedence first.
    #[arg(value_name = "LAYER", required = true, num_args = 1..)]
    pub layers: Vec<PathBuf>,

    /// Merge into the first layer instead of a fresh document.
    #[arg(
        long = "destructive",
        help = "Merge into the first layer in place",
        long_help = "Merge into the first layer in place.\n\n\
                     JSON layers cannot mark a key as absent, so this never deletes a key. \
                     The only visible difference from the default merge is that objects \
                     left empty by the merge are dropped from the output."
    )]
    pub destructive: bool,

    /// Shorthand for `--case snake`.
    #[arg(
        long = "decamelize",
        conflicts_with = "case",
        help = "Convert keys to snake_case"
    )]
    pub decamelize: bool,

    /// Target key convention; enables key rewriting.
    #[arg(
        long = "case",
        value_name = "CASE",
        help = "Rewrite keys: snake, kebab, camel, pascal, screaming"
    )]
    pub case: Option<KeyCase>,

    /// Keys at or below this dotted path keep their spelling. Repeatable.
    #[arg(
        long = "keep",
        value_name = "PATH",
        help = "Leave keys below this dotted path untouched"
    )]
    pub keep: Vec<String>,

    #[arg(
        long = "max-depth",
        value_name = "N",
        help = "Nesting limit for key rewriting (default from config)"
    )]
    pub max_depth: Option<usize>,

    /// Write a generated JSON file instead of printing to stdout.
    #[arg(short = 'o', long = "out", value_name = "FILE", help = "Output file")]
    pub out: Option<PathBuf>,

    #[arg(
        long = "readonly",
        requires = "out",
        help = "Mark the output file read-only"
    )]
    pub readonly: bool,
}

// ── render ────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[arg(
        short = 'm',
        long = "manifest",
        value_name = "FILE",
        help = "Type manifest (.jsii JSON)"
    )]
    pub manifest: PathBuf,

    /// A struct fqn, or a class fqn whose constructor options are rendered.
    #[arg(
        short = 't',
        long = "type",
        value_name = "FQN",
        help = "Options type (or project class) to render against"
    )]
    pub type_fqn: String,

    #[arg(
        long = "options",
        value_name = "FILE",
        help = "JSON object with the option values"
    )]
    pub options: PathBuf,

    #[arg(
        short = 'l',
        long = "lang",
        value_enum,
        help = "Target language (default from config)"
    )]
    pub language: Option<Language>,
}

// ── projenrc ──────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProjenrcArgs {
    #[arg(
        short = 'm',
        long = "manifest",
        value_name = "FILE",
        help = "Type manifest (.jsii JSON)"
    )]
    pub manifest: PathBuf,

    #[arg(
        short = 't',
        long = "project-type",
        value_name = "FQN",
        help = "Project class to construct"
    )]
    pub project_type: String,

    #[arg(
        long = "options",
        value_name = "FILE",
        help = "JSON object with the project options"
    )]
    pub options: PathBuf,

    /// `ClassName` or `pkg.sub.ClassName`.
    #[arg(
        long = "class-name",
        value_name = "NAME",
        help = "Generated class name (default from config)"
    )]
    pub class_name: Option<String>,

    #[arg(
        long = "main-scope",
        help = "Place the class under src/main/java instead of src/test/java"
    )]
    pub main_scope: bool,

    #[arg(
        short = 'o',
        long = "out",
        value_name = "DIR",
        default_value = ".",
        help = "Project root"
    )]
    pub out: PathBuf,

    #[arg(long = "dry-run", help = "Show what would be written")]
    pub dry_run: bool,
}

// ── lambda ────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LambdaArgs {
    #[arg(
        short = 'e',
        long = "entrypoint",
        value_name = "PATH",
        help = "Handler file ending in .lambda.ts, relative to the project root"
    )]
    pub entrypoint: String,

    #[arg(
        long = "bundle-outfile",
        value_name = "PATH",
        help = "Bundled handler (default: assets/<name>/index.js)"
    )]
    pub bundle_outfile: Option<String>,

    #[arg(
        long = "construct-file",
        value_name = "PATH",
        help = "Generated .ts file (default: <entrypoint>-function.ts)"
    )]
    pub construct_file: Option<String>,

    #[arg(
        long = "construct-name",
        value_name = "NAME",
        help = "Generated class name (default: <Name>Function)"
    )]
    pub construct_name: Option<String>,

    #[arg(
        long = "runtime",
        value_name = "RUNTIME",
        default_value = "nodejs14.x",
        help = "nodejs10.x, nodejs12.x or nodejs14.x"
    )]
    pub runtime: LambdaRuntime,

    #[arg(
        short = 'o',
        long = "out",
        value_name = "DIR",
        default_value = ".",
        help = "Project root"
    )]
    pub out: PathBuf,

    #[arg(long = "dry-run", help = "Show what would be written")]
    pub dry_run: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `render.language`.
        key: String,
    },
    /// Print the effective configuration.
    List,
    /// Print the path of the default configuration file.
    Path,
}

// ── value enums ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Language {
    Java,
    /// Also accepted as `py`.
    #[value(alias = "py")]
    Python,
}

impl From<Language> for TargetLanguage {
    fn from(language: Language) -> Self {
        match language {
            Language::Java => TargetLanguage::Java,
            Language::Python => TargetLanguage::Python,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", TargetLanguage::from(*self))
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_merge_command() {
        let cli = Cli::parse_from([
            "stencil",
            "merge",
            "a.json",
            "b.json",
            "--case",
            "kebab",
            "--keep",
            "env",
            "--keep",
            "labels",
        ]);
        let Commands::Merge(args) = cli.command else {
            panic!("expected Merge command");
        };
        assert_eq!(args.layers.len(), 2);
        assert_eq!(args.case, Some(KeyCase::Kebab));
        assert_eq!(args.keep, ["env", "labels"]);
        assert!(!args.destructive);
    }

    #[test]
    fn merge_requires_a_layer() {
        assert!(Cli::try_parse_from(["stencil", "merge"]).is_err());
    }

    #[test]
    fn decamelize_conflicts_with_case() {
        let result =
            Cli::try_parse_from(["stencil", "merge", "a.json", "--decamelize", "--case", "camel"]);
        assert!(result.is_err());
    }

    #[test]
    fn python_alias() {
        let cli = Cli::parse_from([
            "stencil", "render", "-m", "m.json", "-t", "a.B", "--options", "o.json", "-l", "py",
        ]);
        let Commands::Render(args) = cli.command else {
            panic!("expected Render command");
        };
        assert_eq!(args.language, Some(Language::Python));
        assert_eq!(TargetLanguage::from(Language::Python), TargetLanguage::Python);
    }

    #[test]
    fn lambda_runtime_parses() {
        let cli = Cli::parse_from([
            "stencil",
            "lambda",
            "--entrypoint",
            "src/a.lambda.ts",
            "--runtime",
            "nodejs12.x",
        ]);
        let Commands::Lambda(args) = cli.command else {
            panic!("expected Lambda command");
        };
        assert_eq!(args.runtime, LambdaRuntime::Nodejs12X);
        assert_eq!(args.out, PathBuf::from("."));

        let bad = Cli::try_parse_from([
            "stencil",
            "lambda",
            "--entrypoint",
            "src/a.lambda.ts",
            "--runtime",
            "python3.9",
        ]);
        assert!(bad.is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["stencil", "--quiet", "--verbose", "config", "path"]);
        assert!(result.is_err());
    }
}
