//! Lambda construct Service - generates a typed `lambda.Function` subclass
//! for a handler entrypoint.
//!
//! The construct is bound to the bundled handler through a path relative to
//! the generated source file. Bundling itself happens elsewhere; this service
//! only needs to know where the bundle lands.

use std::fmt;
use std::str::FromStr;

use heck::ToUpperCamelCase;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    domain::{
        DomainError, FileMode, GeneratedFile, RelativePath, SourceBuilder,
        entities::generated::GENERATED_MARKER,
    },
    error::StencilResult,
};

/// Suffix every handler entrypoint must carry.
pub const LAMBDA_EXT: &str = ".lambda.ts";

/// Directory bundles are written to when no outfile is given.
pub const DEFAULT_BUNDLE_DIR: &str = "assets";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LambdaRuntime {
    Nodejs10X,
    Nodejs12X,
    #[default]
    Nodejs14X,
}

impl LambdaRuntime {
    /// Member of `lambda.Runtime` to reference.
    pub fn function_runtime(self) -> &'static str {
        match self {
            Self::Nodejs10X => "NODEJS_10_X",
            Self::Nodejs12X => "NODEJS_12_X",
            Self::Nodejs14X => "NODEJS_14_X",
        }
    }

    /// Bundler target for this runtime.
    pub fn esbuild_target(self) -> &'static str {
        match self {
            Self::Nodejs10X => "node10",
            Self::Nodejs12X => "node12",
            Self::Nodejs14X => "node14",
        }
    }
}

impl fmt::Display for LambdaRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.function_runtime())
    }
}

impl FromStr for LambdaRuntime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();
        match digits.as_str() {
            "10" => Ok(Self::Nodejs10X),
            "12" => Ok(Self::Nodejs12X),
            "14" => Ok(Self::Nodejs14X),
            _ => Err(format!(
                "unsupported runtime '{s}' (expected nodejs10.x, nodejs12.x or nodejs14.x)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LambdaOptions {
    /// Handler file relative to the project root, e.g. `src/foo.lambda.ts`.
    pub entrypoint: String,
    /// Defaults to the entrypoint with `-function.ts` instead of `.lambda.ts`.
    pub construct_file: Option<String>,
    /// Defaults to the pascal-cased entrypoint name plus `Function`.
    pub construct_name: Option<String>,
    pub runtime: LambdaRuntime,
    /// Bundle produced for the entrypoint, relative to the project root.
    pub bundle_outfile: Option<String>,
}

impl LambdaOptions {
    pub fn new(entrypoint: impl Into<String>) -> Self {
        Self {
            entrypoint: entrypoint.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct LambdaConstructService {
    indent_width: usize,
}

impl Default for LambdaConstructService {
    fn default() -> Self {
        Self { indent_width: 2 }
    }
}

impl LambdaConstructService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    #[instrument(skip_all, fields(entrypoint = %options.entrypoint, runtime = %options.runtime))]
    pub fn generate(&self, options: &LambdaOptions) -> StencilResult<GeneratedFile> {
        let entrypoint = options.entrypoint.as_str();
        let Some(stem_path) = entrypoint.strip_suffix(LAMBDA_EXT) else {
            return Err(DomainError::InvalidSourceFile {
                path: entrypoint.to_string(),
                reason: format!("must have a {LAMBDA_EXT} extension"),
            }
            .into());
        };
        let base_path = normalize(stem_path);
        let base_name = base_path.rsplit('/').next().unwrap_or_default();

        let construct_file = options
            .construct_file
            .clone()
            .unwrap_or_else(|| format!("{base_path}-function.ts"));
        if !construct_file.ends_with(".ts") {
            return Err(DomainError::InvalidSourceFile {
                path: construct_file,
                reason: "construct file name must have a .ts extension".into(),
            }
            .into());
        }

        let construct_name = options
            .construct_name
            .clone()
            .unwrap_or_else(|| format!("{}Function", base_name.to_upper_camel_case()));
        let props_type = format!("{construct_name}Props");

        let outfile = options
            .bundle_outfile
            .clone()
            .unwrap_or_else(|| default_bundle_outfile(&base_path));
        let asset_dir = relative(parent(&normalize(&construct_file)), parent(&normalize(&outfile)));

        let mut src = SourceBuilder::new();
        src.line(format!("// {GENERATED_MARKER}"))
            .line("import * as path from 'path';")
            .line("import * as lambda from '@aws-cdk/aws-lambda';")
            .line("import { Construct } from '@aws-cdk/core';")
            .blank()
            .line("/**")
            .line(format!(" * Props for {construct_name}"))
            .line(" */")
            .open(format!("export interface {props_type} extends lambda.FunctionOptions {{"))
            .close("}")
            .blank()
            .line("/**")
            .line(format!(" * An AWS Lambda function which executes {base_path}."))
            .line(" */")
            .open(format!("export class {construct_name} extends lambda.Function {{"))
            .open(format!(
                "constructor(scope: Construct, id: string, props?: {props_type}) {{"
            ))
            .open("super(scope, id, {")
            .line(format!("description: '{entrypoint}',"))
            .line("...props,")
            .line(format!("runtime: lambda.Runtime.{},", options.runtime.function_runtime()))
            .line("handler: 'index.handler',")
            .line(format!(
                "code: lambda.Code.fromAsset(path.join(__dirname, '{asset_dir}')),"
            ))
            .close("});")
            .close("}")
            .close("}");

        debug!(
            "{base_path}: construct \"{construct_name}\" generated under \"{construct_file}\""
        );
        let path = RelativePath::try_new(&construct_file)?;
        Ok(GeneratedFile::new(path, src.render(self.indent_width))
            .with_mode(FileMode::from_flags(true, false)))
    }
}

/// `assets/<name>/index.js`, where `<name>` is the entrypoint base path with
/// a leading `src/` dropped.
pub fn default_bundle_outfile(base_path: &str) -> String {
    let name = base_path.strip_prefix("src/").unwrap_or(base_path);
    format!("{DEFAULT_BUNDLE_DIR}/{name}/index.js")
}

/// Collapse `.`, `..` and empty segments of a posix path.
fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

fn parent(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Posix path from directory `from` to directory `to`; `.` when equal.
fn relative(from: &str, to: &str) -> String {
    let from: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let to: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<&str> = vec![".."; from.len() - common];
    parts.extend(&to[common..]);
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StencilError;

    #[test]
    fn generates_construct_next_to_entrypoint() {
        let file = LambdaConstructService::new()
            .generate(&LambdaOptions::new("src/foo/bar/resize-image.lambda.ts"))
            .unwrap();

        assert_eq!(file.path.to_string(), "src/foo/bar/resize-image-function.ts");
        assert_eq!(file.mode, FileMode::ReadOnly);
        assert_eq!(
            file.content,
            "\
// ~~ Generated by stencil. To modify, edit the project definition and run \"stencil\".
import * as path from 'path';
import * as lambda from '@aws-cdk/aws-lambda';
import { Construct } from '@aws-cdk/core';

/**
 * Props for ResizeImageFunction
 */
export interface ResizeImageFunctionProps extends lambda.FunctionOptions {
}

/**
 * An AWS Lambda function which executes src/foo/bar/resize-image.
 */
export class ResizeImageFunction extends lambda.Function {
  constructor(scope: Construct, id: string, props?: ResizeImageFunctionProps) {
    super(scope, id, {
      description: 'src/foo/bar/resize-image.lambda.ts',
      ...props,
      runtime: lambda.Runtime.NODEJS_14_X,
      handler: 'index.handler',
      code: lambda.Code.fromAsset(path.join(__dirname, '../../../assets/foo/bar/resize-image')),
    });
  }
}
"
        );
    }

    #[test]
    fn explicit_names_and_runtime() {
        let options = LambdaOptions {
            construct_file: Some("src/constructs/thumb.ts".into()),
            construct_name: Some("Thumbnailer".into()),
            runtime: LambdaRuntime::Nodejs12X,
            bundle_outfile: Some("build/thumb/index.js".into()),
            ..LambdaOptions::new("src/handlers/thumb.lambda.ts")
        };
        let file = LambdaConstructService::new().generate(&options).unwrap();

        assert_eq!(file.path.to_string(), "src/constructs/thumb.ts");
        assert!(file.content.contains("export class Thumbnailer extends lambda.Function {"));
        assert!(file.content.contains("props?: ThumbnailerProps"));
        assert!(file.content.contains("lambda.Runtime.NODEJS_12_X"));
        assert!(file.content.contains("path.join(__dirname, '../../build/thumb')"));
    }

    #[test]
    fn rejects_bad_file_names() {
        let service = LambdaConstructService::new();

        let err = service.generate(&LambdaOptions::new("src/foo.ts")).unwrap_err();
        assert!(matches!(
            err,
            StencilError::Domain(DomainError::InvalidSourceFile { ref path, .. }) if path == "src/foo.ts"
        ));

        let options = LambdaOptions {
            construct_file: Some("src/foo.js".into()),
            ..LambdaOptions::new("src/foo.lambda.ts")
        };
        assert!(service.generate(&options).is_err());
    }

    #[test]
    fn relative_paths() {
        assert_eq!(relative("src/a", "src/a"), ".");
        assert_eq!(relative("", "assets/x"), "assets/x");
        assert_eq!(relative("src/a/b", "src/c"), "../../c");
        assert_eq!(normalize("./src//a/../b"), "src/b");
        assert_eq!(default_bundle_outfile("src/api/get"), "assets/api/get/index.js");
        assert_eq!(default_bundle_outfile("lib/get"), "assets/lib/get/index.js");
    }

    #[test]
    fn runtime_parsing() {
        assert_eq!("nodejs12.x".parse::<LambdaRuntime>().unwrap(), LambdaRuntime::Nodejs12X);
        assert_eq!("14".parse::<LambdaRuntime>().unwrap(), LambdaRuntime::Nodejs14X);
        assert!("python3.9".parse::<LambdaRuntime>().is_err());
        assert_eq!(LambdaRuntime::default().esbuild_target(), "node14");
    }
}
