//! Java projenrc Service - generates the Java entrypoint that defines a
//! project.
//!
//! The generated class constructs the project type with its initialization
//! options rendered as a builder chain, then calls `synth()`.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{
    application::ports::TypeManifestReader,
    domain::{
        DomainError, GeneratedFile, Mapping, OptionsRenderer, RelativePath, SourceBuilder,
        TargetLanguage, TypeManifestEntry, dedup,
    },
    error::StencilResult,
};

/// Where and how the projenrc class is generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjenrcOptions {
    /// Class name, optionally package-qualified (`org.acme.Projenrc`).
    pub class_name: String,
    /// `src/test/java` instead of `src/main/java`.
    pub test_scope: bool,
    pub indent_width: usize,
}

impl Default for ProjenrcOptions {
    fn default() -> Self {
        Self {
            class_name: "projenrc".to_string(),
            test_scope: true,
            indent_width: 4,
        }
    }
}

/// A class name split into package and simple name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaClassName {
    pub package: Vec<String>,
    pub class: String,
}

impl JavaClassName {
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        let mut segments: Vec<String> = name.split('.').map(str::to_string).collect();
        if let Some(bad) = segments.iter().find(|s| !is_java_identifier(s)) {
            return Err(DomainError::InvalidClassName {
                name: name.to_string(),
                reason: format!("'{bad}' is not a Java identifier"),
            });
        }
        let class = segments.pop().unwrap_or_default();
        Ok(Self {
            package: segments,
            class,
        })
    }

    pub fn package_name(&self) -> Option<String> {
        (!self.package.is_empty()).then(|| self.package.join("."))
    }
}

fn is_java_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

pub struct JavaProjenrcService {
    manifest: Box<dyn TypeManifestReader>,
}

impl JavaProjenrcService {
    pub fn new(manifest: Box<dyn TypeManifestReader>) -> Self {
        Self { manifest }
    }

    /// Generate the projenrc class for `project_fqn`.
    ///
    /// Returns `Ok(None)` when the project type or its options type cannot
    /// be resolved from the manifest.
    #[instrument(skip_all, fields(project = project_fqn, class = %options.class_name))]
    pub fn generate(
        &self,
        project_fqn: &str,
        init_options: &Mapping,
        options: &ProjenrcOptions,
    ) -> StencilResult<Option<GeneratedFile>> {
        let class_name = JavaClassName::parse(&options.class_name)?;

        let Some(project_type) = self.manifest.lookup_type(project_fqn) else {
            warn!("cannot find type for project: {project_fqn}");
            return Ok(None);
        };
        let Some(options_type) = self.manifest.lookup_options_type(project_fqn) else {
            warn!("cannot find type for project options of {project_fqn}");
            return Ok(None);
        };

        let content = self.render_class(
            &class_name,
            &project_type,
            &options_type,
            init_options,
            options,
        );
        let path = projenrc_path(&class_name, options.test_scope)?;
        info!(path = %path, "Project definition file generated");
        Ok(Some(GeneratedFile::new(path, content)))
    }

    fn render_class(
        &self,
        class_name: &JavaClassName,
        project_type: &TypeManifestEntry,
        options_type: &TypeManifestEntry,
        init_options: &Mapping,
        options: &ProjenrcOptions,
    ) -> String {
        let rendered = OptionsRenderer::for_language(TargetLanguage::Java).render(
            init_options,
            options_type,
            &*self.manifest,
        );

        let prefix = self.manifest.target_package(TargetLanguage::Java);
        let import = |qualified: String| match &prefix {
            Some(package) => format!("import {package}.{qualified};"),
            None => format!("import {qualified};"),
        };
        let mut imports = vec![
            import(project_type.qualified_name()),
            import(options_type.qualified_name()),
        ];
        imports.extend(rendered.imports.iter().cloned().map(import));

        let mut src = SourceBuilder::new();
        if let Some(package) = class_name.package_name() {
            src.line(format!("package {package};")).blank();
        }
        for line in dedup(&imports) {
            src.line(line);
        }
        src.blank();
        src.open(format!("public class {} {{", class_name.class));
        src.open("public static void main(String[] args) {");
        // the chain sits two blocks deep and continues one level further in
        src.line(format!(
            "{name} project = new {name}({args});",
            name = project_type.name,
            args = rendered.join(3 * options.indent_width),
        ));
        src.line("project.synth();");
        src.close("}");
        src.close("}");

        src.render(options.indent_width)
    }
}

fn projenrc_path(class_name: &JavaClassName, test_scope: bool) -> StencilResult<RelativePath> {
    let scope = if test_scope { "test" } else { "main" };
    let mut path = RelativePath::try_new(format!("src/{scope}/java"))?;
    for segment in &class_name.package {
        path = path.join(segment)?;
    }
    Ok(path.join(format!("{}.java", class_name.class))?)
}
