//! Cross-language options rendering.
//!
//! Turns an options mapping plus the manifest entry of its struct type into
//! a constructor expression in a target language. Textual values of options
//! typed as enums become enum references, and every enum referenced this
//! way is collected as an import.

pub mod source;
pub mod syntax;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::error::DomainError;
use super::manifest::{TypeManifestEntry, TypeManifestReader};
use super::util::enum_member_name;
use super::value::{ConfigValue, Mapping};

pub use source::{SourceBuilder, SourceLine};
pub use syntax::{JavaSyntax, PythonSyntax, TargetSyntax};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    #[default]
    Java,
    Python,
}

impl TargetLanguage {
    pub const ALL: [TargetLanguage; 2] = [Self::Java, Self::Python];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Python => "python",
        }
    }

    pub fn syntax(self) -> Box<dyn TargetSyntax> {
        match self {
            Self::Java => Box::new(JavaSyntax),
            Self::Python => Box::new(PythonSyntax),
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetLanguage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "java" => Ok(Self::Java),
            "python" | "py" => Ok(Self::Python),
            _ => Err(DomainError::UnsupportedLanguage {
                name: s.to_string(),
            }),
        }
    }
}

/// Output of [`OptionsRenderer::render`].
///
/// `imports` holds the qualified name of every enum referenced by a
/// fragment, and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedOptions {
    pub fragments: Vec<String>,
    pub imports: BTreeSet<String>,
}

impl RenderedOptions {
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Fragments as one multi-line expression; every line after the first is
    /// prefixed with `indent` spaces.
    pub fn join(&self, indent: usize) -> String {
        self.fragments.join(&format!("\n{}", " ".repeat(indent)))
    }
}

pub struct OptionsRenderer {
    syntax: Box<dyn TargetSyntax>,
}

impl OptionsRenderer {
    pub fn new(syntax: impl TargetSyntax + 'static) -> Self {
        Self {
            syntax: Box::new(syntax),
        }
    }

    pub fn for_language(language: TargetLanguage) -> Self {
        Self {
            syntax: language.syntax(),
        }
    }

    pub fn language(&self) -> TargetLanguage {
        self.syntax.language()
    }

    /// Render `options` as a constructor expression for `options_type`.
    ///
    /// Undefined values are skipped. An option whose declared type is
    /// missing from the manifest falls back to a literal.
    #[instrument(skip_all, fields(options_type = %options_type.fqn, language = %self.language()))]
    pub fn render(
        &self,
        options: &Mapping,
        options_type: &TypeManifestEntry,
        manifest: &dyn TypeManifestReader,
    ) -> RenderedOptions {
        let mut rendered = RenderedOptions::default();
        let present: Vec<(&String, &ConfigValue)> =
            options.iter().filter(|(_, v)| !v.is_undefined()).collect();
        if present.is_empty() {
            return rendered;
        }

        rendered.fragments.push(self.syntax.opener(&options_type.name));
        for (name, value) in present {
            let value = match self.enum_reference(name, value, options_type, manifest) {
                Some((reference, import)) => {
                    rendered.imports.insert(import);
                    reference
                }
                None => self.syntax.literal(value),
            };
            let setter = self.syntax.setter(name);
            rendered
                .fragments
                .push(self.syntax.option_fragment(&setter, &value));
        }
        rendered.fragments.push(self.syntax.closer());

        debug!(
            fragments = rendered.fragments.len(),
            imports = rendered.imports.len(),
            "options rendered"
        );
        rendered
    }

    /// `(EnumName.MEMBER, qualified enum name)` when `name` is an enum-typed
    /// option holding a string.
    fn enum_reference(
        &self,
        name: &str,
        value: &ConfigValue,
        options_type: &TypeManifestEntry,
        manifest: &dyn TypeManifestReader,
    ) -> Option<(String, String)> {
        let text = value.as_str()?;
        let fqn = options_type.option_type(name)?;
        let Some(entry) = manifest.lookup_type(fqn) else {
            debug!(option = name, fqn, "option type not in manifest, rendering literal");
            return None;
        };
        if !entry.is_enum() {
            return None;
        }

        let member = enum_member_name(text);
        if !entry.members.is_empty() && !entry.has_member(&member) {
            warn!(
                option = name,
                enum_type = %entry.fqn,
                member = %member,
                "value is not a declared enum member"
            );
        }
        Some((
            self.syntax.enum_reference(&entry.name, &member),
            entry.qualified_name(),
        ))
    }
}

impl fmt::Debug for OptionsRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsRenderer")
            .field("language", &self.language())
            .finish()
    }
}
