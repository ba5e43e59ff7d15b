//! Type manifest model: what the renderer knows about the target API.

use serde::{Deserialize, Serialize};

use super::render::TargetLanguage;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
    Enum,
    Interface,
}

/// One option (property) of a struct type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDecl {
    pub name: String,
    /// Fully-qualified name of the referenced type, when it is a named type.
    pub type_fqn: Option<String>,
}

impl OptionDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_fqn: None,
        }
    }

    pub fn typed(name: impl Into<String>, fqn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_fqn: Some(fqn.into()),
        }
    }
}

/// A single type declared by the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeManifestEntry {
    pub fqn: String,
    pub name: String,
    pub namespace: Option<String>,
    pub kind: TypeKind,
    pub options: Vec<OptionDecl>,
    pub members: Vec<String>,
    /// Fqn of the struct taken by the constructor, for class types.
    pub initializer_options: Option<String>,
}

impl TypeManifestEntry {
    pub fn new(fqn: impl Into<String>, name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            fqn: fqn.into(),
            name: name.into(),
            namespace: None,
            kind,
            options: Vec::new(),
            members: Vec::new(),
            initializer_options: None,
        }
    }

    pub fn class(fqn: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(fqn, name, TypeKind::Class)
    }

    pub fn structure(fqn: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(fqn, name, TypeKind::Struct)
    }

    pub fn enumeration(fqn: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(fqn, name, TypeKind::Enum)
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_option(mut self, option: OptionDecl) -> Self {
        self.options.push(option);
        self
    }

    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.members.push(member.into());
        self
    }

    pub fn with_initializer_options(mut self, fqn: impl Into<String>) -> Self {
        self.initializer_options = Some(fqn.into());
        self
    }

    /// Name relative to the package root: `namespace.Name`, or `Name` when
    /// the type lives at the root.
    pub fn qualified_name(&self) -> String {
        match self.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => format!("{ns}.{}", self.name),
            _ => self.name.clone(),
        }
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    /// Fqn referenced by the option called `name`, if declared with one.
    pub fn option_type(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.name == name)
            .and_then(|o| o.type_fqn.as_deref())
    }

    pub fn has_member(&self, member: &str) -> bool {
        self.members.iter().any(|m| m == member)
    }
}

/// Read-only view of a type manifest.
///
/// Implemented by:
/// - `stencil_adapters::manifest::JsonManifestReader` (jsii-style JSON)
/// - `stencil_adapters::manifest::InMemoryManifest` (embedding, tests)
#[cfg_attr(test, mockall::automock)]
pub trait TypeManifestReader: Send + Sync {
    fn lookup_type(&self, fqn: &str) -> Option<TypeManifestEntry>;

    /// Options struct taken by the constructor of `constructor_fqn`.
    fn lookup_options_type(&self, constructor_fqn: &str) -> Option<TypeManifestEntry> {
        let constructor = self.lookup_type(constructor_fqn)?;
        self.lookup_type(constructor.initializer_options.as_deref()?)
    }

    /// Package (Java) or module (Python) that prefixes every import.
    fn target_package(&self, _language: TargetLanguage) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn npm_access() -> TypeManifestEntry {
        TypeManifestEntry::enumeration("projen.javascript.NpmAccess", "NpmAccess")
            .with_namespace("javascript")
            .with_member("PUBLIC")
            .with_member("RESTRICTED")
    }

    #[test]
    fn qualified_name_joins_namespace() {
        assert_eq!(npm_access().qualified_name(), "javascript.NpmAccess");
        assert_eq!(
            TypeManifestEntry::class("projen.Project", "Project").qualified_name(),
            "Project"
        );
        assert_eq!(
            TypeManifestEntry::class("projen.Project", "Project")
                .with_namespace("")
                .qualified_name(),
            "Project"
        );
    }

    #[test]
    fn option_lookup() {
        let options = TypeManifestEntry::structure("projen.NodeProjectOptions", "NodeProjectOptions")
            .with_option(OptionDecl::new("name"))
            .with_option(OptionDecl::typed("npmAccess", "projen.javascript.NpmAccess"));

        assert_eq!(options.option_type("npmAccess"), Some("projen.javascript.NpmAccess"));
        assert_eq!(options.option_type("name"), None);
        assert_eq!(options.option_type("missing"), None);
    }

    #[test]
    fn members_and_kind() {
        let e = npm_access();
        assert!(e.is_enum());
        assert!(e.has_member("PUBLIC"));
        assert!(!e.has_member("public"));
    }

    /// The default method follows the initializer to its options struct.
    struct Fixed(Vec<TypeManifestEntry>);

    impl TypeManifestReader for Fixed {
        fn lookup_type(&self, fqn: &str) -> Option<TypeManifestEntry> {
            self.0.iter().find(|t| t.fqn == fqn).cloned()
        }
    }

    #[test]
    fn lookup_options_type_follows_initializer() {
        let manifest = Fixed(vec![
            TypeManifestEntry::class("projen.java.JavaProject", "JavaProject")
                .with_namespace("java")
                .with_initializer_options("projen.java.JavaProjectOptions"),
            TypeManifestEntry::structure("projen.java.JavaProjectOptions", "JavaProjectOptions")
                .with_namespace("java"),
            TypeManifestEntry::class("projen.Orphan", "Orphan"),
        ]);

        let options = manifest.lookup_options_type("projen.java.JavaProject").unwrap();
        assert_eq!(options.name, "JavaProjectOptions");
        assert!(manifest.lookup_options_type("projen.Orphan").is_none());
        assert!(manifest.lookup_options_type("projen.Missing").is_none());
        assert_eq!(manifest.target_package(TargetLanguage::Java), None);
    }
}
