//! jsii-style JSON manifest reader.
//!
//! Only the parts the renderer needs are read: type names, kinds, struct
//! properties (including inherited ones), enum members, the first
//! constructor parameter, and per-language package names.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use stencil_core::{
    application::{ApplicationError, ports::TypeManifestReader},
    domain::{OptionDecl, TargetLanguage, TypeKind, TypeManifestEntry},
    error::StencilResult,
};
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    types: HashMap<String, RawType>,
    #[serde(default)]
    targets: RawTargets,
}

#[derive(Debug, Default, Deserialize)]
struct RawTargets {
    java: Option<RawJavaTarget>,
    python: Option<RawPythonTarget>,
}

#[derive(Debug, Deserialize)]
struct RawJavaTarget {
    package: String,
}

#[derive(Debug, Deserialize)]
struct RawPythonTarget {
    module: String,
}

#[derive(Debug, Deserialize)]
struct RawType {
    fqn: String,
    name: String,
    namespace: Option<String>,
    kind: String,
    #[serde(default)]
    datatype: bool,
    initializer: Option<RawInitializer>,
    #[serde(default)]
    properties: Vec<RawProperty>,
    #[serde(default)]
    members: Vec<RawMember>,
    /// Supertypes of an interface.
    #[serde(default)]
    interfaces: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawInitializer {
    #[serde(default)]
    parameters: Vec<RawParameter>,
}

#[derive(Debug, Deserialize)]
struct RawParameter {
    #[serde(rename = "type", default)]
    type_ref: RawTypeRef,
}

#[derive(Debug, Deserialize)]
struct RawProperty {
    name: String,
    #[serde(rename = "type", default)]
    type_ref: RawTypeRef,
}

#[derive(Debug, Default, Deserialize)]
struct RawTypeRef {
    fqn: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMember {
    name: String,
}

impl RawType {
    fn kind(&self) -> TypeKind {
        match self.kind.as_str() {
            "class" => TypeKind::Class,
            "enum" => TypeKind::Enum,
            "struct" => TypeKind::Struct,
            "interface" if self.datatype => TypeKind::Struct,
            _ => TypeKind::Interface,
        }
    }
}

/// Manifest loaded from a jsii `.jsii`-shaped JSON document.
#[derive(Debug, Clone, Default)]
pub struct JsonManifestReader {
    types: HashMap<String, TypeManifestEntry>,
    java_package: Option<String>,
    python_module: Option<String>,
}

impl JsonManifestReader {
    /// Parse a manifest document. `source_name` only labels errors.
    pub fn parse(source: &str, source_name: &str) -> StencilResult<Self> {
        let raw: RawManifest =
            serde_json::from_str(source).map_err(|e| ApplicationError::ManifestLoad {
                source_name: source_name.to_string(),
                reason: e.to_string(),
            })?;

        let types = raw
            .types
            .values()
            .map(|t| (t.fqn.clone(), resolve(t, &raw.types)))
            .collect::<HashMap<_, _>>();
        debug!(types = types.len(), "manifest parsed");

        Ok(Self {
            types,
            java_package: raw.targets.java.map(|t| t.package),
            python_module: raw.targets.python.map(|t| t.module),
        })
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn from_path(path: &Path) -> StencilResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| ApplicationError::ManifestLoad {
            source_name: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&source, &path.display().to_string())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

fn resolve(raw: &RawType, all: &HashMap<String, RawType>) -> TypeManifestEntry {
    let mut options = Vec::new();
    let mut seen_types = HashSet::new();
    let mut seen_options = HashSet::new();
    collect_properties(raw, all, &mut seen_types, &mut seen_options, &mut options);

    TypeManifestEntry {
        fqn: raw.fqn.clone(),
        name: raw.name.clone(),
        namespace: raw.namespace.clone(),
        kind: raw.kind(),
        options,
        members: raw.members.iter().map(|m| m.name.clone()).collect(),
        initializer_options: raw
            .initializer
            .as_ref()
            .and_then(|init| init.parameters.first())
            .and_then(|param| param.type_ref.fqn.clone()),
    }
}

/// Own properties first, then inherited ones; the nearest declaration wins.
fn collect_properties<'a>(
    raw: &'a RawType,
    all: &'a HashMap<String, RawType>,
    seen_types: &mut HashSet<&'a str>,
    seen_options: &mut HashSet<&'a str>,
    out: &mut Vec<OptionDecl>,
) {
    if !seen_types.insert(&raw.fqn) {
        return;
    }
    for prop in &raw.properties {
        if seen_options.insert(&prop.name) {
            out.push(OptionDecl {
                name: prop.name.clone(),
                type_fqn: prop.type_ref.fqn.clone(),
            });
        }
    }
    for parent in raw.interfaces.iter().filter_map(|fqn| all.get(fqn)) {
        collect_properties(parent, all, seen_types, seen_options, out);
    }
}

impl TypeManifestReader for JsonManifestReader {
    fn lookup_type(&self, fqn: &str) -> Option<TypeManifestEntry> {
        self.types.get(fqn).cloned()
    }

    fn target_package(&self, language: TargetLanguage) -> Option<String> {
        match language {
            TargetLanguage::Java => self.java_package.clone(),
            TargetLanguage::Python => self.python_module.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
      "targets": {
        "java": { "package": "org.projen" },
        "python": { "module": "projen" }
      },
      "types": {
        "projen.java.JavaProject": {
          "fqn": "projen.java.JavaProject",
          "name": "JavaProject",
          "namespace": "java",
          "kind": "class",
          "initializer": {
            "parameters": [ { "name": "options", "type": { "fqn": "projen.java.JavaProjectOptions" } } ]
          }
        },
        "projen.java.JavaProjectOptions": {
          "fqn": "projen.java.JavaProjectOptions",
          "name": "JavaProjectOptions",
          "namespace": "java",
          "kind": "interface",
          "datatype": true,
          "interfaces": ["projen.ProjectOptions"],
          "properties": [
            { "name": "groupId", "type": { "primitive": "string" } },
            { "name": "npmAccess", "type": { "fqn": "projen.javascript.NpmAccess" } }
          ]
        },
        "projen.ProjectOptions": {
          "fqn": "projen.ProjectOptions",
          "name": "ProjectOptions",
          "kind": "interface",
          "datatype": true,
          "properties": [
            { "name": "name", "type": { "primitive": "string" } },
            { "name": "groupId", "type": { "fqn": "projen.Shadowed" } }
          ]
        },
        "projen.javascript.NpmAccess": {
          "fqn": "projen.javascript.NpmAccess",
          "name": "NpmAccess",
          "namespace": "javascript",
          "kind": "enum",
          "members": [ { "name": "PUBLIC" }, { "name": "RESTRICTED" } ]
        }
      }
    }"#;

    #[test]
    fn parses_kinds_and_initializer() {
        let manifest = JsonManifestReader::parse(MANIFEST, "test").unwrap();
        assert_eq!(manifest.len(), 4);

        let project = manifest.lookup_type("projen.java.JavaProject").unwrap();
        assert_eq!(project.kind, TypeKind::Class);
        assert_eq!(
            project.initializer_options.as_deref(),
            Some("projen.java.JavaProjectOptions")
        );

        let options = manifest.lookup_options_type("projen.java.JavaProject").unwrap();
        assert_eq!(options.kind, TypeKind::Struct);

        let access = manifest.lookup_type("projen.javascript.NpmAccess").unwrap();
        assert!(access.is_enum());
        assert_eq!(access.members, ["PUBLIC", "RESTRICTED"]);
        assert_eq!(access.qualified_name(), "javascript.NpmAccess");
    }

    #[test]
    fn inherited_properties_are_included_nearest_first() {
        let manifest = JsonManifestReader::parse(MANIFEST, "test").unwrap();
        let options = manifest.lookup_type("projen.java.JavaProjectOptions").unwrap();

        let names: Vec<_> = options.options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["groupId", "npmAccess", "name"]);
        assert_eq!(options.option_type("groupId"), None);
        assert_eq!(options.option_type("npmAccess"), Some("projen.javascript.NpmAccess"));
    }

    #[test]
    fn target_packages() {
        let manifest = JsonManifestReader::parse(MANIFEST, "test").unwrap();
        assert_eq!(
            manifest.target_package(TargetLanguage::Java).as_deref(),
            Some("org.projen")
        );
        assert_eq!(
            manifest.target_package(TargetLanguage::Python).as_deref(),
            Some("projen")
        );
    }

    #[test]
    fn malformed_documents_are_load_errors() {
        let err = JsonManifestReader::parse("{ not json", "broken.jsii").unwrap_err();
        assert!(err.to_string().contains("broken.jsii"));

        let empty = JsonManifestReader::parse("{}", "empty").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".jsii");
        std::fs::write(&path, MANIFEST).unwrap();

        let manifest = JsonManifestReader::from_path(&path).unwrap();
        assert!(manifest.lookup_type("projen.ProjectOptions").is_some());
        assert!(JsonManifestReader::from_path(&dir.path().join("missing")).is_err());
    }
}
