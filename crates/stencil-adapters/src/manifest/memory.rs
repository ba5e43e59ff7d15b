//! In-memory manifest for embedding and tests.

use std::collections::HashMap;

use stencil_core::{
    application::ports::TypeManifestReader,
    domain::{TargetLanguage, TypeManifestEntry},
};

#[derive(Debug, Clone, Default)]
pub struct InMemoryManifest {
    types: HashMap<String, TypeManifestEntry>,
    packages: HashMap<TargetLanguage, String>,
}

impl InMemoryManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a type, keyed by its fqn.
    pub fn insert(&mut self, entry: TypeManifestEntry) {
        self.types.insert(entry.fqn.clone(), entry);
    }

    pub fn with_type(mut self, entry: TypeManifestEntry) -> Self {
        self.insert(entry);
        self
    }

    pub fn with_target_package(
        mut self,
        language: TargetLanguage,
        package: impl Into<String>,
    ) -> Self {
        self.packages.insert(language, package.into());
        self
    }
}

impl TypeManifestReader for InMemoryManifest {
    fn lookup_type(&self, fqn: &str) -> Option<TypeManifestEntry> {
        self.types.get(fqn).cloned()
    }

    fn target_package(&self, language: TargetLanguage) -> Option<String> {
        self.packages.get(&language).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_insert_replaces() {
        let manifest = InMemoryManifest::new()
            .with_type(TypeManifestEntry::class("a.B", "B"))
            .with_type(TypeManifestEntry::enumeration("a.B", "B"))
            .with_target_package(TargetLanguage::Python, "a");

        assert!(manifest.lookup_type("a.B").unwrap().is_enum());
        assert_eq!(manifest.target_package(TargetLanguage::Python).as_deref(), Some("a"));
        assert_eq!(manifest.target_package(TargetLanguage::Java), None);
    }
}
