use std::collections::HashSet;

use serde::Serialize;

use crate::domain::{entities::common::RelativePath, error::DomainError, util::FileMode};

/// Marker text placed in generated files that support comments (or a
/// `"//"` key in JSON).
pub const GENERATED_MARKER: &str =
    "~~ Generated by stencil. To modify, edit the project definition and run \"stencil\".";

/// A file produced by a generation pass, not yet written anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: RelativePath,
    pub content: String,
    pub mode: FileMode,
}

impl GeneratedFile {
    pub fn new(path: RelativePath, content: impl Into<String>) -> Self {
        Self {
            path,
            content: content.into(),
            mode: FileMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: FileMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// Summary row for listing what a pass produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFileInfo {
    pub path: String,
    pub mode: String,
    pub bytes: usize,
}

impl From<&GeneratedFile> for GeneratedFileInfo {
    fn from(file: &GeneratedFile) -> Self {
        Self {
            path: file.path.to_string(),
            mode: file.mode.triplet().to_string(),
            bytes: file.size(),
        }
    }
}

/// The full output of one generation pass.
#[derive(Debug, Clone, Default)]
pub struct GeneratedFiles {
    files: Vec<GeneratedFile>,
}

impl GeneratedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    pub fn with_file(mut self, file: GeneratedFile) -> Self {
        self.push(file);
        self
    }

    /// Every path must be unique.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for file in &self.files {
            if !seen.insert(&file.path) {
                return Err(DomainError::DuplicatePath {
                    path: file.path.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl IntoIterator for GeneratedFiles {
    type Item = GeneratedFile;
    type IntoIter = std::vec::IntoIter<GeneratedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

impl FromIterator<GeneratedFile> for GeneratedFiles {
    fn from_iter<I: IntoIterator<Item = GeneratedFile>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> GeneratedFile {
        GeneratedFile::new(RelativePath::try_new(path).unwrap(), "x")
    }

    #[test]
    fn duplicates_are_rejected() {
        let files = GeneratedFiles::new()
            .with_file(file("a.txt"))
            .with_file(file("a.txt"));
        assert_eq!(
            files.validate(),
            Err(DomainError::DuplicatePath {
                path: "a.txt".into()
            })
        );
    }

    #[test]
    fn info_reports_mode_triplet() {
        let f = file("bin/run").with_mode(FileMode::from_flags(true, true));
        let info = GeneratedFileInfo::from(&f);
        assert_eq!(info.mode, "500");
        assert_eq!(info.bytes, 1);
        assert_eq!(info.path, "bin/run");
    }
}
