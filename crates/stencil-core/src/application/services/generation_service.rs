//! Generation Service - writes generated files through the filesystem port.
//!
//! 1. Validate the batch (unique, relative paths)
//! 2. Decide per file against the write policy
//! 3. Create parent directories, write, apply the permission triplet

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{GeneratedFile, GeneratedFiles},
    error::StencilResult,
};

/// What to do when a target file already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WritePolicy {
    /// Fail with [`ApplicationError::FileExists`].
    #[default]
    FailIfExists,
    /// Leave the existing file alone and report it as skipped.
    SkipExisting,
    Overwrite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "path", rename_all = "snake_case")]
pub enum WriteOutcome {
    Written(PathBuf),
    Skipped(PathBuf),
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Written(p) | Self::Skipped(p) => p,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }
}

pub struct GenerationService {
    filesystem: Box<dyn Filesystem>,
}

impl GenerationService {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Write `files` below `root`.
    ///
    /// Nothing is written when the batch is invalid or when a file exists
    /// under [`WritePolicy::FailIfExists`].
    #[instrument(skip_all, fields(root = %root.display(), files = files.len(), ?policy))]
    pub fn write(
        &self,
        root: &Path,
        files: &GeneratedFiles,
        policy: WritePolicy,
    ) -> StencilResult<Vec<WriteOutcome>> {
        let plan = self.plan(root, files, policy)?;

        for (file, outcome) in files.iter().zip(&plan) {
            if let WriteOutcome::Written(target) = outcome {
                self.write_one(target, file)?;
            }
        }

        info!(
            written = plan.iter().filter(|o| o.is_written()).count(),
            skipped = plan.iter().filter(|o| !o.is_written()).count(),
            "Generated files written"
        );
        Ok(plan)
    }

    /// What [`write`](Self::write) would do, without touching anything.
    pub fn plan(
        &self,
        root: &Path,
        files: &GeneratedFiles,
        policy: WritePolicy,
    ) -> StencilResult<Vec<WriteOutcome>> {
        files.validate()?;

        files
            .iter()
            .map(|file| {
                let target = root.join(file.path.as_path());
                if !self.filesystem.exists(&target) {
                    return Ok(WriteOutcome::Written(target));
                }
                match policy {
                    WritePolicy::Overwrite => Ok(WriteOutcome::Written(target)),
                    WritePolicy::SkipExisting => {
                        debug!(path = %target.display(), "exists, skipping");
                        Ok(WriteOutcome::Skipped(target))
                    }
                    WritePolicy::FailIfExists => {
                        Err(ApplicationError::FileExists { path: target }.into())
                    }
                }
            })
            .collect()
    }

    fn write_one(&self, target: &Path, file: &GeneratedFile) -> StencilResult<()> {
        if let Some(parent) = target.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(target, &file.content)?;
        self.filesystem.set_mode(target, file.mode)?;
        debug!(path = %target.display(), mode = %file.mode, bytes = file.size(), "wrote file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::output::MockFilesystem;
    use crate::domain::{FileMode, RelativePath};
    use crate::error::StencilError;
    use mockall::predicate::*;

    fn batch() -> GeneratedFiles {
        GeneratedFiles::new().with_file(
            GeneratedFile::new(RelativePath::try_new("src/a.ts").unwrap(), "x")
                .with_mode(FileMode::ReadOnly),
        )
    }

    #[test]
    fn writes_new_files_with_mode() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir_all()
            .with(eq(Path::new("/out/src")))
            .times(1)
            .returning(|_| Ok(()));
        fs.expect_write_file()
            .withf(|p, c| p == Path::new("/out/src/a.ts") && c == "x")
            .times(1)
            .returning(|_, _| Ok(()));
        fs.expect_set_mode()
            .with(eq(Path::new("/out/src/a.ts")), eq(FileMode::ReadOnly))
            .times(1)
            .returning(|_, _| Ok(()));

        let outcomes = GenerationService::new(Box::new(fs))
            .write(Path::new("/out"), &batch(), WritePolicy::FailIfExists)
            .unwrap();
        assert_eq!(outcomes, [WriteOutcome::Written(PathBuf::from("/out/src/a.ts"))]);
    }

    #[test]
    fn existing_file_is_skipped() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_write_file().never();

        let outcomes = GenerationService::new(Box::new(fs))
            .write(Path::new("/out"), &batch(), WritePolicy::SkipExisting)
            .unwrap();
        assert!(!outcomes[0].is_written());
    }

    #[test]
    fn existing_file_fails_without_overwrite() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_write_file().never();

        let err = GenerationService::new(Box::new(fs))
            .write(Path::new("/out"), &batch(), WritePolicy::FailIfExists)
            .unwrap_err();
        assert!(matches!(
            err,
            StencilError::Application(ApplicationError::FileExists { .. })
        ));
    }

    #[test]
    fn plan_never_writes() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_write_file().never();
        fs.expect_create_dir_all().never();

        let plan = GenerationService::new(Box::new(fs))
            .plan(Path::new("/out"), &batch(), WritePolicy::Overwrite)
            .unwrap();
        assert!(plan[0].is_written());
    }
}
