//! Scratch directories for one pipeline run
//!
//! A [`StagingArea`] owns the retrieve and deploy roots for a single
//! run. Cleanup is the temp-dir drop guard, so the directories are
//! removed on every exit path — success, error, and panic unwinding
//! alike — not only on the happy path.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::{Error, Result};

/// Retrieve and deploy roots scoped to a single pipeline run.
///
/// Exclusive to one run; concurrent runs each create their own.
#[derive(Debug)]
pub struct StagingArea {
    temp: TempDir,
    retrieve_root: PathBuf,
    deploy_root: PathBuf,
}

impl StagingArea {
    /// Create the staging area with empty `retrieve/` and `deploy/`
    /// directories.
    pub fn create() -> Result<Self> {
        let temp = TempDir::new().map_err(|e| Error::io(std::env::temp_dir(), e))?;
        let retrieve_root = temp.path().join("retrieve");
        let deploy_root = temp.path().join("deploy");
        std::fs::create_dir(&retrieve_root).map_err(|e| Error::io(&retrieve_root, e))?;
        std::fs::create_dir(&deploy_root).map_err(|e| Error::io(&deploy_root, e))?;
        Ok(Self {
            temp,
            retrieve_root,
            deploy_root,
        })
    }

    /// Directory retrieved content is extracted into.
    pub fn retrieve_root(&self) -> &Path {
        &self.retrieve_root
    }

    /// Directory transformed content is staged in for deployment.
    pub fn deploy_root(&self) -> &Path {
        &self.deploy_root
    }

    /// The run-scoped parent of both roots.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }
}
