//! Recording in-memory transfer client

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use metl_core::{DeployOptions, DeployResult, DeployStatus, Error, Result, TransferClient};

/// Snapshot of one deploy call: the manifest that was staged, every
/// staged file keyed by its sorted relative path, and the options the
/// call carried.
#[derive(Debug, Clone)]
pub struct RecordedDeploy {
    pub manifest: String,
    pub contents: std::collections::BTreeMap<String, String>,
    pub options: DeployOptions,
}

impl RecordedDeploy {
    /// The staged relative paths, sorted.
    pub fn files(&self) -> Vec<&str> {
        self.contents.keys().map(String::as_str).collect()
    }
}

/// A [`TransferClient`] that serves canned fixtures on retrieve and
/// records what each deploy staged.
///
/// The deploy root is consumed while the call runs — the real client
/// archives it the same way — because the staging area is destroyed
/// when the run ends.
#[derive(Debug, Default)]
pub struct MockTransferClient {
    fixtures: Vec<(PathBuf, String)>,
    deploy_status: Option<DeployStatus>,
    retrieve_failure: Option<String>,
    deploy_failure: Option<String>,
    retrieve_manifests: RefCell<Vec<String>>,
    deploys: RefCell<Vec<RecordedDeploy>>,
}

impl MockTransferClient {
    pub fn new() -> Self {
        Self {
            deploy_status: Some(DeployStatus::Succeeded),
            ..Self::default()
        }
    }

    /// Serve `content` at `relative_path` under the retrieve root on
    /// every retrieve call.
    pub fn with_fixture(mut self, relative_path: impl Into<PathBuf>, content: &str) -> Self {
        self.fixtures.push((relative_path.into(), content.to_string()));
        self
    }

    /// Report this status from deploy calls.
    pub fn with_deploy_status(mut self, status: DeployStatus) -> Self {
        self.deploy_status = Some(status);
        self
    }

    /// Fail every retrieve call with this message.
    pub fn failing_retrieve(mut self, message: &str) -> Self {
        self.retrieve_failure = Some(message.to_string());
        self
    }

    /// Fail every deploy call with this message.
    pub fn failing_deploy(mut self, message: &str) -> Self {
        self.deploy_failure = Some(message.to_string());
        self
    }

    /// The manifests passed to retrieve calls, in call order.
    pub fn retrieve_manifests(&self) -> Vec<String> {
        self.retrieve_manifests.borrow().clone()
    }

    /// The recorded deploy calls, in call order.
    pub fn deploys(&self) -> Vec<RecordedDeploy> {
        self.deploys.borrow().clone()
    }
}

impl TransferClient for MockTransferClient {
    fn retrieve(&self, manifest_xml: &str, _api_version: &str, dest: &Path) -> Result<()> {
        if let Some(message) = &self.retrieve_failure {
            return Err(Error::remote("retrieve", message.clone()));
        }
        self.retrieve_manifests
            .borrow_mut()
            .push(manifest_xml.to_string());

        for (relative_path, content) in &self.fixtures {
            let path = dest.join(relative_path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            fs::write(&path, content).map_err(|e| Error::io(&path, e))?;
        }
        Ok(())
    }

    fn deploy(&self, deploy_root: &Path, options: &DeployOptions) -> Result<DeployResult> {
        if let Some(message) = &self.deploy_failure {
            return Err(Error::remote("deploy", message.clone()));
        }

        let manifest_path = deploy_root.join("package.xml");
        let manifest =
            fs::read_to_string(&manifest_path).map_err(|e| Error::io(&manifest_path, e))?;

        let mut contents = std::collections::BTreeMap::new();
        collect_files(deploy_root, deploy_root, &mut contents)?;

        self.deploys.borrow_mut().push(RecordedDeploy {
            manifest,
            contents,
            options: options.clone(),
        });

        let status = self.deploy_status.unwrap_or(DeployStatus::Succeeded);
        Ok(DeployResult {
            id: Some(format!("deploy-{}", self.deploys.borrow().len())),
            status,
            messages: Vec::new(),
        })
    }
}

fn collect_files(
    root: &Path,
    dir: &Path,
    contents: &mut std::collections::BTreeMap<String, String>,
) -> Result<()> {
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if path.is_dir() {
            collect_files(root, &path, contents)?;
        } else if let Ok(relative) = path.strip_prefix(root) {
            let content = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
            contents.insert(relative.to_string_lossy().replace('\\', "/"), content);
        }
    }
    Ok(())
}
