//! Transfer-client seam
//!
//! The network client that talks to the remote platform lives outside
//! this core. [`TransferClient`] is the trait it is consumed through:
//! retrieve extracts an archive into a directory, deploy submits a
//! staged directory. Failures propagate unchanged; this core performs
//! no retry of its own.

use std::path::Path;

use crate::Result;

/// Options forwarded to the remote deploy call.
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    /// Managed mode: namespace tokens are replaced with the prefix
    /// instead of stripped.
    pub managed: bool,
    /// Namespace prefix for token injection, if any.
    pub namespace_inject: Option<String>,
}

/// Final state of a deploy operation on the remote platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStatus {
    Succeeded,
    SucceededPartial,
    Failed,
    Canceled,
}

/// Result of a completed deploy call.
#[derive(Debug, Clone)]
pub struct DeployResult {
    /// Remote identifier of the deployment, when the platform returns
    /// one.
    pub id: Option<String>,
    pub status: DeployStatus,
    /// Component-level messages reported by the platform.
    pub messages: Vec<String>,
}

impl DeployResult {
    pub fn succeeded(status: DeployStatus) -> Self {
        Self {
            id: None,
            status,
            messages: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self.status,
            DeployStatus::Succeeded | DeployStatus::SucceededPartial
        )
    }
}

/// Client performing the retrieve and deploy calls against the remote
/// platform.
pub trait TransferClient {
    /// Retrieve the content described by `manifest_xml` at
    /// `api_version` and extract the resulting archive into `dest`.
    fn retrieve(&self, manifest_xml: &str, api_version: &str, dest: &Path) -> Result<()>;

    /// Deploy the staged directory (including its `package.xml`) to
    /// the remote platform.
    fn deploy(&self, deploy_root: &Path, options: &DeployOptions) -> Result<DeployResult>;
}
