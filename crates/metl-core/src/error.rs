//! Error types for metl-core

use std::path::PathBuf;

use crate::client::DeployStatus;

/// Result type for metl-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in metl-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A requested entity instance has no source file after retrieval
    #[error("Cannot find metadata file {path}")]
    MissingSourceFile { path: PathBuf },

    /// A remote retrieve or deploy call failed
    #[error("Remote {operation} failed: {message}")]
    Remote { operation: String, message: String },

    /// The post-deploy hook failed after a completed deploy.
    ///
    /// The deploy itself is not rolled back; `status` reports what the
    /// remote platform committed before the hook ran.
    #[error("Post-deploy step failed after deploy finished with status {status:?}: {source}")]
    PostDeploy {
        status: DeployStatus,
        #[source]
        source: Box<Error>,
    },

    /// A task-level validation or callback failure
    #[error("{message}")]
    Task { message: String },

    /// Task options TOML could not be parsed
    #[error("Failed to parse task options: {0}")]
    OptionsParse(#[from] toml::de::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Transparent wrappers for underlying crate errors
    /// XML error from metl-xml
    #[error(transparent)]
    Xml(#[from] metl_xml::Error),

    /// Catalog/membership error from metl-meta
    #[error(transparent)]
    Meta(#[from] metl_meta::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn task(message: impl Into<String>) -> Self {
        Self::Task {
            message: message.into(),
        }
    }

    pub fn remote(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            operation: operation.into(),
            message: message.into(),
        }
    }
}
