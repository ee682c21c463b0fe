//! Error types for metl-xml

use std::path::PathBuf;

/// Result type for metl-xml operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in metl-xml operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document could not be parsed; carries the offending path when
    /// the document came from a file.
    #[error("Malformed XML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: xmltree::ParseError,
    },

    #[error("Malformed XML: {0}")]
    ParseString(#[source] xmltree::ParseError),

    #[error("Failed to serialize XML document: {0}")]
    Write(#[source] xmltree::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
