//! Error types for metl-meta

use std::path::PathBuf;

use crate::catalog::Convention;

/// Result type for metl-meta operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in metl-meta operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No catalog group contains the requested entity type
    #[error("Unable to locate catalog configuration for entity {entity_type}")]
    UnknownEntity { entity_type: String },

    /// The entity type is known but not stored as one file per instance
    #[error(
        "Entity {entity_type} uses the {convention:?} storage convention, \
         which is not a supported single-file form"
    )]
    UnsupportedConvention {
        entity_type: String,
        convention: Convention,
    },

    /// Catalog TOML could not be parsed
    #[error("Failed to parse entity catalog: {0}")]
    CatalogParse(#[from] toml::de::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
