//! XML document layer for the metadata ETL pipeline
//!
//! Wraps tree-shaped XML documents behind [`XmlDocument`] and provides
//! the insertion-index algorithm used when synthesizing new fragments
//! into an existing document.

pub mod document;
pub mod error;
pub mod insert;

pub use document::XmlDocument;
pub use error::{Error, Result};
pub use insert::index_for_new_tag;

// Re-export the underlying tree types; callers build and edit
// elements directly.
pub use xmltree::{Element, XMLNode};
