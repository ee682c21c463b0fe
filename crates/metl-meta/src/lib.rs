//! Entity catalog, naming, and manifest generation
//!
//! This crate holds the read-only metadata the pipeline consults:
//!
//! - [`EntityCatalog`] — maps entity-type names to their on-disk
//!   storage convention (directory, file extension)
//! - [`ApiName`] — instance names in their path-safe form, with exact
//!   round-tripping back to the user-facing form
//! - [`Membership`] — ordered entity-type → instance-name mapping used
//!   for both retrieve requests and deploy manifests
//! - [`render_package_manifest`] — the package-descriptor renderer

pub mod catalog;
pub mod error;
pub mod manifest;
pub mod membership;
pub mod name;

pub use catalog::{CatalogEntry, CatalogGroup, Convention, EntityCatalog, EntityLocation};
pub use error::{Error, Result};
pub use manifest::{PACKAGE_XMLNS, render_package_manifest};
pub use membership::Membership;
pub use name::ApiName;
