//! Entity transform engine
//!
//! Drives per-instance discovery, escaping, parsing, transform
//! invocation, and write-back for one entity type. Instances are
//! processed in sorted order so repeated runs produce identical
//! output; unordered iteration here would leak into file-write order
//! and manifest text.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use metl_meta::{ApiName, EntityCatalog};
use metl_xml::XmlDocument;

use crate::{Error, Result};

/// What a transform decided to do with one entity instance.
#[derive(Debug)]
pub enum TransformOutcome {
    /// Stage this document for deployment.
    Deploy(XmlDocument),
    /// Exclude this instance from deployment without error.
    Suppress,
}

/// Per-instance transform supplied by the concrete task.
///
/// The callback always receives the user-facing api name; path-safe
/// escaping stays inside the engine.
pub trait EntityTransform {
    fn transform_entity(&mut self, doc: XmlDocument, api_name: &str) -> Result<TransformOutcome>;
}

impl<F> EntityTransform for F
where
    F: FnMut(XmlDocument, &str) -> Result<TransformOutcome>,
{
    fn transform_entity(&mut self, doc: XmlDocument, api_name: &str) -> Result<TransformOutcome> {
        self(doc, api_name)
    }
}

/// Transform every requested instance of `entity_type` from the
/// retrieve area into the deploy area.
///
/// Resolution happens before any filesystem access, so configuration
/// errors abort with nothing written. A wildcard member is replaced
/// by the instances actually present in the retrieve area (an absent
/// or empty directory expands to nothing). Returns the surviving
/// membership: the processed names minus those the transform
/// suppressed.
///
/// Files staged before a mid-batch failure are left in place; the
/// caller's staging area is torn down with the run.
pub fn transform_entity_files(
    catalog: &EntityCatalog,
    retrieve_root: &Path,
    deploy_root: &Path,
    entity_type: &str,
    requested: &BTreeSet<ApiName>,
    transform: &mut dyn EntityTransform,
) -> Result<BTreeSet<ApiName>> {
    let location = catalog.resolve(entity_type)?;
    let source_dir = retrieve_root.join(&location.directory);

    let mut names = requested.clone();
    if names.iter().any(ApiName::is_wildcard) {
        names.retain(|name| !name.is_wildcard());
        names.extend(discover_instances(&source_dir, &location.extension)?);
    }

    tracing::info!(entity_type, count = names.len(), "Transforming entities");

    let mut suppressed = BTreeSet::new();
    for name in &names {
        let user_facing = name.user_facing();
        let file_name = format!("{}.{}", name.as_str(), location.extension);
        let source_path = source_dir.join(&file_name);
        if !source_path.exists() {
            return Err(Error::MissingSourceFile { path: source_path });
        }

        let doc = XmlDocument::parse_file(&source_path)?;
        tracing::debug!(name = %user_facing, "Transforming entity instance");

        match transform.transform_entity(doc, &user_facing)? {
            TransformOutcome::Deploy(doc) => {
                let dest_dir = deploy_root.join(&location.directory);
                fs::create_dir_all(&dest_dir).map_err(|e| Error::io(&dest_dir, e))?;
                doc.write_file(&dest_dir.join(&file_name))?;
            }
            TransformOutcome::Suppress => {
                tracing::debug!(name = %user_facing, "Suppressing entity instance");
                suppressed.insert(name.clone());
            }
        }
    }

    Ok(names.difference(&suppressed).cloned().collect())
}

/// File-name stems of every matching entity file in the directory.
fn discover_instances(source_dir: &Path, extension: &str) -> Result<BTreeSet<ApiName>> {
    if !source_dir.is_dir() {
        return Ok(BTreeSet::new());
    }

    let mut names = BTreeSet::new();
    for entry in fs::read_dir(source_dir).map_err(|e| Error::io(source_dir, e))? {
        let path = entry.map_err(|e| Error::io(source_dir, e))?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.insert(ApiName::from_escaped(stem));
        }
    }
    Ok(names)
}
