//! Ordered membership sets
//!
//! A [`Membership`] maps entity types to sets of instance names. It
//! backs both the requested-retrieve set and the surviving-deploy set.
//! Entity types keep caller-declared order; names within a type are
//! kept sorted. Both orders feed directly into manifest text, so they
//! must be reproducible run over run.

use std::collections::BTreeSet;
use std::path::Path;

use crate::{ApiName, EntityCatalog, Error, Result};

/// Ordered mapping from entity type to a sorted set of instance names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Membership {
    entries: Vec<(String, BTreeSet<ApiName>)>,
}

impl Membership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one name under an entity type, creating the type block at
    /// the end if it is new.
    pub fn insert(&mut self, entity_type: &str, name: ApiName) {
        self.names_mut(entity_type).insert(name);
    }

    /// Add every name in `names` under an entity type.
    pub fn insert_all(&mut self, entity_type: &str, names: impl IntoIterator<Item = ApiName>) {
        self.names_mut(entity_type).extend(names);
    }

    fn names_mut(&mut self, entity_type: &str) -> &mut BTreeSet<ApiName> {
        let position = self
            .entries
            .iter()
            .position(|(existing, _)| existing == entity_type);
        let index = match position {
            Some(index) => index,
            None => {
                self.entries.push((entity_type.to_string(), BTreeSet::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    /// The names recorded under an entity type, if any.
    pub fn names(&self, entity_type: &str) -> Option<&BTreeSet<ApiName>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == entity_type)
            .map(|(_, names)| names)
    }

    /// Iterate type blocks in caller-declared order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<ApiName>)> {
        self.entries
            .iter()
            .map(|(entity_type, names)| (entity_type.as_str(), names))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entity-type blocks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Build membership by scanning a deploy area's directories
    /// against the catalog.
    ///
    /// Each subdirectory that names a catalog group contributes the
    /// stems of its files whose extension matches a single-file entry
    /// in that group. Directories are visited in sorted order so the
    /// result is reproducible. Unknown directories and files are
    /// skipped silently; a synthesis routine may stage content this
    /// pipeline does not manage.
    pub fn from_deploy_dir(root: &Path, catalog: &EntityCatalog) -> Result<Self> {
        let mut membership = Self::new();

        let mut directories: Vec<_> = std::fs::read_dir(root)
            .map_err(|e| Error::io(root, e))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.path())
            .collect();
        directories.sort();

        for directory in directories {
            let Some(dir_name) = directory.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(group) = catalog.group_by_directory(dir_name) else {
                tracing::debug!(directory = %dir_name, "Skipping directory with no catalog group");
                continue;
            };

            let mut files: Vec<_> = std::fs::read_dir(&directory)
                .map_err(|e| Error::io(&directory, e))?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.is_file())
                .collect();
            files.sort();

            for file in files {
                let (Some(stem), Some(extension)) = (
                    file.file_stem().and_then(|s| s.to_str()),
                    file.extension().and_then(|e| e.to_str()),
                ) else {
                    continue;
                };
                let entry = group.entries.iter().find(|entry| {
                    entry.extension == extension && entry.convention.is_single_file()
                });
                if let Some(entry) = entry {
                    membership.insert(&entry.entity_type, ApiName::from_escaped(stem));
                }
            }
        }

        Ok(membership)
    }
}
