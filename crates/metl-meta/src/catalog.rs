//! Entity catalog and resolver
//!
//! The catalog maps entity-type names to their on-disk storage
//! convention. It is read-only at run time and injected explicitly
//! into everything that consults it, so tests can substitute their
//! own tables.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// How instances of an entity type are laid out on disk.
///
/// The transform engine only supports the single-file-per-instance
/// forms; the remaining variants exist so a full catalog can be
/// represented and rejected with a precise error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Convention {
    /// One `<name>.<extension>` file per instance
    FilePerInstance,
    /// One file per instance, nested under user-defined folders
    FilePerInstanceWithFolders,
    /// A directory of related files per instance
    Bundle,
    /// One object file per instance, with nested sub-entities
    ObjectFile,
}

impl Convention {
    /// Whether the transform engine can process this convention.
    pub fn is_single_file(self) -> bool {
        matches!(self, Self::FilePerInstance | Self::ObjectFile)
    }
}

/// One entity type within a catalog group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Entity-type name, e.g. `Layout`
    #[serde(rename = "type")]
    pub entity_type: String,
    /// File extension without the leading dot, e.g. `layout`
    pub extension: String,
    /// Storage convention for instances of this type
    pub convention: Convention,
}

/// A storage directory and the entity types it contains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogGroup {
    /// Directory name under the retrieve/deploy roots
    pub directory: String,
    /// Entity types stored in this directory
    pub entries: Vec<CatalogEntry>,
}

/// Where instances of a resolved entity type live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityLocation {
    pub directory: String,
    pub extension: String,
}

/// The entity catalog: an ordered list of storage groups.
///
/// Group order is significant — an entity type may legitimately
/// appear under several groups, and resolution picks the first match
/// deterministically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityCatalog {
    #[serde(rename = "group", default)]
    groups: Vec<CatalogGroup>,
}

impl EntityCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Create a catalog covering the common built-in entity types.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.add_group("layouts", &[("Layout", "layout", Convention::FilePerInstance)]);
        catalog.add_group("objects", &[("CustomObject", "object", Convention::ObjectFile)]);
        catalog.add_group(
            "permissionsets",
            &[("PermissionSet", "permissionset", Convention::FilePerInstance)],
        );
        catalog.add_group("tabs", &[("CustomTab", "tab", Convention::FilePerInstance)]);
        catalog.add_group("classes", &[("ApexClass", "cls", Convention::FilePerInstance)]);
        catalog.add_group(
            "triggers",
            &[("ApexTrigger", "trigger", Convention::FilePerInstance)],
        );
        catalog.add_group(
            "workflows",
            &[("Workflow", "workflow", Convention::FilePerInstance)],
        );
        catalog.add_group("flows", &[("Flow", "flow", Convention::FilePerInstance)]);
        catalog.add_group(
            "reports",
            &[("Report", "report", Convention::FilePerInstanceWithFolders)],
        );
        catalog.add_group(
            "aura",
            &[("AuraDefinitionBundle", "cmp", Convention::Bundle)],
        );
        catalog
    }

    /// Parse a catalog from TOML content.
    ///
    /// # Example
    ///
    /// ```
    /// use metl_meta::EntityCatalog;
    ///
    /// let catalog = EntityCatalog::from_toml_str(r#"
    /// [[group]]
    /// directory = "layouts"
    ///
    /// [[group.entries]]
    /// type = "Layout"
    /// extension = "layout"
    /// convention = "file_per_instance"
    /// "#).unwrap();
    ///
    /// assert!(catalog.resolve("Layout").is_ok());
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let catalog: Self = toml::from_str(content)?;
        Ok(catalog)
    }

    /// Append a group of entries under a directory.
    pub fn add_group(&mut self, directory: &str, entries: &[(&str, &str, Convention)]) {
        self.groups.push(CatalogGroup {
            directory: directory.to_string(),
            entries: entries
                .iter()
                .map(|(entity_type, extension, convention)| CatalogEntry {
                    entity_type: entity_type.to_string(),
                    extension: extension.to_string(),
                    convention: *convention,
                })
                .collect(),
        });
    }

    /// Resolve an entity type to its storage directory and extension.
    ///
    /// Scans the full catalog and picks the first group whose entries
    /// contain the type. Fails with [`Error::UnknownEntity`] when no
    /// group matches, or [`Error::UnsupportedConvention`] when the
    /// matching entry is not stored as a single file per instance.
    pub fn resolve(&self, entity_type: &str) -> Result<EntityLocation> {
        let (group, entry) = self
            .groups
            .iter()
            .find_map(|group| {
                group
                    .entries
                    .iter()
                    .find(|entry| entry.entity_type == entity_type)
                    .map(|entry| (group, entry))
            })
            .ok_or_else(|| Error::UnknownEntity {
                entity_type: entity_type.to_string(),
            })?;

        if !entry.convention.is_single_file() {
            return Err(Error::UnsupportedConvention {
                entity_type: entity_type.to_string(),
                convention: entry.convention,
            });
        }

        Ok(EntityLocation {
            directory: group.directory.clone(),
            extension: entry.extension.clone(),
        })
    }

    /// Look up the group stored under a directory name.
    pub fn group_by_directory(&self, directory: &str) -> Option<&CatalogGroup> {
        self.groups.iter().find(|group| group.directory == directory)
    }

    /// All groups in catalog order.
    pub fn groups(&self) -> &[CatalogGroup] {
        &self.groups
    }
}
