//! Built-in transforms
//!
//! Concrete [`EntityTransform`] implementations shipped with the
//! pipeline. Currently: organization-wide sharing defaults for
//! `CustomObject` entities.

use std::collections::BTreeMap;

use metl_xml::{XMLNode, XmlDocument, index_for_new_tag};

use crate::engine::{EntityTransform, TransformOutcome};
use crate::{Error, Result};

/// Sharing models the remote platform accepts.
const VALID_SHARING_MODELS: &[&str] = &[
    "ControlledByParent",
    "ControlledByCampaign",
    "ControlledByLeadOrContact",
    "FullAccess",
    "ReadWriteTransfer",
    "ReadWrite",
    "Read",
    "Private",
];

/// Desired sharing models for one object.
#[derive(Debug, Clone, Default)]
pub struct ObjectSharing {
    pub internal: Option<String>,
    pub external: Option<String>,
}

/// Sets organization-wide sharing defaults on `CustomObject`
/// entities.
///
/// Existing `sharingModel` / `externalSharingModel` tags are updated
/// in place; missing tags are synthesized as new root children at the
/// position that keeps same-tag elements contiguous.
#[derive(Debug, Default)]
pub struct SharingDefaults {
    defaults: BTreeMap<String, ObjectSharing>,
}

impl SharingDefaults {
    /// The entity type this transform applies to.
    pub const ENTITY_TYPE: &'static str = "CustomObject";

    pub fn new() -> Self {
        Self::default()
    }

    /// Record the target models for one object api name.
    ///
    /// At least one model must be given, and both must come from the
    /// platform's closed list of sharing models.
    pub fn set(
        &mut self,
        api_name: impl Into<String>,
        internal: Option<&str>,
        external: Option<&str>,
    ) -> Result<()> {
        let api_name = api_name.into();
        if internal.is_none() && external.is_none() {
            return Err(Error::task(format!(
                "At least one of the internal and external sharing models \
                 is required for {api_name}"
            )));
        }
        for model in [internal, external].into_iter().flatten() {
            if !VALID_SHARING_MODELS.contains(&model) {
                return Err(Error::task(format!(
                    "The sharing model {model} specified for {api_name} is not a valid option"
                )));
            }
        }
        self.defaults.insert(
            api_name,
            ObjectSharing {
                internal: internal.map(str::to_string),
                external: external.map(str::to_string),
            },
        );
        Ok(())
    }

    /// The object api names with configured defaults, in sorted
    /// order. Feed these into the task options as the requested
    /// names.
    pub fn api_names(&self) -> Vec<String> {
        self.defaults.keys().cloned().collect()
    }
}

impl EntityTransform for SharingDefaults {
    fn transform_entity(&mut self, mut doc: XmlDocument, api_name: &str) -> Result<TransformOutcome> {
        let Some(sharing) = self.defaults.get(api_name) else {
            return Err(Error::task(format!(
                "No sharing defaults configured for {api_name}"
            )));
        };

        if let Some(model) = sharing.external.clone() {
            set_model_tag(&mut doc, "externalSharingModel", &model);
        }
        if let Some(model) = sharing.internal.clone() {
            set_model_tag(&mut doc, "sharingModel", &model);
        }

        Ok(TransformOutcome::Deploy(doc))
    }
}

/// Update the tag's text anywhere in the subtree, or synthesize it as
/// a new root child below the last element of its kind.
fn set_model_tag(doc: &mut XmlDocument, tag: &str, value: &str) {
    if let Some(element) = doc.find_first_mut(tag) {
        element.children.clear();
        element.children.push(XMLNode::Text(value.to_string()));
        return;
    }

    let index = index_for_new_tag(doc, tag);
    let mut element = doc.new_element(tag);
    element.children.push(XMLNode::Text(value.to_string()));
    doc.insert_root_child(index, element);
}
