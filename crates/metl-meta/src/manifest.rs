//! Package-descriptor manifest rendering
//!
//! Renders a [`Membership`] into the remote platform's package
//! descriptor. Output is byte-identical for identical input: members
//! ascend within a type, and type blocks follow the membership's
//! declared order. Downstream diff-based tooling depends on this.

use crate::Membership;

/// Namespace of the package-descriptor schema.
pub const PACKAGE_XMLNS: &str = "http://soap.sforce.com/2006/04/metadata";

/// Render the package manifest for a membership at an API version.
///
/// One `<types>` block per entity type with sorted `<members>`
/// elements and the type name, then a single document-level
/// `<version>` element.
pub fn render_package_manifest(membership: &Membership, api_version: &str) -> String {
    let mut types = String::new();
    for (entity_type, names) in membership.iter() {
        types.push_str("    <types>\n");
        for name in names {
            types.push_str(&format!("        <members>{}</members>\n", name.as_str()));
        }
        types.push_str(&format!("        <name>{entity_type}</name>\n"));
        types.push_str("    </types>\n");
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <Package xmlns=\"{PACKAGE_XMLNS}\">\n\
         {types}    <version>{api_version}</version>\n\
         </Package>\n"
    )
}
