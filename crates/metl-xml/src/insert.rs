//! Insertion-index resolution for synthesized fragments
//!
//! Metadata documents keep all top-level tags of one kind grouped
//! together. When a new tag is synthesized into an existing document,
//! it must land directly after the last element of the same kind, or
//! at the end of the document when no such element exists yet.

use crate::XmlDocument;

/// Compute the insertion index for a new `tag` element among the
/// document root's element children.
///
/// Elements with the given local name are searched anywhere in the
/// subtree, not only at the top level: some tags are nested under a
/// wrapper element, and the new sibling belongs after the root child
/// that contains the last of them. With no match the index is the
/// current element-child count, appending at the end.
///
/// Inserting at the returned index and calling again yields the prior
/// index plus one whenever the inserted element carries `tag`, so
/// repeated insertions keep same-tag siblings contiguous.
pub fn index_for_new_tag(doc: &XmlDocument, tag: &str) -> usize {
    let children = doc.root_element_children();
    let last_match = children
        .iter()
        .enumerate()
        .filter(|(_, child)| child.name == tag || subtree_contains(child, tag))
        .map(|(index, _)| index)
        .next_back();

    match last_match {
        Some(index) => index + 1,
        None => children.len(),
    }
}

fn subtree_contains(element: &xmltree::Element, tag: &str) -> bool {
    element
        .children
        .iter()
        .filter_map(xmltree::XMLNode::as_element)
        .any(|child| child.name == tag || subtree_contains(child, tag))
}
