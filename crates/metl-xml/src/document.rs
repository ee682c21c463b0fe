//! Tree-shaped XML documents
//!
//! [`XmlDocument`] owns a parsed element tree and exposes the queries
//! and mutations the transform engine needs: local-name descendant
//! lookup, root-child insertion, and serialization with an XML
//! declaration.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use xmltree::{Element, EmitterConfig, XMLNode};

use crate::{Error, Result};

/// A parsed XML document.
///
/// Queries match on local element names and ignore namespaces, which
/// mirrors how metadata entity files are structured: a single default
/// namespace on the root, no prefixed content.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    root: Element,
    /// Source path, when the document was read from a file. Carried
    /// into parse errors and diagnostics.
    path: Option<PathBuf>,
}

impl XmlDocument {
    /// Create a document from an already-built root element.
    pub fn from_root(root: Element) -> Self {
        Self { root, path: None }
    }

    /// Parse a document from a string.
    pub fn parse_str(content: &str) -> Result<Self> {
        let root = Element::parse(content.as_bytes()).map_err(Error::ParseString)?;
        Ok(Self { root, path: None })
    }

    /// Parse a document from a file.
    ///
    /// Parse failures carry the offending path.
    pub fn parse_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let root = Element::parse(file).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            root,
            path: Some(path.to_path_buf()),
        })
    }

    /// The source path, if this document was read from a file.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The document root element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Mutable access to the document root element.
    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// All descendant elements with the given local name, in document
    /// order. The root itself is not considered.
    pub fn find_all(&self, tag: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        collect_descendants(&self.root, tag, &mut found);
        found
    }

    /// The first descendant element with the given local name, if any.
    pub fn find_first_mut(&mut self, tag: &str) -> Option<&mut Element> {
        find_descendant_mut(&mut self.root, tag)
    }

    /// The root's direct element children, in document order.
    ///
    /// Text and comment nodes between elements are not counted; all
    /// index-based operations on the root work in element positions.
    pub fn root_element_children(&self) -> Vec<&Element> {
        self.root
            .children
            .iter()
            .filter_map(XMLNode::as_element)
            .collect()
    }

    /// Insert a new element among the root's children at the given
    /// element position.
    ///
    /// `element_index` counts element children only; interleaved text
    /// and comment nodes keep their places. An index equal to the
    /// element-child count appends at the end.
    pub fn insert_root_child(&mut self, element_index: usize, element: Element) {
        let mut seen = 0usize;
        for (node_index, node) in self.root.children.iter().enumerate() {
            if node.as_element().is_some() {
                if seen == element_index {
                    self.root
                        .children
                        .insert(node_index, XMLNode::Element(element));
                    return;
                }
                seen += 1;
            }
        }
        self.root.children.push(XMLNode::Element(element));
    }

    /// Create a new element carrying the root's namespace, suitable
    /// for insertion into this document.
    pub fn new_element(&self, tag: &str) -> Element {
        let mut element = Element::new(tag);
        element.namespace = self.root.namespace.clone();
        element
    }

    /// Serialize the document to a writer as indented UTF-8 with an
    /// XML declaration.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let config = EmitterConfig::new()
            .perform_indent(true)
            .write_document_declaration(true);
        self.root
            .write_with_config(writer, config)
            .map_err(Error::Write)
    }

    /// Serialize the document to a file, creating the parent
    /// directory if needed.
    pub fn write_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        self.write_to(file)
    }

    /// Serialize the document to a string.
    pub fn to_string_pretty(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        // The emitter only produces valid UTF-8.
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn collect_descendants<'a>(element: &'a Element, tag: &str, found: &mut Vec<&'a Element>) {
    for child in element.children.iter().filter_map(XMLNode::as_element) {
        if child.name == tag {
            found.push(child);
        }
        collect_descendants(child, tag, found);
    }
}

fn find_descendant_mut<'a>(element: &'a mut Element, tag: &str) -> Option<&'a mut Element> {
    for child in element
        .children
        .iter_mut()
        .filter_map(XMLNode::as_mut_element)
    {
        if child.name == tag {
            return Some(child);
        }
        if let Some(found) = find_descendant_mut(child, tag) {
            return Some(found);
        }
    }
    None
}
