// src/dom.rs
//! Arena-backed element tree
//!
//! Only what event delegation needs: tag names, attributes and parent links.
//! Tag names are stored upper-cased, the way `Element.tagName` reports them
//! for HTML documents.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Handle to an element in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DomError {
    #[error("Node {id} does not belong to this document")]
    UnknownNode { id: NodeId },

    #[error("Invalid tag name '{name}'")]
    InvalidTagName { name: String },

    #[error("Invalid attribute name '{name}'")]
    InvalidAttributeName { name: String },

    #[error("Cannot append {child} under {parent}: it would create a cycle")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}

#[derive(Debug, Clone)]
struct Element {
    tag_name: String,
    attributes: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Element {
    fn new(tag_name: String) -> Self {
        Self {
            tag_name,
            attributes: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    root: NodeId,
}

impl Document {
    /// Empty document with an `HTML` root element
    pub fn new() -> Self {
        Self {
            nodes: vec![Element::new("HTML".to_string())],
            root: NodeId(0),
        }
    }

    pub fn document_element(&self) -> NodeId {
        self.root
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag_name: &str) -> Result<NodeId, DomError> {
        if !is_valid_name(tag_name) {
            return Err(DomError::InvalidTagName {
                name: tag_name.to_string(),
            });
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Element::new(tag_name.to_ascii_uppercase()));
        Ok(id)
    }

    /// Move `child` to the end of `parent`'s children
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check(parent)?;
        self.check(child)?;
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        if let Some(previous) = self.nodes[child.0].parent {
            self.nodes[previous.0].children.retain(|id| *id != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// `create_element` + `append_child`
    pub fn append_element(&mut self, parent: NodeId, tag_name: &str) -> Result<NodeId, DomError> {
        let child = self.create_element(tag_name)?;
        self.append_child(parent, child)?;
        Ok(child)
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.check(node)?;
        if !is_valid_name(name) {
            return Err(DomError::InvalidAttributeName {
                name: name.to_string(),
            });
        }
        self.nodes[node.0]
            .attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
        Ok(())
    }

    /// Returns whether the attribute was present
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<bool, DomError> {
        self.check(node)?;
        Ok(self.nodes[node.0]
            .attributes
            .remove(&name.to_ascii_lowercase())
            .is_some())
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.get_attribute(node, name).is_some()
    }

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(node.0)?
            .attributes
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|element| element.tag_name.as_str())
    }

    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|element| element.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Serialize the subtree rooted at `node` as markup with no text content
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let Some(element) = self.nodes.get(node.0) else {
            return;
        };
        let tag = element.tag_name.to_ascii_lowercase();
        out.push('<');
        out.push_str(&tag);
        for (name, value) in &element.attributes {
            out.push(' ');
            out.push_str(name);
            if !value.is_empty() {
                out.push_str("=\"");
                out.push_str(&value.replace('"', "&quot;"));
                out.push('"');
            }
        }
        out.push('>');
        for child in &element.children {
            self.write_html(*child, out);
        }
        out.push_str("</");
        out.push_str(&tag);
        out.push('>');
    }

    fn check(&self, node: NodeId) -> Result<(), DomError> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(DomError::UnknownNode { id: node })
        }
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
