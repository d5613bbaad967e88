//! Arena-based storage for a parsed document.
//!
//! All nodes live in one contiguous vector. Parent and child links are
//! indices into that vector, so the parent link never owns anything and
//! dropping the [`Document`] releases the whole tree at once.

use std::fmt;

use super::node_ref::{ElementRef, NodeRef, TextRef};

/// Unique identifier for a node within one [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The synthetic root element (always 0).
    pub const ROOT: NodeId = NodeId(0);

    /// Position of the node in the arena (document order of creation).
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Attribute mapping of an element.
///
/// Keys are unique. Inserting an existing key replaces its value but keeps
/// the position where the key first appeared, so iteration follows the
/// order in which attribute names occurred in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute, replacing the value of an existing key.
    pub(crate) fn insert(&mut self, name: String, value: String) {
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Get an attribute value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (key, value) in iter {
            attrs.insert(key.into(), value.into());
        }
        attrs
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{key}': '{value}'")?;
        }
        f.write_str("}")
    }
}

/// Node payload.
#[derive(Debug, Clone)]
pub(crate) enum NodeData {
    Element {
        name: String,
        attrs: Attributes,
        children: Vec<NodeId>,
    },
    Text(String),
}

/// A node in the arena.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) data: NodeData,
    /// Set once, when the node is attached. `None` only for the root.
    pub(crate) parent: Option<NodeId>,
}

/// A parsed document.
///
/// A `Document` is immutable once built: the only way to create one is
/// through the tree builder, and it exposes no mutation API. It is `Send`
/// and `Sync`, so any number of threads may query it at the same time.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Create a document holding only the synthetic root element.
    pub(crate) fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Element {
                    name: root_name.into(),
                    attrs: Attributes::new(),
                    children: Vec::new(),
                },
                parent: None,
            }],
        }
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { data, parent: None });
        id
    }

    /// Create an element and attach it as the last child of `parent`.
    pub(crate) fn append_element(
        &mut self,
        parent: NodeId,
        name: String,
        attrs: Attributes,
    ) -> NodeId {
        let id = self.alloc(NodeData::Element {
            name,
            attrs,
            children: Vec::new(),
        });
        self.attach(parent, id);
        id
    }

    /// Create a text node and attach it as the last child of `parent`.
    pub(crate) fn append_text(&mut self, parent: NodeId, content: String) -> NodeId {
        let id = self.alloc(NodeData::Text(content));
        self.attach(parent, id);
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.nodes[child.index()].parent.is_none());
        if let NodeData::Element { children, .. } = &mut self.nodes[parent.index()].data {
            children.push(child);
            self.nodes[child.index()].parent = Some(parent);
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// The synthetic root element.
    pub fn root(&self) -> ElementRef<'_> {
        ElementRef::new(self, NodeId::ROOT)
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        let node = self.nodes.get(id.index())?;
        Some(match node.data {
            NodeData::Element { .. } => NodeRef::Element(ElementRef::new(self, id)),
            NodeData::Text(_) => NodeRef::Text(TextRef::new(self, id)),
        })
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the document has nothing but the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_root() {
        let doc = Document::new("html");
        assert_eq!(doc.len(), 1);
        assert!(doc.is_empty());
        assert_eq!(doc.root().name(), "html");
        assert!(doc.root().parent().is_none());
    }

    #[test]
    fn test_append_children_sets_parent() {
        let mut doc = Document::new("html");
        let div = doc.append_element(NodeId::ROOT, "div".to_string(), Attributes::new());
        let p = doc.append_element(div, "p".to_string(), Attributes::new());
        let text = doc.append_text(p, "Hello".to_string());

        assert_eq!(doc.node(div).parent, Some(NodeId::ROOT));
        assert_eq!(doc.node(p).parent, Some(div));
        assert_eq!(doc.node(text).parent, Some(p));

        let children: Vec<_> = doc.root().children().map(|c| c.id()).collect();
        assert_eq!(children, vec![div]);
    }

    #[test]
    fn test_get_out_of_range() {
        let doc = Document::new("html");
        assert!(doc.get(NodeId(42)).is_none());
        assert!(doc.get(NodeId::ROOT).is_some());
    }

    #[test]
    fn test_attributes_last_value_wins() {
        let attrs: Attributes = [("id", "a"), ("class", "x"), ("id", "b")]
            .into_iter()
            .collect();

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("id"), Some("b"));
        assert_eq!(attrs.keys().collect::<Vec<_>>(), vec!["id", "class"]);
    }

    #[test]
    fn test_attributes_display() {
        let attrs: Attributes = [("src", "x"), ("alt", "")].into_iter().collect();
        assert_eq!(attrs.to_string(), "{'src': 'x', 'alt': ''}");
        assert_eq!(Attributes::new().to_string(), "{}");
    }
}
