//! Borrowed handles into a [`Document`].

use std::fmt;
use std::slice;

use super::arena::{Attributes, Document, NodeData, NodeId};

/// A node of either kind.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    Element(ElementRef<'a>),
    Text(TextRef<'a>),
}

impl<'a> NodeRef<'a> {
    fn from_id(doc: &'a Document, id: NodeId) -> Self {
        match doc.node(id).data {
            NodeData::Element { .. } => NodeRef::Element(ElementRef::new(doc, id)),
            NodeData::Text(_) => NodeRef::Text(TextRef::new(doc, id)),
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            NodeRef::Element(e) => e.id(),
            NodeRef::Text(t) => t.id(),
        }
    }

    /// The element this node is attached to. `None` for the root.
    pub fn parent(&self) -> Option<ElementRef<'a>> {
        match self {
            NodeRef::Element(e) => e.parent(),
            NodeRef::Text(t) => t.parent(),
        }
    }

    pub fn as_element(&self) -> Option<ElementRef<'a>> {
        match self {
            NodeRef::Element(e) => Some(*e),
            NodeRef::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<TextRef<'a>> {
        match self {
            NodeRef::Element(_) => None,
            NodeRef::Text(t) => Some(*t),
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, NodeRef::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, NodeRef::Text(_))
    }

    /// Position of this node among its parent's children.
    pub fn sibling_index(&self) -> Option<usize> {
        let id = self.id();
        self.parent()?.child_ids().iter().position(|&c| c == id)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Element(e) => fmt::Debug::fmt(e, f),
            NodeRef::Text(t) => fmt::Debug::fmt(t, f),
        }
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Element(e) => fmt::Display::fmt(e, f),
            NodeRef::Text(t) => fmt::Display::fmt(t, f),
        }
    }
}

/// A reference to an element node.
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> ElementRef<'a> {
    pub(crate) fn new(doc: &'a Document, id: NodeId) -> Self {
        Self { doc, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The document this element belongs to.
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    fn parts(&self) -> (&'a str, &'a Attributes, &'a [NodeId]) {
        match &self.doc.node(self.id).data {
            NodeData::Element {
                name,
                attrs,
                children,
            } => (name.as_str(), attrs, children.as_slice()),
            NodeData::Text(_) => unreachable!("ElementRef always points at an element"),
        }
    }

    /// Tag name, exactly as the tokenizer reported it.
    pub fn name(&self) -> &'a str {
        self.parts().0
    }

    pub fn attributes(&self) -> &'a Attributes {
        self.parts().1
    }

    pub fn get_attr(&self, name: &str) -> Option<&'a str> {
        self.attributes().get(name)
    }

    pub(crate) fn child_ids(&self) -> &'a [NodeId] {
        self.parts().2
    }

    /// Direct children in document order.
    pub fn children(&self) -> Children<'a> {
        Children {
            doc: self.doc,
            ids: self.child_ids().iter(),
        }
    }

    /// Direct children that are elements.
    pub fn element_children(&self) -> impl Iterator<Item = ElementRef<'a>> + use<'a> {
        self.children().filter_map(|child| child.as_element())
    }

    pub fn parent(&self) -> Option<ElementRef<'a>> {
        self.doc
            .node(self.id)
            .parent
            .map(|id| ElementRef::new(self.doc, id))
    }

    /// Check if this is the synthetic document root.
    pub fn is_root(&self) -> bool {
        self.id == NodeId::ROOT
    }

    /// All descendants in depth-first pre-order. Does not include `self`.
    pub fn descendants(&self) -> Descendants<'a> {
        Descendants {
            doc: self.doc,
            stack: self.child_ids().iter().rev().copied().collect(),
        }
    }

    /// Concatenated content of every text descendant, in document order.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for node in self.descendants() {
            if let NodeRef::Text(t) = node {
                text.push_str(t.content());
            }
        }
        text
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for ElementRef<'_> {}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("attributes", self.attributes())
            .finish()
    }
}

impl fmt::Display for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name();
        write!(
            f,
            "<{name} {}> {}</{name}>",
            self.attributes(),
            self.text()
        )
    }
}

/// A reference to a text node.
#[derive(Clone, Copy)]
pub struct TextRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> TextRef<'a> {
    pub(crate) fn new(doc: &'a Document, id: NodeId) -> Self {
        Self { doc, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn content(&self) -> &'a str {
        match &self.doc.node(self.id).data {
            NodeData::Text(content) => content,
            NodeData::Element { .. } => unreachable!("TextRef always points at a text node"),
        }
    }

    pub fn parent(&self) -> Option<ElementRef<'a>> {
        self.doc
            .node(self.id)
            .parent
            .map(|id| ElementRef::new(self.doc, id))
    }
}

impl PartialEq for TextRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for TextRef<'_> {}

impl fmt::Debug for TextRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextRef")
            .field("id", &self.id)
            .field("content", &self.content())
            .finish()
    }
}

impl fmt::Display for TextRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Text(\"{}\")", self.content())
    }
}

/// Iterator over the children of an element.
pub struct Children<'a> {
    doc: &'a Document,
    ids: slice::Iter<'a, NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = *self.ids.next()?;
        Some(NodeRef::from_id(self.doc, id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = *self.ids.next_back()?;
        Some(NodeRef::from_id(self.doc, id))
    }
}

impl ExactSizeIterator for Children<'_> {}

/// Depth-first pre-order iterator over the descendants of an element.
///
/// Uses an explicit stack, so arbitrarily deep documents are fine.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = NodeRef::from_id(self.doc, id);
        if let NodeRef::Element(element) = node {
            // Reverse so the first child is popped next.
            self.stack.extend(element.child_ids().iter().rev().copied());
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// html > div > (p > "Hello, " b > "World") "!"
    fn sample() -> Document {
        let mut doc = Document::new("html");
        let div = doc.append_element(NodeId::ROOT, "div".into(), Attributes::new());
        let p = doc.append_element(div, "p".into(), Attributes::new());
        doc.append_text(p, "Hello, ".into());
        let b = doc.append_element(p, "b".into(), Attributes::new());
        doc.append_text(b, "World".into());
        doc.append_text(div, "!".into());
        doc
    }

    #[test]
    fn test_text_concatenates_descendants() {
        let doc = sample();
        assert_eq!(doc.root().text(), "Hello, World!");

        let p = doc.root().descendants().find_map(|n| {
            n.as_element().filter(|e| e.name() == "p")
        });
        assert_eq!(p.unwrap().text(), "Hello, World");
    }

    #[test]
    fn test_descendants_pre_order() {
        let doc = sample();
        let order: Vec<String> = doc
            .root()
            .descendants()
            .map(|n| match n {
                NodeRef::Element(e) => e.name().to_string(),
                NodeRef::Text(t) => t.content().to_string(),
            })
            .collect();
        assert_eq!(order, vec!["div", "p", "Hello, ", "b", "World", "!"]);
    }

    #[test]
    fn test_parent_and_sibling_index() {
        let doc = sample();
        let div = doc.root().element_children().next().unwrap();
        let children: Vec<_> = div.children().collect();

        assert_eq!(children.len(), 2);
        assert_eq!(children[0].parent(), Some(div));
        assert_eq!(children[0].sibling_index(), Some(0));
        assert_eq!(children[1].sibling_index(), Some(1));
        assert!(children[1].is_text());
        assert_eq!(NodeRef::Element(doc.root()).sibling_index(), None);
    }

    #[test]
    fn test_display() {
        let doc = sample();
        let div = doc.root().element_children().next().unwrap();
        assert_eq!(div.to_string(), "<div {}> Hello, World!</div>");

        let bang = div.children().last().unwrap();
        assert_eq!(bang.to_string(), "Text(\"!\")");
    }

    #[test]
    fn test_refs_from_different_documents_differ() {
        let a = sample();
        let b = sample();
        assert_eq!(a.root(), a.root());
        assert_ne!(a.root(), b.root());
    }
}
