//! Depth-first search over an element's descendants.

use crate::dom::{Descendants, Document, ElementRef, NodeRef};
use crate::filter::NodeFilter;

/// Iterator over the descendant elements that match a filter, in document
/// order. The element the search starts from is never yielded.
pub struct FindIter<'a, 'f> {
    descendants: Descendants<'a>,
    filter: &'f NodeFilter,
}

impl<'a> Iterator for FindIter<'a, '_> {
    type Item = ElementRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        // Text nodes have no children and are never candidates.
        self.descendants.by_ref().find_map(|node| match node {
            NodeRef::Element(element) if self.filter.matches(node) => Some(element),
            NodeRef::Element(_) | NodeRef::Text(_) => None,
        })
    }
}

impl<'a> ElementRef<'a> {
    /// Lazily iterate over matching descendants.
    pub fn find_iter<'f>(&self, filter: &'f NodeFilter) -> FindIter<'a, 'f> {
        FindIter {
            descendants: self.descendants(),
            filter,
        }
    }

    /// First matching descendant in document order.
    pub fn find(&self, filter: &NodeFilter) -> Option<ElementRef<'a>> {
        self.find_iter(filter).next()
    }

    /// Every matching descendant in document order.
    pub fn find_all(&self, filter: &NodeFilter) -> Vec<ElementRef<'a>> {
        self.find_iter(filter).collect()
    }
}

impl Document {
    /// Search the whole document. Same as `self.root().find(filter)`.
    pub fn find(&self, filter: &NodeFilter) -> Option<ElementRef<'_>> {
        self.root().find(filter)
    }

    /// Search the whole document. Same as `self.root().find_all(filter)`.
    pub fn find_all(&self, filter: &NodeFilter) -> Vec<ElementRef<'_>> {
        self.root().find_all(filter)
    }
}
