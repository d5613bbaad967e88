//! `serde` support for documents.
//!
//! An element serializes as `{name, attributes, children}` and a text node
//! as `{text}`. Attributes keep their source order.
//!
//! Serializers walk the tree recursively, so element nesting is capped at
//! [`MAX_SERIALIZE_DEPTH`]. A deeper subtree fails with a serializer error
//! instead of exhausting the stack.

use serde::ser::{Error as _, Serialize, SerializeSeq, SerializeStruct, Serializer};

use super::arena::{Attributes, Document};
use super::node_ref::{ElementRef, NodeRef, TextRef};

/// Deepest element nesting, counted from the serialized element, that
/// serializes successfully.
pub const MAX_SERIALIZE_DEPTH: usize = 256;

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root().serialize(serializer)
    }
}

impl Serialize for NodeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Nested {
            node: *self,
            depth: 0,
        }
        .serialize(serializer)
    }
}

impl Serialize for ElementRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_element(*self, 0, serializer)
    }
}

impl Serialize for TextRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Text", 1)?;
        state.serialize_field("text", self.content())?;
        state.end()
    }
}

/// A node together with its element depth below the serialized element.
struct Nested<'a> {
    node: NodeRef<'a>,
    depth: usize,
}

impl Serialize for Nested<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.node {
            NodeRef::Element(e) => serialize_element(e, self.depth, serializer),
            NodeRef::Text(t) => t.serialize(serializer),
        }
    }
}

struct ChildList<'a> {
    element: ElementRef<'a>,
    depth: usize,
}

impl Serialize for ChildList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let children = self.element.children();
        let mut seq = serializer.serialize_seq(Some(children.len()))?;
        for node in children {
            seq.serialize_element(&Nested {
                node,
                depth: self.depth,
            })?;
        }
        seq.end()
    }
}

fn serialize_element<S: Serializer>(
    element: ElementRef<'_>,
    depth: usize,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    if depth >= MAX_SERIALIZE_DEPTH {
        return Err(S::Error::custom(format_args!(
            "document nested too deeply: more than {MAX_SERIALIZE_DEPTH} levels of elements"
        )));
    }

    let mut state = serializer.serialize_struct("Element", 3)?;
    state.serialize_field("name", element.name())?;
    state.serialize_field("attributes", element.attributes())?;
    state.serialize_field(
        "children",
        &ChildList {
            element,
            depth: depth + 1,
        },
    )?;
    state.end()
}
