//! Document tree: text leaves and elements with attributes and ordered children.
//!
//! Nodes are stored in an arena owned by [`Document`]; callers work with
//! borrowed handles ([`ElementRef`], [`TextRef`], [`NodeRef`]) that are cheap
//! to copy and tied to the document's lifetime.

mod arena;
mod node_ref;
#[cfg(feature = "serde")]
mod serialize;

pub use arena::{Attributes, Document, NodeId};
pub use node_ref::{Children, Descendants, ElementRef, NodeRef, TextRef};
#[cfg(feature = "serde")]
pub use serialize::MAX_SERIALIZE_DEPTH;
