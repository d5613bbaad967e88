//! Node filters: composable match conditions for queries.
//!
//! A [`NodeFilter`] holds four independent slots (`name`, `text`,
//! `attributes`, `other`). A node matches when every present slot passes.
//!
//! ```
//! use tagsoup::{parse, NodeFilter};
//!
//! let doc = parse(r#"<ul><li class="a">one</li><li>two</li></ul>"#);
//!
//! let filter = NodeFilter::builder()
//!     .name("li")
//!     .attributes_fn(|attrs| attrs.contains_key("class"))
//!     .build()
//!     .unwrap();
//!
//! let found = doc.root().find(&filter).unwrap();
//! assert_eq!(found.text(), "one");
//! ```

use std::fmt;
use std::sync::Arc;

use crate::dom::{Attributes, NodeRef};
use crate::error::{Error, FilterSlot, Result};

/// Predicate over a string field (`name` or `text`).
pub type StrPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Predicate over an element's attribute mapping.
pub type AttrPredicate = Arc<dyn Fn(&Attributes) -> bool + Send + Sync>;

/// Predicate over a whole node.
pub type NodePredicate = Arc<dyn for<'a> Fn(NodeRef<'a>) -> bool + Send + Sync>;

/// Raw value for a filter slot, before validation.
///
/// Any value can be handed to any slot; [`NodeFilterBuilder::build`] checks
/// that the shape is allowed there. Only strings and predicates are ever
/// valid. The numeric and boolean variants exist so that values coming
/// from dynamic sources can be rejected with a proper error.
#[derive(Clone, Default)]
pub enum FilterValue {
    #[default]
    Absent,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    StrFn(StrPredicate),
    AttrFn(AttrPredicate),
    NodeFn(NodePredicate),
}

impl FilterValue {
    pub fn str_fn<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        FilterValue::StrFn(Arc::new(f))
    }

    pub fn attr_fn<F>(f: F) -> Self
    where
        F: Fn(&Attributes) -> bool + Send + Sync + 'static,
    {
        FilterValue::AttrFn(Arc::new(f))
    }

    pub fn node_fn<F>(f: F) -> Self
    where
        F: for<'a> Fn(NodeRef<'a>) -> bool + Send + Sync + 'static,
    {
        FilterValue::NodeFn(Arc::new(f))
    }

    /// Short description used in error messages.
    fn describe(&self) -> String {
        match self {
            FilterValue::Absent => "nothing".to_string(),
            FilterValue::Str(s) => format!("string {s:?}"),
            FilterValue::Int(n) => format!("integer {n}"),
            FilterValue::Float(n) => format!("float {n}"),
            FilterValue::Bool(b) => format!("boolean {b}"),
            FilterValue::StrFn(_) => "predicate over a string".to_string(),
            FilterValue::AttrFn(_) => "predicate over attributes".to_string(),
            FilterValue::NodeFn(_) => "predicate over a node".to_string(),
        }
    }
}

impl fmt::Debug for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Str(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Str(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Int(value.into())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Float(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FilterValue::Absent, Into::into)
    }
}

/// A validated filter slot.
pub enum Matcher<T: ?Sized> {
    /// Always passes.
    Absent,
    /// Passes iff the field equals the literal.
    Equals(String),
    /// Passes iff the predicate returns true for the field.
    Predicate(Arc<dyn Fn(&T) -> bool + Send + Sync>),
}

impl<T: ?Sized> Clone for Matcher<T> {
    fn clone(&self) -> Self {
        match self {
            Matcher::Absent => Matcher::Absent,
            Matcher::Equals(s) => Matcher::Equals(s.clone()),
            Matcher::Predicate(p) => Matcher::Predicate(Arc::clone(p)),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Matcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Absent => f.write_str("Absent"),
            Matcher::Equals(s) => f.debug_tuple("Equals").field(s).finish(),
            Matcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl<T: ?Sized> Matcher<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Matcher::Absent)
    }
}

impl Matcher<str> {
    fn test(&self, field: Option<&str>) -> bool {
        match (self, field) {
            (Matcher::Absent, _) => true,
            (_, None) => false,
            (Matcher::Equals(literal), Some(value)) => value == literal.as_str(),
            (Matcher::Predicate(p), Some(value)) => p(value),
        }
    }
}

impl Matcher<Attributes> {
    fn test(&self, field: Option<&Attributes>) -> bool {
        match (self, field) {
            (Matcher::Absent, _) => true,
            (_, None) => false,
            (Matcher::Predicate(p), Some(attrs)) => p(attrs),
            (Matcher::Equals(literal), Some(_)) => {
                tracing::warn!(
                    slot = %FilterSlot::Attributes,
                    literal = %literal,
                    "attributes filter holds a literal; treating as non-match"
                );
                false
            }
        }
    }
}

/// A query specification: up to four conjunctive match conditions.
///
/// Immutable and stateless; cloning is cheap and one filter can be reused
/// across any number of queries and threads.
#[derive(Clone)]
pub struct NodeFilter {
    name: Matcher<str>,
    text: Matcher<str>,
    attributes: Matcher<Attributes>,
    other: Option<NodePredicate>,
}

impl NodeFilter {
    pub fn builder() -> NodeFilterBuilder {
        NodeFilterBuilder::default()
    }

    /// A filter that matches every element.
    pub fn any() -> Self {
        Self {
            name: Matcher::Absent,
            text: Matcher::Absent,
            attributes: Matcher::Absent,
            other: None,
        }
    }

    /// Match elements by exact name.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Matcher::Equals(name.into()),
            ..Self::any()
        }
    }

    /// Match elements by exact text content.
    pub fn by_text(text: impl Into<String>) -> Self {
        Self {
            text: Matcher::Equals(text.into()),
            ..Self::any()
        }
    }

    pub fn name(&self) -> &Matcher<str> {
        &self.name
    }

    pub fn text(&self) -> &Matcher<str> {
        &self.text
    }

    pub fn attributes(&self) -> &Matcher<Attributes> {
        &self.attributes
    }

    pub fn has_other(&self) -> bool {
        self.other.is_some()
    }

    /// Check a node against every slot.
    ///
    /// Text nodes carry no `name`, `text` or `attributes` field, so any
    /// present slot among those three rejects them.
    pub fn matches(&self, node: NodeRef<'_>) -> bool {
        if !self.name.test(field_name(node)) {
            return false;
        }

        // Only compute the concatenated text when a text slot needs it.
        if !self.text.is_absent() {
            let text = match node {
                NodeRef::Element(e) => Some(e.text()),
                NodeRef::Text(_) => None,
            };
            if !self.text.test(text.as_deref()) {
                return false;
            }
        }

        if !self.attributes.test(field_attributes(node)) {
            return false;
        }

        match &self.other {
            Some(other) => other(node),
            None => true,
        }
    }
}

fn field_name(node: NodeRef<'_>) -> Option<&str> {
    match node {
        NodeRef::Element(e) => Some(e.name()),
        NodeRef::Text(_) => None,
    }
}

fn field_attributes(node: NodeRef<'_>) -> Option<&Attributes> {
    match node {
        NodeRef::Element(e) => Some(e.attributes()),
        NodeRef::Text(_) => None,
    }
}

impl Default for NodeFilter {
    fn default() -> Self {
        Self::any()
    }
}

impl fmt::Debug for NodeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeFilter")
            .field("name", &self.name)
            .field("text", &self.text)
            .field("attributes", &self.attributes)
            .field("other", &self.other.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Builder for [`NodeFilter`]. Slot shapes are validated by [`build`](Self::build).
#[derive(Clone, Default, Debug)]
pub struct NodeFilterBuilder {
    name: FilterValue,
    text: FilterValue,
    attributes: FilterValue,
    other: FilterValue,
}

impl NodeFilterBuilder {
    /// Set the `name` slot: a string or a string predicate.
    pub fn name(mut self, value: impl Into<FilterValue>) -> Self {
        self.name = value.into();
        self
    }

    pub fn name_fn<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.name(FilterValue::str_fn(f))
    }

    /// Set the `text` slot: a string or a string predicate.
    pub fn text(mut self, value: impl Into<FilterValue>) -> Self {
        self.text = value.into();
        self
    }

    pub fn text_fn<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.text(FilterValue::str_fn(f))
    }

    /// Set the `attributes` slot: a predicate over the attribute mapping.
    pub fn attributes(mut self, value: impl Into<FilterValue>) -> Self {
        self.attributes = value.into();
        self
    }

    pub fn attributes_fn<F>(self, f: F) -> Self
    where
        F: Fn(&Attributes) -> bool + Send + Sync + 'static,
    {
        self.attributes(FilterValue::attr_fn(f))
    }

    /// Set the `other` slot: a predicate over the whole node.
    pub fn other(mut self, value: impl Into<FilterValue>) -> Self {
        self.other = value.into();
        self
    }

    pub fn other_fn<F>(self, f: F) -> Self
    where
        F: for<'a> Fn(NodeRef<'a>) -> bool + Send + Sync + 'static,
    {
        self.other(FilterValue::node_fn(f))
    }

    /// Validate every slot and produce the filter.
    pub fn build(self) -> Result<NodeFilter> {
        Ok(NodeFilter {
            name: str_slot(FilterSlot::Name, self.name)?,
            text: str_slot(FilterSlot::Text, self.text)?,
            attributes: match self.attributes {
                FilterValue::Absent => Matcher::Absent,
                FilterValue::AttrFn(p) => Matcher::Predicate(p),
                other => return Err(invalid(FilterSlot::Attributes, &other)),
            },
            other: match self.other {
                FilterValue::Absent => None,
                FilterValue::NodeFn(p) => Some(p),
                other => return Err(invalid(FilterSlot::Other, &other)),
            },
        })
    }
}

fn str_slot(slot: FilterSlot, value: FilterValue) -> Result<Matcher<str>> {
    match value {
        FilterValue::Absent => Ok(Matcher::Absent),
        FilterValue::Str(s) => Ok(Matcher::Equals(s)),
        FilterValue::StrFn(p) => Ok(Matcher::Predicate(p)),
        other => Err(invalid(slot, &other)),
    }
}

fn invalid(slot: FilterSlot, value: &FilterValue) -> Error {
    Error::InvalidFilter {
        slot,
        found: value.describe(),
    }
}
