//! Tree builder: turns a flat event stream into a [`Document`].
//!
//! The builder keeps an explicit stack of open elements, seeded with the
//! synthetic root. Recovery from malformed markup is deliberately simple:
//!
//! - a start tag is appended to the current element and, unless void,
//!   becomes the current element;
//! - an end tag closes whatever element is current, regardless of its name,
//!   and is ignored when only the root is open;
//! - whitespace-only text is dropped;
//! - elements still open at end of input stay open.
//!
//! No event sequence is an error.

use std::borrow::Cow;

use crate::dom::{Attributes, Document, NodeId};
use crate::entities::unescape;
use crate::tokenizer::Event;

/// Elements that never have content and are never explicitly closed.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Check if `name` is a void element (ASCII case-insensitive).
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

/// Options for building a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Name of the synthetic root element.
    pub root_name: String,
    /// Decode character references in text and attribute values of
    /// caller-supplied events. Tokenizing with [`parse`](crate::parse)
    /// already decodes, so this only affects the event-stream entry points.
    pub decode_entities: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            root_name: "html".to_string(),
            decode_entities: true,
        }
    }
}

/// Stack-based tree builder.
pub struct TreeBuilder {
    doc: Document,
    open_elements: Vec<NodeId>,
    decode_entities: bool,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::with_options(&ParseOptions::default())
    }

    pub fn with_options(options: &ParseOptions) -> Self {
        Self {
            doc: Document::new(options.root_name.clone()),
            open_elements: vec![NodeId::ROOT],
            decode_entities: options.decode_entities,
        }
    }

    /// Number of open elements, including the root.
    pub fn depth(&self) -> usize {
        self.open_elements.len()
    }

    fn current(&self) -> NodeId {
        // The root is never popped.
        self.open_elements.last().copied().unwrap_or(NodeId::ROOT)
    }

    fn decode(&self, raw: String) -> String {
        if !self.decode_entities {
            return raw;
        }
        match unescape(&raw) {
            Cow::Borrowed(_) => raw,
            Cow::Owned(decoded) => decoded,
        }
    }

    /// Process one event.
    pub fn process(&mut self, event: Event) {
        match event {
            Event::StartTag { name, attrs } => self.start_tag(name, attrs),
            Event::EndTag { name } => self.end_tag(&name),
            Event::Text(data) => self.text(data),
        }
    }

    fn start_tag(&mut self, name: String, attrs: Vec<(String, Option<String>)>) {
        let mut attributes = Attributes::new();
        for (key, value) in attrs {
            let value = value.map(|v| self.decode(v)).unwrap_or_default();
            attributes.insert(key, value);
        }

        let void = is_void_element(&name);
        let parent = self.current();
        let id = self.doc.append_element(parent, name, attributes);
        if !void {
            self.open_elements.push(id);
        }
    }

    fn end_tag(&mut self, name: &str) {
        if self.open_elements.len() > 1 {
            self.open_elements.pop();
        } else {
            tracing::trace!(name, "ignoring end tag with no open element");
        }
    }

    fn text(&mut self, data: String) {
        let data = self.decode(data);
        if data.trim().is_empty() {
            return;
        }
        let parent = self.current();
        self.doc.append_text(parent, data);
    }

    /// Stop building and return the document. Open elements stay open.
    pub fn finish(self) -> Document {
        tracing::debug!(
            nodes = self.doc.len(),
            unclosed = self.open_elements.len() - 1,
            "document built"
        );
        self.doc
    }
}

impl Extend<Event> for TreeBuilder {
    fn extend<I: IntoIterator<Item = Event>>(&mut self, events: I) {
        for event in events {
            self.process(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dom::NodeRef;

    fn build(events: Vec<Event>) -> Document {
        let mut builder = TreeBuilder::new();
        builder.extend(events);
        builder.finish()
    }

    fn start(name: &str) -> Event {
        Event::StartTag {
            name: name.to_string(),
            attrs: Vec::new(),
        }
    }

    #[test]
    fn test_nesting() {
        let doc = build(vec![
            start("div"),
            start("p"),
            Event::text("Hi"),
            Event::end_tag("p"),
            Event::end_tag("div"),
        ]);

        let div = doc.root().element_children().next().unwrap();
        assert_eq!(div.name(), "div");
        let p = div.element_children().next().unwrap();
        assert_eq!(p.name(), "p");
        assert_eq!(p.text(), "Hi");
        assert_eq!(p.parent(), Some(div));
    }

    #[test]
    fn test_void_elements_are_never_pushed() {
        let mut builder = TreeBuilder::new();
        builder.process(start("p"));
        builder.process(start("br"));
        assert_eq!(builder.depth(), 2);
        builder.process(Event::text("after"));
        let doc = builder.finish();

        let p = doc.root().element_children().next().unwrap();
        let children: Vec<_> = p.children().collect();
        assert_eq!(children.len(), 2);
        let br = children[0].as_element().unwrap();
        assert_eq!(br.name(), "br");
        assert_eq!(br.children().len(), 0);
        assert!(matches!(children[1], NodeRef::Text(t) if t.content() == "after"));
    }

    #[test]
    fn test_void_check_ignores_case() {
        let doc = build(vec![start("BR"), Event::text("x")]);
        let children: Vec<_> = doc.root().children().collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].as_element().unwrap().name(), "BR");
    }

    #[test]
    fn test_stray_end_tags() {
        let mut builder = TreeBuilder::new();
        builder.process(Event::end_tag("p"));
        assert_eq!(builder.depth(), 1);

        builder.process(start("a"));
        builder.process(Event::end_tag("b"));
        builder.process(Event::end_tag("a"));
        assert_eq!(builder.depth(), 1);

        let doc = builder.finish();
        assert_eq!(doc.root().children().len(), 1);
    }

    #[test]
    fn test_mismatched_end_closes_current() {
        let doc = build(vec![
            start("a"),
            start("b"),
            Event::end_tag("a"),
            Event::text("x"),
        ]);

        let a = doc.root().element_children().next().unwrap();
        // `</a>` closed `b`, so the text lands in `a`.
        assert_eq!(a.children().len(), 2);
        assert_eq!(a.text(), "x");
    }

    #[test]
    fn test_whitespace_text_is_dropped() {
        let doc = build(vec![
            Event::text("  \n\t"),
            start("p"),
            Event::text(" a "),
            Event::end_tag("p"),
            Event::text("\u{a0}"),
        ]);

        assert_eq!(doc.root().children().len(), 1);
        assert_eq!(doc.root().text(), " a ");
    }

    #[test]
    fn test_unclosed_elements_at_end() {
        let doc = build(vec![start("div"), start("span"), Event::text("x")]);
        let div = doc.root().element_children().next().unwrap();
        let span = div.element_children().next().unwrap();
        assert_eq!(span.text(), "x");
    }

    #[test]
    fn test_attribute_values() {
        let doc = build(vec![Event::StartTag {
            name: "a".to_string(),
            attrs: vec![
                ("href".to_string(), Some("?a=1&amp;b=2".to_string())),
                ("download".to_string(), None),
                ("href".to_string(), Some("/last".to_string())),
            ],
        }]);

        let a = doc.root().element_children().next().unwrap();
        assert_eq!(a.get_attr("download"), Some(""));
        assert_eq!(a.get_attr("href"), Some("/last"));
        assert_eq!(a.attributes().len(), 2);
    }

    #[test]
    fn test_decoding_text() {
        let doc = build(vec![Event::text("Hi &amp; bye")]);
        assert_eq!(doc.root().text(), "Hi & bye");

        // A decoded space is still whitespace.
        let doc = build(vec![Event::text("&#32;")]);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_decoding_disabled() {
        let options = ParseOptions {
            decode_entities: false,
            ..ParseOptions::default()
        };
        let mut builder = TreeBuilder::with_options(&options);
        builder.process(Event::text("Hi &amp; bye"));
        let doc = builder.finish();
        assert_eq!(doc.root().text(), "Hi &amp; bye");
    }

    #[test]
    fn test_custom_root_name() {
        let options = ParseOptions {
            root_name: "document".to_string(),
            ..ParseOptions::default()
        };
        let doc = TreeBuilder::with_options(&options).finish();
        assert_eq!(doc.root().name(), "document");
    }
}
