//! # tagsoup
//!
//! A small, forgiving markup parser that builds an in-memory tag tree and
//! lets you search it with composable filters.
//!
//! ## Features
//!
//! - Tokenizes with html5ever, then builds the tree with a simple
//!   open-element stack
//! - Never fails on malformed markup: stray end tags are ignored and
//!   unclosed elements stay open
//! - Void elements (`br`, `img`, ...) never take children
//! - Queries by name, text, attribute predicate or arbitrary node predicate
//!
//! ## Quick Start
//!
//! ```
//! use tagsoup::{parse, NodeFilter};
//!
//! let doc = parse(r#"<div><p>Hi &amp; bye</p><br><img src="x"></div>"#);
//!
//! let p = doc.find(&NodeFilter::by_name("p")).unwrap();
//! assert_eq!(p.text(), "Hi & bye");
//!
//! let img = NodeFilter::builder()
//!     .attributes_fn(|attrs| attrs.get("src") == Some("x"))
//!     .build()
//!     .unwrap();
//! assert_eq!(doc.find(&img).unwrap().name(), "img");
//! ```
//!
//! ## Event streams
//!
//! Input that was tokenized elsewhere can be fed in directly:
//!
//! ```
//! use tagsoup::{parse_events, Event};
//!
//! let doc = parse_events([
//!     Event::start_tag("a", [("href", Some("/"))]),
//!     Event::text("home &amp; away"),
//!     Event::end_tag("a"),
//! ]);
//! assert_eq!(doc.root().text(), "home & away");
//! ```

pub mod dom;
pub mod entities;
pub mod error;
pub mod filter;
pub mod query;
pub mod tokenizer;
pub mod tree_builder;

pub use dom::{Attributes, Document, ElementRef, NodeId, NodeRef, TextRef};
#[cfg(feature = "serde")]
pub use dom::MAX_SERIALIZE_DEPTH;
pub use error::{Error, FilterSlot, Result};
pub use filter::{FilterValue, Matcher, NodeFilter, NodeFilterBuilder};
pub use tokenizer::{Event, tokenize};
pub use tree_builder::{ParseOptions, TreeBuilder, VOID_ELEMENTS, is_void_element};

/// Parse a markup string into a document with default options.
///
/// Character references are decoded by html5ever using the full HTML table
/// (`&nbsp;`, `&copy`, `&AMP;`, `&#X41;` all decode), and a duplicated
/// attribute keeps its first value. [`parse_events`] decodes only the five
/// XML entities plus numeric references, and keeps the last duplicate.
pub fn parse(html: &str) -> Document {
    parse_with_options(html, &ParseOptions::default())
}

/// Parse a markup string into a document.
///
/// html5ever decodes character references while tokenizing, so
/// `options.decode_entities` is not applied a second time here.
pub fn parse_with_options(html: &str, options: &ParseOptions) -> Document {
    let options = ParseOptions {
        decode_entities: false,
        ..options.clone()
    };
    parse_events_with_options(tokenize(html), &options)
}

/// Build a document from an already-tokenized event stream.
///
/// Text and attribute values are treated as raw character data, so
/// character references in them are decoded.
pub fn parse_events<I>(events: I) -> Document
where
    I: IntoIterator<Item = Event>,
{
    parse_events_with_options(events, &ParseOptions::default())
}

/// Build a document from an event stream with explicit options.
pub fn parse_events_with_options<I>(events: I, options: &ParseOptions) -> Document
where
    I: IntoIterator<Item = Event>,
{
    let mut builder = TreeBuilder::with_options(options);
    builder.extend(events);
    builder.finish()
}
