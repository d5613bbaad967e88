//! Markup tokenization via html5ever.
//!
//! The tree builder only understands three kinds of [`Event`]. This module
//! runs html5ever's tokenizer over a string and reduces its token stream to
//! those events. Character references are decoded by the tokenizer itself.

use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

use crate::tree_builder::is_void_element;

/// A tokenizer event, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Opening tag. Attributes keep source order; a valueless attribute
    /// has `None`.
    StartTag {
        name: String,
        attrs: Vec<(String, Option<String>)>,
    },
    /// Closing tag.
    EndTag { name: String },
    /// A run of character data between two tags.
    Text(String),
}

impl Event {
    pub fn start_tag<N, V>(
        name: impl Into<String>,
        attrs: impl IntoIterator<Item = (N, Option<V>)>,
    ) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Event::StartTag {
            name: name.into(),
            attrs: attrs
                .into_iter()
                .map(|(k, v)| (k.into(), v.map(Into::into)))
                .collect(),
        }
    }

    pub fn end_tag(name: impl Into<String>) -> Self {
        Event::EndTag { name: name.into() }
    }

    pub fn text(data: impl Into<String>) -> Self {
        Event::Text(data.into())
    }
}

/// Collects html5ever tokens into [`Event`]s.
///
/// html5ever may split one run of character data into several tokens, so
/// text is buffered until the next tag, comment, doctype or end of input.
///
/// Uses interior mutability (RefCell) because html5ever's TokenSink trait
/// takes `&self`.
#[derive(Default)]
struct EventSink {
    events: RefCell<Vec<Event>>,
    pending_text: RefCell<String>,
}

impl EventSink {
    fn flush_text(&self) {
        let mut pending = self.pending_text.borrow_mut();
        if !pending.is_empty() {
            let text = std::mem::take(&mut *pending);
            self.events.borrow_mut().push(Event::Text(text));
        }
    }

    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }

    fn into_events(self) -> Vec<Event> {
        self.flush_text();
        self.events.into_inner()
    }
}

impl TokenSink for EventSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(text) => self.pending_text.borrow_mut().push_str(&text),
            Token::NullCharacterToken => self.pending_text.borrow_mut().push('\0'),
            Token::TagToken(tag) => {
                self.flush_text();
                let name = tag.name.to_string();
                match tag.kind {
                    TagKind::StartTag => {
                        let attrs = tag
                            .attrs
                            .into_iter()
                            .map(|a| (a.name.local.to_string(), Some(a.value.to_string())))
                            .collect();
                        let void = is_void_element(&name);
                        self.push(Event::StartTag {
                            name: name.clone(),
                            attrs,
                        });

                        // `<x/>` opens and immediately closes non-void elements.
                        if tag.self_closing && !void {
                            self.push(Event::EndTag { name });
                            return TokenSinkResult::Continue;
                        }
                        return raw_content_mode(&name);
                    }
                    TagKind::EndTag => self.push(Event::EndTag { name }),
                }
            }
            Token::CommentToken(_) | Token::DoctypeToken(_) | Token::EOFToken => {
                self.flush_text();
            }
            Token::ParseError(msg) => {
                tracing::trace!(%msg, "tokenizer parse error");
            }
        }
        TokenSinkResult::Continue
    }
}

/// Elements whose content is not parsed as markup.
fn raw_content_mode(name: &str) -> TokenSinkResult<()> {
    match name {
        "script" => TokenSinkResult::RawData(RawKind::ScriptData),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
            TokenSinkResult::RawData(RawKind::Rawtext)
        }
        "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
        "plaintext" => TokenSinkResult::Plaintext,
        _ => TokenSinkResult::Continue,
    }
}

/// Tokenize a complete markup string into events.
pub fn tokenize(input: &str) -> Vec<Event> {
    let tokenizer = Tokenizer::new(EventSink::default(), TokenizerOpts::default());
    let queue = BufferQueue::default();
    queue.push_back(StrTendril::from_slice(input));

    // The sink never hands back a script, so one feed drains the queue.
    let _ = tokenizer.feed(&queue);
    tokenizer.end();
    tokenizer.sink.into_events()
}
