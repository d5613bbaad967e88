//! Error types for tagsoup operations.

use std::fmt;

use thiserror::Error;

/// One of the four independent conditions of a [`NodeFilter`](crate::NodeFilter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterSlot {
    Name,
    Text,
    Attributes,
    Other,
}

impl FilterSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterSlot::Name => "name",
            FilterSlot::Text => "text",
            FilterSlot::Attributes => "attributes",
            FilterSlot::Other => "other",
        }
    }
}

impl fmt::Display for FilterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while building a query.
///
/// Markup itself never produces an error: the tree builder accepts any
/// event sequence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid filter value for `{slot}`: {found}")]
    InvalidFilter { slot: FilterSlot, found: String },
}

pub type Result<T> = std::result::Result<T, Error>;
