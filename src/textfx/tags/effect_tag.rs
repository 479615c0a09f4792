//! Finalized tags and the character ranges they cover
//!
//!     An [EffectTag] says *what* was tagged, [EffectTagIndices] says *where*. Both are
//!     plain values; the live copies of the indices are owned by a
//!     [TagCache](crate::textfx::cache::TagCache) and updated in place by reconciliation.

use super::prefix::TagPrefix;
use crate::textfx::parameters::ParameterMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How a tag's end index is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagType {
    /// No content; the span always covers exactly one index.
    Empty,
    /// Covers everything up to its close tag, or to the end of the document.
    Container,
    /// A container, unless self-closed or closed right where it opened.
    Either,
}

/// Identity of a tag instance: family, name and parsed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectTag {
    name: String,
    prefix: TagPrefix,
    parameters: ParameterMap,
}

impl EffectTag {
    pub fn new(name: impl Into<String>, prefix: TagPrefix, parameters: ParameterMap) -> Self {
        Self {
            name: name.into(),
            prefix,
            parameters,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> TagPrefix {
        self.prefix
    }

    pub fn parameters(&self) -> &ParameterMap {
        &self.parameters
    }
}

/// Where the end index of a span came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndKind {
    /// Empty tag: `end` is always `start + 1`.
    Single,
    /// Ended by a matching close tag.
    Closed,
    /// Still open at the end of the document; `end` follows the document length.
    Open,
}

/// Character range of a tag instance.
///
/// `end` is exclusive. `order_at_index` breaks ties between tags starting at the same
/// index, in encounter order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectTagIndices {
    pub start: usize,
    pub end: usize,
    pub order_at_index: usize,
    pub end_kind: EndKind,
}

impl EffectTagIndices {
    /// Span ended by a close tag.
    pub fn closed(start: usize, end: usize, order_at_index: usize) -> Self {
        debug_assert!(start <= end, "span start {} after end {}", start, end);
        Self {
            start,
            end: end.max(start),
            order_at_index,
            end_kind: EndKind::Closed,
        }
    }

    /// Span of an empty tag.
    pub fn single(start: usize, order_at_index: usize) -> Self {
        Self {
            start,
            end: start + 1,
            order_at_index,
            end_kind: EndKind::Single,
        }
    }

    /// Span force-closed at the end of a document of `document_len` characters.
    pub fn open_ended(start: usize, document_len: usize, order_at_index: usize) -> Self {
        Self {
            start,
            end: document_len.max(start),
            order_at_index,
            end_kind: EndKind::Open,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_open_ended(&self) -> bool {
        self.end_kind == EndKind::Open
    }

    /// Whether the span covers `index`.
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    /// Re-resolve an open end against a new document length. Other spans are untouched.
    pub fn resolve_open_end(&mut self, document_len: usize) {
        if self.end_kind == EndKind::Open {
            self.end = document_len.max(self.start);
        }
    }

    /// Ordering used whenever tags active at an index are listed.
    pub fn cmp_order(&self, other: &Self) -> Ordering {
        (self.start, self.order_at_index).cmp(&(other.start, other.order_at_index))
    }
}
