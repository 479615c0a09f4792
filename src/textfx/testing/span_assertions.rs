//! Fluent span assertions

use crate::textfx::processing::{ProcessedDocument, TagSpan};
use crate::textfx::tags::{EndKind, TagPrefix};
use std::fmt::Write;

pub fn assert_spans(document: &ProcessedDocument) -> SpansAssertion<'_> {
    SpansAssertion {
        document,
        context: "document".to_string(),
    }
}

pub struct SpansAssertion<'a> {
    document: &'a ProcessedDocument,
    context: String,
}

impl<'a> SpansAssertion<'a> {
    pub fn text(self, expected: &str) -> Self {
        assert_eq!(
            self.document.text, expected,
            "{}: Expected text {:?}, found {:?}",
            self.context, expected, self.document.text
        );
        assert_eq!(
            self.document.text_len,
            expected.chars().count(),
            "{}: text_len does not match the text",
            self.context
        );
        self
    }

    pub fn count(self, expected: usize) -> Self {
        let actual = self.document.spans.len();
        assert_eq!(
            actual,
            expected,
            "{}: Expected {} spans, found {}:\n{}",
            self.context,
            expected,
            actual,
            render_spans(self.document)
        );
        self
    }

    pub fn family_count(self, prefix: TagPrefix, expected: usize) -> Self {
        let actual = self.document.spans_for(prefix).count();
        assert_eq!(
            actual,
            expected,
            "{}: Expected {} {} spans, found {}",
            self.context,
            expected,
            prefix.family_name(),
            actual
        );
        self
    }

    pub fn span<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(SpanAssertion<'a>) -> SpanAssertion<'a>,
    {
        let span = self.document.spans.get(index).unwrap_or_else(|| {
            panic!(
                "{}: Span index {} out of bounds (document has {} spans)",
                self.context,
                index,
                self.document.spans.len()
            )
        });
        assertion(SpanAssertion {
            span,
            context: format!("{}:spans[{}]", self.context, index),
        });
        self
    }
}

pub struct SpanAssertion<'a> {
    span: &'a TagSpan,
    context: String,
}

impl SpanAssertion<'_> {
    pub fn name(self, expected: &str) -> Self {
        assert_eq!(
            self.span.tag.name(),
            expected,
            "{}: Expected tag name {:?}",
            self.context,
            expected
        );
        self
    }

    pub fn prefix(self, expected: TagPrefix) -> Self {
        assert_eq!(
            self.span.tag.prefix(),
            expected,
            "{}: Expected prefix {:?}",
            self.context,
            expected
        );
        self
    }

    /// `start..end`, end exclusive.
    pub fn range(self, start: usize, end: usize) -> Self {
        let indices = &self.span.indices;
        assert_eq!(
            (indices.start, indices.end),
            (start, end),
            "{}: Expected range {}..{}, found {}..{}",
            self.context,
            start,
            end,
            indices.start,
            indices.end
        );
        self
    }

    pub fn order(self, expected: usize) -> Self {
        assert_eq!(
            self.span.indices.order_at_index, expected,
            "{}: Expected order at index {}",
            self.context, expected
        );
        self
    }

    pub fn end_kind(self, expected: EndKind) -> Self {
        assert_eq!(
            self.span.indices.end_kind, expected,
            "{}: Expected end kind {:?}",
            self.context, expected
        );
        self
    }

    pub fn param(self, key: &str, expected: &str) -> Self {
        assert_eq!(
            self.span.tag.parameters().get(key),
            Some(expected),
            "{}: Expected parameter {:?} = {:?}",
            self.context,
            key,
            expected
        );
        self
    }
}

/// One line per span, in the [TagSpan] display format:
///
///     wave 0..3 #0 closed amp=2
///     ?done 13..14 #0 single
pub fn render_spans(document: &ProcessedDocument) -> String {
    let mut out = String::new();
    for span in &document.spans {
        let _ = writeln!(out, "{}", span);
    }
    out
}
