//! Document preprocessor
//!
//!     One left-to-right pass over the source:
//!
//!     1. Find the next tag candidate from the search position and copy the text before it.
//!     2. Inside a no-parse region, copy everything verbatim until the closing no-parse tag.
//!     3. Style tags (when a style lookup is configured) are replaced in place by the
//!        style's text, which is then scanned like the rest of the source.
//!     4. Anything else goes to the processor of its family. Accepted tags are dropped from
//!        the output; rejected ones are copied through untouched.
//!
//!     After the pass, tags still open are force-closed at the output length. An empty
//!     output is replaced by the configured placeholder (a single space by default); spans
//!     are not adjusted for it.
//!
//!     All indices are character indices into the output text.

use super::processor::TagProcessor;
use super::styles::StyleLookup;
use crate::textfx::parameters::parse_parameters;
use crate::textfx::registry::TagRegistry;
use crate::textfx::tags::{
    find_next_tag, EffectTag, EffectTagIndices, EndKind, RawTag, TagKind, TagPrefix,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How deep style tags may expand inside the text of other style expansions. Style tags
/// found deeper than this stay literal, which stops styles that expand to themselves.
const MAX_STYLE_DEPTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    /// Name of the literal region tag, `<noparse>...</noparse>`.
    pub noparse_tag: String,
    /// Name of the style macro tag, `<style="Name">...</style>`.
    pub style_tag: String,
    /// Text returned instead of an empty output.
    pub empty_output_placeholder: String,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            noparse_tag: "noparse".to_string(),
            style_tag: "style".to_string(),
            empty_output_placeholder: " ".to_string(),
        }
    }
}

/// A finalized tag and where it applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagSpan {
    pub tag: EffectTag,
    pub indices: EffectTagIndices,
}

/// `wave 0..3 #0 closed amp=2`: prefix and name, range, order at index, end kind and
/// parameters.
impl fmt::Display for TagSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indices = &self.indices;
        let end_kind = match indices.end_kind {
            EndKind::Single => "single",
            EndKind::Closed => "closed",
            EndKind::Open => "open",
        };
        write!(
            f,
            "{}{} {}..{} #{} {}",
            self.tag.prefix(),
            self.tag.name(),
            indices.start,
            indices.end,
            indices.order_at_index,
            end_kind
        )?;
        if !self.tag.parameters().is_empty() {
            write!(f, " {}", self.tag.parameters())?;
        }
        Ok(())
    }
}

/// Output of one preprocess pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedDocument {
    /// Display text with accepted tags stripped.
    pub text: String,
    /// Length of `text` in characters.
    pub text_len: usize,
    /// Spans of all families, ordered by family, then start, then order at index.
    pub spans: Vec<TagSpan>,
}

impl ProcessedDocument {
    pub fn spans_for(&self, prefix: TagPrefix) -> impl Iterator<Item = &TagSpan> {
        self.spans
            .iter()
            .filter(move |span| span.tag.prefix() == prefix)
    }
}

pub struct DocumentPreprocessor<'a, R: TagRegistry + ?Sized> {
    registry: &'a R,
    styles: Option<&'a dyn StyleLookup>,
    options: PreprocessOptions,
    processors: Vec<TagProcessor>,
}

impl<'a, R: TagRegistry + ?Sized> DocumentPreprocessor<'a, R> {
    pub fn new(registry: &'a R) -> Self {
        Self {
            registry,
            styles: None,
            options: PreprocessOptions::default(),
            processors: TagPrefix::ALL.into_iter().map(TagProcessor::new).collect(),
        }
    }

    pub fn with_styles(mut self, styles: &'a dyn StyleLookup) -> Self {
        self.styles = Some(styles);
        self
    }

    pub fn with_options(mut self, options: PreprocessOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &PreprocessOptions {
        &self.options
    }

    pub fn preprocess(&mut self, source: &str) -> ProcessedDocument {
        for processor in &mut self.processors {
            processor.reset();
        }

        let mut source: Vec<char> = source.chars().collect();
        let mut output = Output::default();
        let mut search = 0;
        let mut literal = false;
        let mut style_closings: Vec<String> = Vec::new();
        // End (exclusive) of every substituted style text still ahead of the search position,
        // outermost first.
        let mut expanded_regions: Vec<usize> = Vec::new();

        while let Some(raw) = find_next_tag(&source, search) {
            output.push(&source[search..raw.start]);
            search = raw.end;

            if literal {
                if raw.kind == TagKind::Close && raw.is_plain(&self.options.noparse_tag) {
                    literal = false;
                } else {
                    output.push(&source[raw.start..raw.end]);
                }
                continue;
            }

            if raw.is_plain(&self.options.noparse_tag) {
                if raw.kind == TagKind::Open {
                    literal = true;
                } else {
                    output.push(&source[raw.start..raw.end]);
                }
                continue;
            }

            if self.styles.is_some() && raw.is_plain(&self.options.style_tag) {
                while expanded_regions.last().is_some_and(|&end| end <= raw.start) {
                    expanded_regions.pop();
                }
                let expansion = if expanded_regions.len() < MAX_STYLE_DEPTH {
                    self.expand_style(&raw, &mut style_closings)
                } else {
                    None
                };
                match expansion {
                    Some(text) => {
                        let inserted: Vec<char> = text.chars().collect();
                        let removed = raw.end - raw.start;
                        for end in &mut expanded_regions {
                            *end = if *end >= raw.end {
                                *end - removed + inserted.len()
                            } else {
                                raw.start + inserted.len()
                            };
                        }
                        expanded_regions.push(raw.start + inserted.len());
                        source.splice(raw.start..raw.end, inserted);
                        search = raw.start;
                    }
                    None => {
                        tracing::trace!(
                            target: "textfx::preprocess",
                            name = %raw.name,
                            "unresolved style tag"
                        );
                        output.push(&source[raw.start..raw.end]);
                    }
                }
                continue;
            }

            let index = output.len;
            let registry = self.registry;
            let accepted = self
                .processors
                .iter_mut()
                .find(|processor| processor.prefix() == raw.prefix)
                .is_some_and(|processor| processor.process(&raw, index, registry));
            if !accepted {
                tracing::trace!(
                    target: "textfx::preprocess",
                    name = %raw.name,
                    prefix = ?raw.prefix,
                    kind = ?raw.kind,
                    "tag passed through"
                );
                output.push(&source[raw.start..raw.end]);
            }
        }
        output.push(&source[search.min(source.len())..]);

        let mut spans = Vec::new();
        for processor in &mut self.processors {
            processor.finish(output.len);
            spans.extend(
                processor
                    .take_finalized()
                    .into_iter()
                    .map(|(tag, indices)| TagSpan { tag, indices }),
            );
        }
        spans.sort_by(|a, b| {
            a.tag
                .prefix()
                .cmp(&b.tag.prefix())
                .then_with(|| a.indices.cmp_order(&b.indices))
        });

        if output.len == 0 {
            output.text = self.options.empty_output_placeholder.clone();
            output.len = output.text.chars().count();
        }

        tracing::debug!(
            target: "textfx::preprocess",
            source_len = source.len(),
            text_len = output.len,
            spans = spans.len(),
            "preprocessed document"
        );

        ProcessedDocument {
            text: output.text,
            text_len: output.len,
            spans,
        }
    }

    fn expand_style(&self, raw: &RawTag, closings: &mut Vec<String>) -> Option<String> {
        let styles = self.styles?;
        match raw.kind {
            TagKind::Open => {
                let parameters = parse_parameters(&raw.parameter_text);
                let style = styles.style(parameters.default_value()?)?;
                closings.push(style.closing.clone());
                Some(style.opening.clone())
            }
            TagKind::Close => closings.pop(),
        }
    }
}

#[derive(Default)]
struct Output {
    text: String,
    len: usize,
}

impl Output {
    fn push(&mut self, chars: &[char]) {
        self.text.extend(chars);
        self.len += chars.len();
    }
}
