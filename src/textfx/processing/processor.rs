//! Tag processor
//!
//!     One processor per tag family. It keeps a stack of open tags per name, so nested tags
//!     of the same name match LIFO:
//!
//!         <wave>a<wave>b</wave>c</wave>
//!               ^ outer 0..3    ^ inner 1..2
//!
//!     Acceptance rules:
//!     - Open: the registry must know the name and accept its parameters.
//!       Empty tags (and self-closed Either tags) are finalized right away with
//!       `end = start + 1`. A self-closed Container tag is rejected.
//!     - Close: pops the innermost open tag of that name. Nothing to pop means the close
//!       is rejected and stays in the text. Closes of Empty tags therefore never match.
//!     - Either tags closed where they opened become Empty.
//!
//!     Tags still open at the end of the document are force-closed innermost first, ending
//!     at the document length and flagged open-ended.
//!
//!     `order_at_index` is assigned when a tag opens: the n-th tag of this family opening at
//!     some index gets `n`.

use crate::textfx::parameters::parse_parameters;
use crate::textfx::registry::TagRegistry;
use crate::textfx::tags::{EffectTag, EffectTagIndices, RawTag, TagKind, TagPrefix, TagType};
use std::collections::HashMap;

#[derive(Debug)]
struct OpenTag {
    tag: EffectTag,
    tag_type: TagType,
    start: usize,
    order_at_index: usize,
    /// Global open order within the family, for force-closing innermost first.
    sequence: usize,
}

#[derive(Debug)]
pub struct TagProcessor {
    prefix: TagPrefix,
    stacks: HashMap<String, Vec<OpenTag>>,
    finalized: Vec<(EffectTag, EffectTagIndices)>,
    last_open_index: Option<usize>,
    order_at_last_index: usize,
    sequence: usize,
}

impl TagProcessor {
    pub fn new(prefix: TagPrefix) -> Self {
        Self {
            prefix,
            stacks: HashMap::new(),
            finalized: Vec::new(),
            last_open_index: None,
            order_at_last_index: 0,
            sequence: 0,
        }
    }

    pub fn prefix(&self) -> TagPrefix {
        self.prefix
    }

    /// Offer a tag found at `text_index` of the stripped text. Returns whether it was
    /// accepted; rejected tags leave no trace in the processor.
    pub fn process<R: TagRegistry + ?Sized>(
        &mut self,
        raw: &RawTag,
        text_index: usize,
        registry: &R,
    ) -> bool {
        if raw.prefix != self.prefix {
            return false;
        }
        match raw.kind {
            TagKind::Open => self.open(raw, text_index, registry),
            TagKind::Close => self.close(raw, text_index),
        }
    }

    fn open<R: TagRegistry + ?Sized>(
        &mut self,
        raw: &RawTag,
        text_index: usize,
        registry: &R,
    ) -> bool {
        let Some(tag_type) = registry.tag_type(self.prefix, &raw.name) else {
            return false;
        };
        let parameters = parse_parameters(&raw.parameter_text);
        if !registry.validate(self.prefix, &raw.name, &parameters) {
            return false;
        }

        let single = match tag_type {
            TagType::Empty => true,
            TagType::Either => raw.self_closing,
            TagType::Container if raw.self_closing => return false,
            TagType::Container => false,
        };

        let tag = EffectTag::new(raw.name.clone(), self.prefix, parameters);
        let order_at_index = self.next_order(text_index);
        if single {
            self.finalized
                .push((tag, EffectTagIndices::single(text_index, order_at_index)));
        } else {
            self.sequence += 1;
            self.stacks.entry(raw.name.clone()).or_default().push(OpenTag {
                tag,
                tag_type,
                start: text_index,
                order_at_index,
                sequence: self.sequence,
            });
        }
        true
    }

    fn close(&mut self, raw: &RawTag, text_index: usize) -> bool {
        let Some(open) = self.stacks.get_mut(&raw.name).and_then(|stack| stack.pop()) else {
            return false;
        };

        let indices = if open.tag_type == TagType::Either && text_index == open.start {
            EffectTagIndices::single(open.start, open.order_at_index)
        } else {
            EffectTagIndices::closed(open.start, text_index, open.order_at_index)
        };
        self.finalized.push((open.tag, indices));
        true
    }

    fn next_order(&mut self, text_index: usize) -> usize {
        if self.last_open_index == Some(text_index) {
            self.order_at_last_index += 1;
        } else {
            self.last_open_index = Some(text_index);
            self.order_at_last_index = 0;
        }
        self.order_at_last_index
    }

    /// Number of tags currently open.
    pub fn open_count(&self) -> usize {
        self.stacks.values().map(Vec::len).sum()
    }

    /// Force-close everything still open, innermost first.
    pub fn finish(&mut self, document_len: usize) {
        let mut remaining: Vec<OpenTag> =
            self.stacks.drain().flat_map(|(_, stack)| stack).collect();
        remaining.sort_by(|a, b| b.sequence.cmp(&a.sequence));
        for open in remaining {
            let indices =
                EffectTagIndices::open_ended(open.start, document_len, open.order_at_index);
            self.finalized.push((open.tag, indices));
        }
    }

    /// Finalized spans, in the order they were finalized.
    pub fn finalized(&self) -> &[(EffectTag, EffectTagIndices)] {
        &self.finalized
    }

    pub fn take_finalized(&mut self) -> Vec<(EffectTag, EffectTagIndices)> {
        std::mem::take(&mut self.finalized)
    }

    /// Forget everything, ready for the next document.
    pub fn reset(&mut self) {
        self.stacks.clear();
        self.finalized.clear();
        self.last_open_index = None;
        self.order_at_last_index = 0;
        self.sequence = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textfx::registry::{StaticRegistry, TagSpec};
    use crate::textfx::tags::{find_next_tag, EndKind};

    fn registry() -> StaticRegistry {
        StaticRegistry::new()
            .with_tag(TagPrefix::None, "wave", TagSpec::container())
            .with_tag(TagPrefix::None, "pivot", TagSpec::either())
            .with_tag(TagPrefix::Event, "ping", TagSpec::empty())
    }

    fn raw(text: &str) -> RawTag {
        let chars: Vec<char> = text.chars().collect();
        find_next_tag(&chars, 0).unwrap()
    }

    fn spans(processor: &TagProcessor) -> Vec<(String, usize, usize, usize)> {
        processor
            .finalized()
            .iter()
            .map(|(tag, ix)| (tag.name().to_string(), ix.start, ix.end, ix.order_at_index))
            .collect()
    }

    #[test]
    fn test_nested_same_name() {
        let registry = registry();
        let mut processor = TagProcessor::new(TagPrefix::None);
        assert!(processor.process(&raw("<wave>"), 0, &registry));
        assert!(processor.process(&raw("<wave>"), 1, &registry));
        assert!(processor.process(&raw("</wave>"), 2, &registry));
        assert!(processor.process(&raw("</wave>"), 3, &registry));
        assert_eq!(
            spans(&processor),
            vec![("wave".into(), 1, 2, 0), ("wave".into(), 0, 3, 0)]
        );
    }

    #[test]
    fn test_unbalanced_close_is_rejected() {
        let registry = registry();
        let mut processor = TagProcessor::new(TagPrefix::None);
        assert!(!processor.process(&raw("</wave>"), 0, &registry));
        assert!(processor.finalized().is_empty());
    }

    #[test]
    fn test_wrong_family_and_unknown_names() {
        let registry = registry();
        let mut processor = TagProcessor::new(TagPrefix::None);
        assert!(!processor.process(&raw("<+wave>"), 0, &registry));
        assert!(!processor.process(&raw("<shake>"), 0, &registry));
    }

    #[test]
    fn test_empty_tags_finalize_on_open() {
        let registry = registry();
        let mut processor = TagProcessor::new(TagPrefix::Event);
        assert!(processor.process(&raw("<?ping>"), 4, &registry));
        assert!(processor.process(&raw("<?ping>"), 4, &registry));
        assert!(!processor.process(&raw("</?ping>"), 5, &registry));
        assert_eq!(
            spans(&processor),
            vec![("ping".into(), 4, 5, 0), ("ping".into(), 4, 5, 1)]
        );
    }

    #[test]
    fn test_self_closing_container_is_rejected() {
        let registry = registry();
        let mut processor = TagProcessor::new(TagPrefix::None);
        assert!(!processor.process(&raw("<wave/>"), 0, &registry));
    }

    #[test]
    fn test_either() {
        let registry = registry();
        let mut processor = TagProcessor::new(TagPrefix::None);
        assert!(processor.process(&raw("<pivot/>"), 0, &registry));
        assert!(processor.process(&raw("<pivot>"), 2, &registry));
        assert!(processor.process(&raw("</pivot>"), 2, &registry));
        assert!(processor.process(&raw("<pivot>"), 3, &registry));
        assert!(processor.process(&raw("</pivot>"), 6, &registry));
        let kinds: Vec<_> = processor.finalized().iter().map(|(_, ix)| ix.end_kind).collect();
        assert_eq!(kinds, vec![EndKind::Single, EndKind::Single, EndKind::Closed]);
        assert_eq!(spans(&processor)[2], ("pivot".into(), 3, 6, 0));
    }

    #[test]
    fn test_finish_closes_innermost_first() {
        let registry = registry();
        let mut processor = TagProcessor::new(TagPrefix::None);
        processor.process(&raw("<wave>"), 0, &registry);
        processor.process(&raw("<pivot>"), 0, &registry);
        processor.process(&raw("<wave>"), 2, &registry);
        assert_eq!(processor.open_count(), 3);
        processor.finish(7);
        assert_eq!(processor.open_count(), 0);
        assert_eq!(
            spans(&processor),
            vec![
                ("wave".into(), 2, 7, 0),
                ("pivot".into(), 0, 7, 1),
                ("wave".into(), 0, 7, 0),
            ]
        );
        assert!(processor.finalized().iter().all(|(_, ix)| ix.is_open_ended()));
    }

    #[test]
    fn test_reset() {
        let registry = registry();
        let mut processor = TagProcessor::new(TagPrefix::None);
        processor.process(&raw("<wave>"), 0, &registry);
        processor.reset();
        assert_eq!(processor.open_count(), 0);
        assert!(processor.take_finalized().is_empty());
    }
}
