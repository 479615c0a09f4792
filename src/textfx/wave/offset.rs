//! Per-character phase offsets
//!
//! Characters of one animated span are spread over the wave by giving each a phase offset
//! derived from where it sits: `offset = -position * uniformity`. A uniformity of zero
//! moves every character in lockstep.

use crate::textfx::tags::EffectTagIndices;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which position of a character drives its offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OffsetKind {
    /// Index in the whole document.
    Index,
    /// Index relative to the start of the span.
    #[default]
    SegmentIndex,
    /// Number of the word inside the span the character belongs to.
    Word,
    None,
}

/// Where a character sits, in every unit an [OffsetKind] can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharacterPosition {
    pub index: usize,
    pub segment_index: usize,
    pub word: usize,
}

impl CharacterPosition {
    /// Position of `index` inside `span` of `text`. Whitespace belongs to the word before it.
    pub fn within(text: &[char], span: &EffectTagIndices, index: usize) -> Self {
        let start = span.start.min(index);
        let end = (index + 1).min(text.len());
        let mut word = 0;
        let mut in_word = false;
        let mut seen_word = false;
        for c in text.get(start..end).unwrap_or_default() {
            if c.is_whitespace() {
                in_word = false;
            } else if !in_word {
                if seen_word {
                    word += 1;
                }
                seen_word = true;
                in_word = true;
            }
        }
        Self {
            index,
            segment_index: index - start,
            word,
        }
    }
}

impl OffsetKind {
    pub fn offset(self, position: &CharacterPosition, uniformity: f32) -> f32 {
        let value = match self {
            OffsetKind::Index => position.index,
            OffsetKind::SegmentIndex => position.segment_index,
            OffsetKind::Word => position.word,
            OffsetKind::None => return 0.0,
        };
        -(value as f32) * uniformity
    }
}

impl fmt::Display for OffsetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OffsetKind::Index => "index",
            OffsetKind::SegmentIndex => "segment-index",
            OffsetKind::Word => "word",
            OffsetKind::None => "none",
        };
        f.write_str(name)
    }
}

impl FromStr for OffsetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "index" | "idx" => Ok(OffsetKind::Index),
            "segmentindex" | "segment" | "sidx" => Ok(OffsetKind::SegmentIndex),
            "word" => Ok(OffsetKind::Word),
            "none" => Ok(OffsetKind::None),
            _ => Err(format!("unknown offset kind '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_position_within_span() {
        let text = chars("xx ab  cd e");
        let span = EffectTagIndices::closed(2, 11, 0);
        let at = |i| CharacterPosition::within(&text, &span, i);

        assert_eq!(at(3).segment_index, 1);
        assert_eq!(at(3).word, 0);
        assert_eq!(at(5).word, 0);
        assert_eq!(at(7).word, 1);
        assert_eq!(at(10).word, 2);
        assert_eq!(at(10).index, 10);
    }

    #[test]
    fn test_offsets() {
        let position = CharacterPosition {
            index: 7,
            segment_index: 3,
            word: 1,
        };
        assert_eq!(OffsetKind::Index.offset(&position, 1.0), -7.0);
        assert_eq!(OffsetKind::SegmentIndex.offset(&position, 0.5), -1.5);
        assert_eq!(OffsetKind::Word.offset(&position, 2.0), -2.0);
        assert_eq!(OffsetKind::None.offset(&position, 2.0), 0.0);
        assert_eq!(OffsetKind::Index.offset(&position, 0.0), 0.0);
    }

    #[test]
    fn test_parse() {
        assert_eq!("segment-index".parse(), Ok(OffsetKind::SegmentIndex));
        assert_eq!("IDX".parse(), Ok(OffsetKind::Index));
        assert_eq!("word".parse(), Ok(OffsetKind::Word));
        assert!("sideways".parse::<OffsetKind>().is_err());
    }
}
