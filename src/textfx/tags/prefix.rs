//! Tag families and open/close kinds

use serde::{Deserialize, Serialize};
use std::fmt;

/// The family marker that may follow the opening bracket of a tag.
///
/// Tags without a prefix are animations. The prefix set is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagPrefix {
    /// No prefix: animations applied for as long as the text is shown.
    None,
    /// `+`: animations played while a character is revealed.
    Show,
    /// `-`: animations played while a character is hidden.
    Hide,
    /// `!`: commands run by the writer when it reaches the tag.
    Command,
    /// `?`: events emitted by the writer when it reaches the tag.
    Event,
}

impl TagPrefix {
    pub const ALL: [TagPrefix; 5] = [
        TagPrefix::None,
        TagPrefix::Show,
        TagPrefix::Hide,
        TagPrefix::Command,
        TagPrefix::Event,
    ];

    /// Map a character to a prefix. The absence of a prefix is not a character,
    /// so `TagPrefix::None` is never returned.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(TagPrefix::Show),
            '-' => Some(TagPrefix::Hide),
            '!' => Some(TagPrefix::Command),
            '?' => Some(TagPrefix::Event),
            _ => None,
        }
    }

    pub fn as_char(self) -> Option<char> {
        match self {
            TagPrefix::None => None,
            TagPrefix::Show => Some('+'),
            TagPrefix::Hide => Some('-'),
            TagPrefix::Command => Some('!'),
            TagPrefix::Event => Some('?'),
        }
    }

    /// The name of the family in configuration files.
    pub fn family_name(self) -> &'static str {
        match self {
            TagPrefix::None => "animations",
            TagPrefix::Show => "show",
            TagPrefix::Hide => "hide",
            TagPrefix::Command => "commands",
            TagPrefix::Event => "events",
        }
    }

    pub fn from_family_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|prefix| prefix.family_name() == name)
    }
}

impl fmt::Display for TagPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_char() {
            Some(ch) => write!(f, "{}", ch),
            None => Ok(()),
        }
    }
}

/// Whether a tag opens or closes a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagKind {
    Open,
    Close,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_chars_round_trip() {
        for prefix in TagPrefix::ALL {
            match prefix.as_char() {
                Some(ch) => assert_eq!(TagPrefix::from_char(ch), Some(prefix)),
                None => assert_eq!(prefix, TagPrefix::None),
            }
        }
    }

    #[test]
    fn test_unknown_prefix_char() {
        assert_eq!(TagPrefix::from_char('w'), None);
        assert_eq!(TagPrefix::from_char('/'), None);
    }

    #[test]
    fn test_family_names() {
        assert_eq!(TagPrefix::from_family_name("commands"), Some(TagPrefix::Command));
        assert_eq!(TagPrefix::from_family_name("animations"), Some(TagPrefix::None));
        assert_eq!(TagPrefix::from_family_name("widgets"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(TagPrefix::Event.to_string(), "?");
        assert_eq!(TagPrefix::None.to_string(), "");
    }
}
