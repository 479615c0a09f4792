//! Tag scanner
//!
//!     Stateless search for the next well-formed tag in a character buffer. Scanning works on
//!     `&[char]` so that every index it reports is a character index, which is what spans
//!     and the host renderer count in.
//!
//! Well-formedness
//!
//!     A tag starts at `i` when `text[i] == '<'`, the first `'>'` after it is at `j > i + 1`
//!     and no other `'<'` occurs in between. A `'/'` right after the bracket makes it a
//!     close tag. A trailing `'/'` before the `'>'` makes an open tag self-closing.
//!
//!     The name starts after the bracket, the slash and an optional prefix character, and
//!     ends at the first whitespace or `'='`. An empty name is not a tag. Whatever follows
//!     the name is the parameter text, verbatim.
//!
//!     Malformed candidates are skipped one character at a time, so a lone `<` is simply
//!     text.

use super::prefix::{TagKind, TagPrefix};

/// A well-formed tag candidate, before anyone decided whether it is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTag {
    pub kind: TagKind,
    pub prefix: TagPrefix,
    pub name: String,
    /// Everything after the name, unparsed.
    pub parameter_text: String,
    /// `<name/>` form. Always false for close tags.
    pub self_closing: bool,
    /// Index of the `<` in the scanned buffer.
    pub start: usize,
    /// Index one past the `>` in the scanned buffer.
    pub end: usize,
}

impl RawTag {
    pub fn is_open(&self) -> bool {
        self.kind == TagKind::Open
    }

    pub fn is_close(&self) -> bool {
        self.kind == TagKind::Close
    }

    /// Length of the tag text in characters, brackets included.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this is `<name>`/`</name>` without a prefix, compared ignoring ASCII case.
    pub fn is_plain(&self, name: &str) -> bool {
        self.prefix == TagPrefix::None && self.name.eq_ignore_ascii_case(name)
    }
}

/// Find the first well-formed tag at or after `from`.
pub fn find_next_tag(text: &[char], from: usize) -> Option<RawTag> {
    let mut i = from;
    while i < text.len() {
        let offset = text[i..].iter().position(|&ch| ch == '<')?;
        i += offset;
        if let Some(tag) = parse_tag_at(text, i) {
            return Some(tag);
        }
        i += 1;
    }
    None
}

/// Try to read a tag whose `<` is at `start`.
pub fn parse_tag_at(text: &[char], start: usize) -> Option<RawTag> {
    if text.get(start) != Some(&'<') {
        return None;
    }

    let mut close = start + 1;
    loop {
        match text.get(close) {
            None | Some('<') => return None,
            Some('>') => break,
            Some(_) => close += 1,
        }
    }
    if close <= start + 1 {
        return None;
    }

    let mut body = &text[start + 1..close];
    let kind = if body.first() == Some(&'/') {
        body = &body[1..];
        TagKind::Close
    } else {
        TagKind::Open
    };

    let self_closing = kind == TagKind::Open && body.last() == Some(&'/');
    if self_closing {
        body = &body[..body.len() - 1];
    }

    let prefix = match body.first().and_then(|&ch| TagPrefix::from_char(ch)) {
        Some(prefix) => {
            body = &body[1..];
            prefix
        }
        None => TagPrefix::None,
    };

    let name_len = body
        .iter()
        .position(|&ch| ch.is_whitespace() || ch == '=')
        .unwrap_or(body.len());
    if name_len == 0 {
        return None;
    }

    Some(RawTag {
        kind,
        prefix,
        name: body[..name_len].iter().collect(),
        parameter_text: body[name_len..].iter().collect(),
        self_closing,
        start,
        end: close + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    fn scan(text: &str) -> Option<RawTag> {
        find_next_tag(&chars(text), 0)
    }

    #[test]
    fn test_simple_open_tag() {
        let tag = scan("ab<wave>cd").unwrap();
        assert_eq!(tag.kind, TagKind::Open);
        assert_eq!(tag.prefix, TagPrefix::None);
        assert_eq!(tag.name, "wave");
        assert_eq!(tag.parameter_text, "");
        assert_eq!((tag.start, tag.end), (2, 8));
    }

    #[test]
    fn test_close_tag_with_prefix() {
        let tag = scan("</+fade>").unwrap();
        assert_eq!(tag.kind, TagKind::Close);
        assert_eq!(tag.prefix, TagPrefix::Show);
        assert_eq!(tag.name, "fade");
    }

    #[test]
    fn test_parameter_text_is_verbatim() {
        let tag = scan("<wave amp=2 up=\"1.5\">").unwrap();
        assert_eq!(tag.name, "wave");
        assert_eq!(tag.parameter_text, " amp=2 up=\"1.5\"");

        let tag = scan("<!delay=0.1>").unwrap();
        assert_eq!(tag.prefix, TagPrefix::Command);
        assert_eq!(tag.name, "delay");
        assert_eq!(tag.parameter_text, "=0.1");
    }

    #[test]
    fn test_self_closing() {
        let tag = scan("<?ping/>").unwrap();
        assert!(tag.self_closing);
        assert_eq!(tag.prefix, TagPrefix::Event);
        assert_eq!(tag.name, "ping");

        let tag = scan("<?ping id=3 />").unwrap();
        assert!(tag.self_closing);
        assert_eq!(tag.parameter_text, " id=3 ");
    }

    #[test]
    fn test_empty_name_is_skipped() {
        assert_eq!(scan("<>"), None);
        assert_eq!(scan("< wave>"), None);
        assert_eq!(scan("<=2>"), None);
        assert_eq!(scan("<!>"), None);
        assert_eq!(scan("</>"), None);
    }

    #[test]
    fn test_nested_bracket_restarts_scan() {
        let tag = scan("<a <wave>").unwrap();
        assert_eq!(tag.name, "wave");
        assert_eq!(tag.start, 3);
    }

    #[test]
    fn test_unterminated_is_not_a_tag() {
        assert_eq!(scan("text <wave"), None);
        assert_eq!(scan("<"), None);
        assert_eq!(scan("a < b"), None);
    }

    #[test]
    fn test_scan_from_offset() {
        let text = chars("<a>x<b>");
        let first = find_next_tag(&text, 0).unwrap();
        let second = find_next_tag(&text, first.end).unwrap();
        assert_eq!(second.name, "b");
        assert_eq!(second.start, 4);
        assert_eq!(find_next_tag(&text, second.end), None);
    }

    #[test]
    fn test_indices_count_characters() {
        let tag = scan("héllo<wave>").unwrap();
        assert_eq!(tag.start, 5);
        assert_eq!(tag.len(), 6);
    }

    #[test]
    fn test_is_plain() {
        assert!(scan("<NoParse>").unwrap().is_plain("noparse"));
        assert!(!scan("<!noparse>").unwrap().is_plain("noparse"));
    }
}
