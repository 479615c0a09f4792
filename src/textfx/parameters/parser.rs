//! Parameter text parser
//!
//!     Repeatedly strips a leading `key[=value]` item:
//!     - The key runs until `=`, whitespace, `>` or the end of the text.
//!     - After `=`, a value starting with `"` runs until the next `"` or `>`; the quotes
//!       are dropped. Any other value runs until whitespace or `>`, with `\` escaping the
//!       next character.
//!     - The first item, when it has no `=`, is the bare value and is stored under `""`.
//!       Later items without `=` are stored as keys with an empty value.
//!     - Duplicate keys are parsed (to keep the cursor right) but dropped.

use super::map::ParameterMap;
use super::tokens::{tokenize, ParamToken};

/// Parse the parameter text of a tag. Never fails; empty text gives an empty map.
pub fn parse_parameters(text: &str) -> ParameterMap {
    let tokens = tokenize(text);
    let mut map = ParameterMap::new();
    let mut i = 0;
    let mut first = true;

    loop {
        // Skip separators
        while i < tokens.len() && tokens[i].0 == ParamToken::Whitespace {
            i += 1;
        }
        if i >= tokens.len() || tokens[i].0 == ParamToken::Close {
            break;
        }

        let mut key = String::new();
        while i < tokens.len() {
            match tokens[i] {
                (ParamToken::Whitespace | ParamToken::Equals | ParamToken::Close, _) => break,
                (ParamToken::Escape, slice) => key.push_str(&slice[1..]),
                (_, slice) => key.push_str(slice),
            }
            i += 1;
        }

        if i < tokens.len() && tokens[i].0 == ParamToken::Equals {
            i += 1;
            let (value, next) = read_value(&tokens, i);
            i = next;
            map.insert_first(key, value);
        } else if first {
            map.insert_first(String::new(), key);
        } else {
            map.insert_first(key, String::new());
        }
        first = false;
    }

    map
}

/// Read a value starting at token `i`. Returns the value and the index after it.
fn read_value(tokens: &[(ParamToken, &str)], mut i: usize) -> (String, usize) {
    let mut value = String::new();

    if i < tokens.len() && tokens[i].0 == ParamToken::Quote {
        i += 1;
        while i < tokens.len() {
            match tokens[i] {
                (ParamToken::Quote, _) => {
                    i += 1;
                    break;
                }
                (ParamToken::Close, _) => break,
                (ParamToken::Escape, slice) if slice.ends_with('"') => {
                    // The quote still terminates; keep the backslash.
                    value.push('\\');
                    i += 1;
                    break;
                }
                (_, slice) => value.push_str(slice),
            }
            i += 1;
        }
        return (value, i);
    }

    while i < tokens.len() {
        match tokens[i] {
            (ParamToken::Whitespace | ParamToken::Close, _) => break,
            (ParamToken::Escape, slice) => value.push_str(&slice[1..]),
            (_, slice) => value.push_str(slice),
        }
        i += 1;
    }
    (value, i)
}
