//! Token definitions for parameter text
//!
//! The tokens are defined using the logos derive macro. A backslash escapes the character
//! after it; `<` never appears in parameter text handed over by the scanner and lexes as an
//! error, which the parser treats as plain text.
use logos::Logos;

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParamToken {
    #[regex(r"\s+")]
    Whitespace,

    #[token("=")]
    Equals,

    #[token("\"")]
    Quote,

    #[token(">")]
    Close,

    #[regex(r"\\.")]
    Escape,

    // Text content (catch-all for non-special characters)
    #[regex(r#"[^\s="<>\\]+"#)]
    Word,
}

/// Tokenize parameter text, keeping each token's slice. Unlexable input becomes `Word`.
pub fn tokenize(source: &str) -> Vec<(ParamToken, &str)> {
    let mut lexer = ParamToken::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let token = result.unwrap_or(ParamToken::Word);
        tokens.push((token, lexer.slice()));
    }

    tokens
}
