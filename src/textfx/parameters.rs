//! Tag parameters
//!
//!     The parameter text of a tag is a whitespace separated list of `key[=value]` items.
//!
//!     Syntax
//!
//!         <key> "=" <value>
//!         <key> "=" '"' <quoted value> '"'
//!         <bare value>            (first item only)
//!         <key>                   (any later item)
//!
//!     Examples:
//!         <wave amp=2 up=0.5>         amp -> 2, up -> 0.5
//!         <speed=2>                   "" -> 2
//!         <speed 2>                   "" -> 2
//!         <say text="hello there">    text -> hello there
//!
//!     The unnamed leading value lives under the empty key. Keys are unique; the first
//!     occurrence wins. Tokenization is done by logos (see [tokens]), the item grammar by
//!     [parser].

pub mod map;
pub mod parser;
pub mod tokens;
pub mod typed;

pub use map::ParameterMap;
pub use parser::parse_parameters;
pub use typed::{parse_bool, ParamKind};
