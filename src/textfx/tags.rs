//! Tags
//!
//!     A tag is `<` + optional `/` + optional family prefix + name + parameter text + `>`.
//!     The prefix selects the tag family (see [TagPrefix]); each family is processed
//!     independently with its own stack of open tags.
//!
//!     Examples:
//!         <wave amp=2>        animation, open
//!         </wave>             animation, close
//!         <+fade>             show animation
//!         <!delay=0.1>        command
//!         <?ping/>            event, self-closing
//!
//!     The [scanner] finds well-formed candidates without deciding whether they are known.
//!     Acceptance is up to the [processor](crate::textfx::processing::processor), which turns
//!     accepted open/close pairs into an [EffectTag] plus [EffectTagIndices].

pub mod effect_tag;
pub mod prefix;
pub mod scanner;

pub use effect_tag::{EffectTag, EffectTagIndices, EndKind, TagType};
pub use prefix::{TagKind, TagPrefix};
pub use scanner::{find_next_tag, RawTag};
