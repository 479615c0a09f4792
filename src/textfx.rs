//! Effect tag processing for animated text.
//!
//!     Source text carries HTML-like inline tags (`<wave amp=2>hello</wave>`). The
//!     preprocessor strips the tags it recognizes, leaving plain display text plus a list of
//!     finalized spans (a tag plus the character range it covers). The host renderer lays out
//!     the display text and may insert or remove characters while doing so; the reconciler
//!     shifts every span to match, given the renderer's index map. Cached tags are then
//!     queried per character while the text animates or is revealed.
//!
//! Data Flow
//!
//!     raw text
//!       -> scanner / parameters / processor (driven by the preprocessor)
//!       -> display text + spans
//!       -> [host layout]
//!       -> reconcile (host index map)
//!       -> tag caches
//!       -> per-character queries (writer, wave evaluation)
//!
//!     Everything is single threaded and synchronous. A pass is never interrupted; callers
//!     wanting to abandon work drop the results and run again.

pub mod cache;
pub mod config;
pub mod error;
pub mod parameters;
pub mod pipeline;
pub mod processing;
pub mod reconcile;
pub mod registry;
pub mod tags;
pub mod testing;
pub mod wave;
pub mod writer;

pub use error::{Error, Result};
