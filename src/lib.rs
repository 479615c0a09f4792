//! # textfx
//!
//! Inline effect tags for animated text.
//!
//! File Layout
//!
//!     Everything lives under [textfx](crate::textfx). The pipeline reads leaf-first:
//!
//!     src/textfx
//!       ├── tags          Tag scanner, prefixes, finalized tags and their indices
//!       ├── parameters    Parameter text tokenization and the ordered parameter map
//!       ├── registry      Which tag names exist, their types and validation
//!       ├── processing    Per-family tag processors and the document preprocessor
//!       ├── reconcile     Keeps spans valid after the host renderer edits the text
//!       ├── cache         Cached tags and per-index lookup
//!       ├── wave          Periodic waveform evaluation
//!       ├── writer        Tick-driven sequential reveal
//!       ├── pipeline      All of the above behind one document façade
//!       ├── config        Layered TOML configuration and the registry it describes
//!       ├── error         Error types
//!       └── testing       Fixtures, samples and span assertions
//!
//!     The `textfx` binary (src/bin/textfx.rs) inspects documents from the command line.
//!
//! For testing helpers and verified sample documents, see the [testing module](textfx::testing).

pub mod textfx;
