//! Tag processing
//!
//!     [processor] turns accepted open/close tags of one family into finalized spans.
//!     [preprocessor] drives the scanner over a whole document, hands every candidate to
//!     the processor of its family, strips accepted tags and passes everything else through.
//!     [styles] provides the optional style lookup used for `<style>` macro expansion.

pub mod preprocessor;
pub mod processor;
pub mod styles;

pub use preprocessor::{DocumentPreprocessor, PreprocessOptions, ProcessedDocument, TagSpan};
pub use processor::TagProcessor;
pub use styles::{Style, StyleLookup, StyleSheet};
