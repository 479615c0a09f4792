//! Sample documents
//!
//!     The files in `samples/` are numbered for ordering and looked up by the name after
//!     the number: `010-nested-waves.txt` is `"nested-waves"`.

use super::test_registry;
use crate::textfx::processing::{DocumentPreprocessor, ProcessedDocument};

const SAMPLES: &[(&str, &str)] = &[
    ("plain", include_str!("../../../samples/000-plain.txt")),
    ("nested-waves", include_str!("../../../samples/010-nested-waves.txt")),
    ("mixed-families", include_str!("../../../samples/020-mixed-families.txt")),
    ("noparse", include_str!("../../../samples/030-noparse.txt")),
    ("malformed", include_str!("../../../samples/040-malformed.txt")),
    ("unclosed", include_str!("../../../samples/050-unclosed.txt")),
    ("either", include_str!("../../../samples/060-either.txt")),
];

pub struct Samples;

impl Samples {
    pub fn names() -> impl Iterator<Item = &'static str> {
        SAMPLES.iter().map(|(name, _)| *name)
    }

    pub fn get(name: &str) -> Option<&'static str> {
        SAMPLES
            .iter()
            .find(|(sample, _)| *sample == name)
            .map(|(_, source)| *source)
    }

    /// Source of a sample. Panics on unknown names.
    pub fn source(name: &str) -> &'static str {
        match Self::get(name) {
            Some(source) => source,
            None => panic!(
                "unknown sample '{}', available: {}",
                name,
                Self::names().collect::<Vec<_>>().join(", ")
            ),
        }
    }

    /// A sample run through the preprocessor with [test_registry].
    pub fn preprocess(name: &str) -> ProcessedDocument {
        let registry = test_registry();
        DocumentPreprocessor::new(&registry).preprocess(Self::source(name))
    }
}
