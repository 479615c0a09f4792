//! Testing utilities
//!
//!     Helpers shared by unit and integration tests:
//!
//!     - [Samples]: the curated documents in `samples/`. Prefer these over ad-hoc strings
//!       when a test is about whole documents, so that a syntax change is fixed in one place.
//!     - [assert_spans]: fluent assertions over a
//!       [ProcessedDocument](crate::textfx::processing::ProcessedDocument).
//!     - [render_spans]: a stable one-line-per-span listing, for snapshot tests.
//!     - Index map builders that play the host renderer in reconciliation tests.
//!     - [test_registry]: a small registry covering every family and tag type.
//!
//!     ```rust,ignore
//!     use textfx::textfx::testing::{assert_spans, Samples};
//!
//!     let document = Samples::preprocess("nested-waves");
//!     assert_spans(&document)
//!         .text("abc")
//!         .count(2)
//!         .span(0, |span| span.name("wave").range(0, 3))
//!         .span(1, |span| span.name("wave").range(1, 2));
//!     ```

mod index_maps;
mod samples;
mod span_assertions;

pub use index_maps::{identity_map, map_with_deletion, map_with_insertion};
pub use samples::Samples;
pub use span_assertions::{assert_spans, render_spans, SpanAssertion, SpansAssertion};

use crate::textfx::parameters::ParamKind;
use crate::textfx::registry::{StaticRegistry, TagSpec};
use crate::textfx::tags::TagPrefix;

/// Registry used throughout the tests.
///
///     animations  wave (container, amp: float), pulse (container), mark (either)
///     show        fade (container)
///     hide        fade (container)
///     commands    delay, wait (empty, required float value), pause (empty)
///     events      any name
pub fn test_registry() -> StaticRegistry {
    StaticRegistry::new()
        .with_tag(
            TagPrefix::None,
            "wave",
            TagSpec::container().param("amp", ParamKind::Float),
        )
        .with_tag(TagPrefix::None, "pulse", TagSpec::container())
        .with_tag(TagPrefix::None, "mark", TagSpec::either())
        .with_tag(TagPrefix::Show, "fade", TagSpec::container())
        .with_tag(TagPrefix::Hide, "fade", TagSpec::container())
        .with_tag(
            TagPrefix::Command,
            "delay",
            TagSpec::empty().param("", ParamKind::Float).require(""),
        )
        .with_tag(
            TagPrefix::Command,
            "wait",
            TagSpec::empty().param("", ParamKind::Float).require(""),
        )
        .with_tag(TagPrefix::Command, "pause", TagSpec::empty())
        .with_open_family(TagPrefix::Event)
}
