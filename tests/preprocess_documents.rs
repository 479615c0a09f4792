//! Integration tests for the document preprocessor over the sample documents
//!
//! Span listings are checked with inline snapshots; see `render_spans` for the format.

use rstest::rstest;
use textfx::textfx::processing::{DocumentPreprocessor, PreprocessOptions, Style, StyleSheet};
use textfx::textfx::tags::{EndKind, TagPrefix};
use textfx::textfx::testing::{assert_spans, render_spans, test_registry, Samples};

fn preprocess(source: &str) -> textfx::textfx::processing::ProcessedDocument {
    let registry = test_registry();
    DocumentPreprocessor::new(&registry).preprocess(source)
}

#[test]
fn test_plain_sample_is_untouched() {
    let document = Samples::preprocess("plain");
    assert_spans(&document)
        .text(Samples::source("plain"))
        .count(0);
}

#[test]
fn test_nested_waves() {
    let document = Samples::preprocess("nested-waves");
    insta::assert_snapshot!(render_spans(&document), @r"
    wave 0..3 #0 closed
    wave 1..2 #0 closed
    ");
}

#[test]
fn test_mixed_families() {
    let document = Samples::preprocess("mixed-families");
    assert_spans(&document)
        .text("Hello, world!")
        .count(4)
        .family_count(TagPrefix::None, 1)
        .family_count(TagPrefix::Show, 1)
        .family_count(TagPrefix::Command, 1)
        .family_count(TagPrefix::Event, 1)
        .span(0, |span| span.name("wave").range(7, 12).param("amp", "2"))
        .span(2, |span| {
            span.name("wait")
                .prefix(TagPrefix::Command)
                .range(12, 13)
                .end_kind(EndKind::Single)
                .param("", "0.5")
        });
    insta::assert_snapshot!(render_spans(&document), @r"
    wave 7..12 #0 closed amp=2
    +fade 0..5 #0 closed
    !wait 12..13 #0 single =0.5
    ?done 13..14 #0 single
    ");
}

#[test]
fn test_noparse_region() {
    let document = Samples::preprocess("noparse");
    assert_spans(&document)
        .text("Use <wave> to make text move.")
        .count(1)
        .span(0, |span| span.name("wave").range(24, 28));
}

#[test]
fn test_malformed_and_unknown_tags_pass_through() {
    let document = Samples::preprocess("malformed");
    assert_spans(&document)
        .text(Samples::source("malformed"))
        .count(0);
}

#[test]
fn test_unclosed_tags_run_to_the_end() {
    let document = Samples::preprocess("unclosed");
    insta::assert_snapshot!(render_spans(&document), @r"
    wave 0..12 #0 open
    +fade 0..12 #0 open
    ");
}

#[test]
fn test_either_tags() {
    let document = Samples::preprocess("either");
    assert_spans(&document)
        .text("x yz")
        .span(0, |span| span.range(0, 1).end_kind(EndKind::Closed))
        .span(1, |span| span.range(2, 3).end_kind(EndKind::Single))
        .span(2, |span| span.range(3, 4).end_kind(EndKind::Single));
}

#[rstest]
#[case::lone_bracket("a < b")]
#[case::empty_tag("<>")]
#[case::unknown_name("<shout>hey</shout>")]
#[case::wrong_family("<+wave>x")]
#[case::unmatched_close("x</wave>")]
#[case::close_of_empty_tag("</!wait>")]
#[case::close_of_event("</?ping>")]
#[case::failed_validation("<!wait>")]
#[case::self_closed_container("<wave/>x")]
#[case::unterminated("<wave")]
fn test_rejected_tags_stay_in_text(#[case] source: &str) {
    let document = preprocess(source);
    assert_eq!(document.text, source);
    assert!(document.spans.is_empty(), "{}", render_spans(&document));
}

#[rstest]
#[case("<wave>abc</wave>", "abc")]
#[case("a<!wait=1>b", "ab")]
#[case("<?ping>", " ")]
#[case("", " ")]
#[case("<wave>héllo wörld</wave>", "héllo wörld")]
fn test_display_text(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(preprocess(source).text, expected);
}

#[test]
fn test_same_index_ordering() {
    let document = preprocess("ab<?one><?two><!wait=1><?three>c");
    insta::assert_snapshot!(render_spans(&document), @r"
    !wait 2..3 #0 single =1
    ?one 2..3 #0 single
    ?two 2..3 #1 single
    ?three 2..3 #2 single
    ");
}

#[test]
fn test_styles_expand_into_tags() {
    let registry = test_registry();
    let styles = StyleSheet::new().with_style("title", Style::new("<wave amp=3>", "</wave>!"));
    let document = DocumentPreprocessor::new(&registry)
        .with_styles(&styles)
        .preprocess("<style=\"title\">Intro</style> text");
    assert_spans(&document)
        .text("Intro! text")
        .count(1)
        .span(0, |span| span.name("wave").range(0, 5).param("amp", "3"));
}

#[test]
fn test_custom_options() {
    let registry = test_registry();
    let options = PreprocessOptions {
        noparse_tag: "raw".to_string(),
        empty_output_placeholder: "_".to_string(),
        ..PreprocessOptions::default()
    };
    let mut preprocessor = DocumentPreprocessor::new(&registry).with_options(options);
    assert_eq!(preprocessor.preprocess("<raw><wave></raw>").text, "<wave>");
    assert_eq!(preprocessor.preprocess("<?ping>").text, "_");
}

#[test]
fn test_spans_serialize() {
    let document = Samples::preprocess("nested-waves");
    let json = serde_json::to_value(&document.spans[1]).unwrap();
    assert_eq!(json["tag"]["name"], "wave");
    assert_eq!(json["tag"]["prefix"], "none");
    assert_eq!(json["indices"]["start"], 1);
    assert_eq!(json["indices"]["end_kind"], "closed");
}
