//! Property-based tests for span reconciliation
//!
//! The walk over the index map must agree with a direct counting definition: after
//! reconciliation, a boundary `b` sits at the number of rendered characters whose original
//! index is below `b`. Empty-tag spans keep `end = start + 1`.

use proptest::prelude::*;
use textfx::textfx::reconcile::reconcile;
use textfx::textfx::tags::{EffectTagIndices, EndKind};
use textfx::textfx::testing::{identity_map, map_with_deletion, map_with_insertion};

/// How often each original character appears in the rendered text: 0 deletes it, more
/// than 1 inserts characters after it.
fn repeats_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(prop_oneof![3 => Just(1usize), 1 => Just(0usize), 1 => 2usize..4], 0..24)
}

fn index_map(repeats: &[usize]) -> Vec<(usize, usize)> {
    repeats
        .iter()
        .enumerate()
        .flat_map(|(original, &count)| std::iter::repeat(original).take(count))
        .enumerate()
        .collect()
}

fn span_strategy(len: usize) -> impl Strategy<Value = EffectTagIndices> {
    prop_oneof![
        (0..=len, 0..=len).prop_map(|(a, b)| EffectTagIndices::closed(a.min(b), a.max(b), 0)),
        (0..=len).prop_map(|start| EffectTagIndices::single(start, 0)),
        (0..=len).prop_map(move |start| EffectTagIndices::open_ended(start, len, 0)),
    ]
}

fn case_strategy() -> impl Strategy<Value = (Vec<usize>, Vec<EffectTagIndices>)> {
    repeats_strategy().prop_flat_map(|repeats| {
        let len = repeats.len();
        (
            Just(repeats),
            prop::collection::vec(span_strategy(len), 0..8),
        )
    })
}

fn counted(map: &[(usize, usize)], boundary: usize) -> usize {
    map.iter().filter(|(_, original)| *original < boundary).count()
}

#[cfg(test)]
mod proptest_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_matches_counting_definition((repeats, spans) in case_strategy()) {
            let map = index_map(&repeats);
            let mut reconciled = spans.clone();
            let report = reconcile(reconciled.iter_mut(), map.clone(), repeats.len()).unwrap();

            prop_assert_eq!(report.rendered_len, map.len());
            for (before, after) in spans.iter().zip(&reconciled) {
                let start = counted(&map, before.start);
                prop_assert_eq!(after.start, start);
                match before.end_kind {
                    EndKind::Single => prop_assert_eq!(after.end, start + 1),
                    _ => prop_assert_eq!(after.end, counted(&map, before.end)),
                }
                prop_assert!(after.start <= after.end);
            }
        }

        #[test]
        fn test_counts_inserted_and_deleted(repeats in repeats_strategy()) {
            let map = index_map(&repeats);
            let mut spans: Vec<EffectTagIndices> = Vec::new();
            let report = reconcile(spans.iter_mut(), map, repeats.len()).unwrap();

            let deleted = repeats.iter().filter(|&&count| count == 0).count();
            let inserted: usize = repeats.iter().map(|&count| count.saturating_sub(1)).sum();
            prop_assert_eq!(report.deleted, deleted);
            prop_assert_eq!(report.inserted, inserted);
            prop_assert_eq!(report.rendered_len, repeats.len() + inserted - deleted);
        }

        #[test]
        fn test_identity_map_changes_nothing(
            spans in (0usize..20).prop_flat_map(|len| {
                (Just(len), prop::collection::vec(span_strategy(len), 0..6))
            })
        ) {
            let (len, spans) = spans;
            let mut reconciled = spans.clone();
            let report = reconcile(reconciled.iter_mut(), identity_map(len), len).unwrap();
            prop_assert!(report.is_identity());
            prop_assert_eq!(reconciled, spans);
        }
    }
}

#[test]
fn test_insertion_builder_shifts_following_spans() {
    let mut spans = vec![
        EffectTagIndices::closed(0, 2, 0),
        EffectTagIndices::closed(3, 5, 0),
    ];
    // Two characters after original index 2
    reconcile(spans.iter_mut(), map_with_insertion(6, 2, 2), 6).unwrap();
    assert_eq!((spans[0].start, spans[0].end), (0, 2));
    assert_eq!((spans[1].start, spans[1].end), (5, 7));
}

#[test]
fn test_deletion_builder_clamps_into_gap() {
    let mut spans = vec![EffectTagIndices::closed(2, 6, 0)];
    reconcile(spans.iter_mut(), map_with_deletion(8, 1..4), 8).unwrap();
    assert_eq!((spans[0].start, spans[0].end), (1, 3));
}

#[test]
fn test_regressing_map_is_rejected() {
    let original = vec![EffectTagIndices::closed(1, 3, 0)];
    let mut spans = original.clone();
    let result = reconcile(spans.iter_mut(), vec![(0, 0), (1, 2), (2, 1)], 4);
    assert!(result.is_err());
    assert_eq!(spans, original);
}
