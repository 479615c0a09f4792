//! Span reconciliation
//!
//!     After preprocessing, the host renderer lays out the display text and may add or drop
//!     characters of its own (whitespace normalization, layout markers). It reports the result
//!     as an index map: one `(rendered, original)` pair per rendered character, where
//!     `original` is the index in the display text the character came from.
//!
//!     The map is monotonic. A repeated original index is an insertion: the repeats are new
//!     characters following that original character. A jump is a deletion of the original
//!     characters skipped over. Characters after the last mapped one, up to the original
//!     length, are a trailing deletion.
//!
//!     Reconciliation walks the map once and shifts every span boundary, without looking at
//!     the text again:
//!
//!         insertion of k characters at insertion point p (after original p - 1):
//!             boundary >= p            -> +k
//!         deletion of original [g, q):
//!             boundary >= q            -> -(q - g)
//!             g <= boundary < q        -> g
//!
//!     Starts and ends move independently, so an insertion right at a span's end grows the
//!     span while a span starting there is pushed right. Empty-tag spans keep
//!     `end = start + 1`.
//!
//!     A map that moves backwards, skips rendered positions, or points past the original
//!     text breaks the host contract. The pass then fails with a [ReconcileError] and no
//!     span is touched: clamping would silently corrupt unrelated spans.

use crate::textfx::error::ReconcileError;
use crate::textfx::tags::{EffectTagIndices, EndKind};

/// Summary of a successful pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Number of rendered characters, i.e. the new document length.
    pub rendered_len: usize,
    /// Characters inserted by the host.
    pub inserted: usize,
    /// Original characters dropped by the host.
    pub deleted: usize,
    /// Spans adjusted.
    pub spans: usize,
}

impl ReconcileReport {
    pub fn is_identity(&self) -> bool {
        self.inserted == 0 && self.deleted == 0
    }
}

#[derive(Debug, Clone, Copy)]
struct Boundaries {
    start: usize,
    end: usize,
    shift_start: isize,
    shift_end: isize,
}

impl Boundaries {
    fn insert(&mut self, point: usize, count: usize) {
        if self.start >= point {
            self.shift_start += count as isize;
        }
        if self.end >= point {
            self.shift_end += count as isize;
        }
    }

    fn delete(&mut self, from: usize, to: usize) {
        self.shift_start -= deleted_before(self.start, from, to) as isize;
        self.shift_end -= deleted_before(self.end, from, to) as isize;
    }
}

/// Number of characters of the deleted range `[from, to)` that lie before `boundary`.
fn deleted_before(boundary: usize, from: usize, to: usize) -> usize {
    boundary.clamp(from, to) - from
}

fn shifted(index: usize, shift: isize) -> usize {
    (index as isize + shift).max(0) as usize
}

/// Reconcile `spans` against the host's index map for a display text of `original_len`
/// characters. Updates the spans in place on success.
pub fn reconcile<'s, S, M>(
    spans: S,
    index_map: M,
    original_len: usize,
) -> Result<ReconcileReport, ReconcileError>
where
    S: IntoIterator<Item = &'s mut EffectTagIndices>,
    M: IntoIterator<Item = (usize, usize)>,
{
    let mut spans: Vec<&mut EffectTagIndices> = spans.into_iter().collect();
    let mut scratch: Vec<Boundaries> = spans
        .iter()
        .map(|span| Boundaries {
            start: span.start,
            end: span.end,
            shift_start: 0,
            shift_end: 0,
        })
        .collect();

    let mut report = ReconcileReport {
        spans: spans.len(),
        ..ReconcileReport::default()
    };
    let mut last: Option<usize> = None;
    let mut run = 0;

    for (rendered, original) in index_map {
        if rendered != report.rendered_len {
            return Err(fail(ReconcileError::RenderedPositionSkipped {
                expected: report.rendered_len,
                found: rendered,
            }));
        }
        report.rendered_len += 1;
        if original >= original_len {
            return Err(fail(ReconcileError::OriginalOutOfRange {
                original,
                len: original_len,
            }));
        }

        match last {
            Some(previous) if original == previous => {
                run += 1;
                continue;
            }
            Some(previous) if original < previous => {
                return Err(fail(ReconcileError::IndexRegressed {
                    rendered,
                    previous,
                    found: original,
                }));
            }
            _ => {}
        }

        let gap_start = flush_run(&mut scratch, last, &mut run, &mut report);
        if original > gap_start {
            for boundaries in &mut scratch {
                boundaries.delete(gap_start, original);
            }
            report.deleted += original - gap_start;
        }
        last = Some(original);
    }

    let gap_start = flush_run(&mut scratch, last, &mut run, &mut report);
    if original_len > gap_start {
        for boundaries in &mut scratch {
            boundaries.delete(gap_start, original_len);
        }
        report.deleted += original_len - gap_start;
    }

    for (span, boundaries) in spans.iter_mut().zip(&scratch) {
        span.start = shifted(boundaries.start, boundaries.shift_start);
        span.end = match span.end_kind {
            EndKind::Single => span.start + 1,
            EndKind::Closed | EndKind::Open => {
                shifted(boundaries.end, boundaries.shift_end).max(span.start)
            }
        };
    }

    tracing::debug!(
        target: "textfx::reconcile",
        inserted = report.inserted,
        deleted = report.deleted,
        rendered_len = report.rendered_len,
        spans = report.spans,
        "reconciled spans"
    );
    Ok(report)
}

/// Apply a pending insertion run after `last`. Returns the first original index not yet
/// accounted for.
fn flush_run(
    scratch: &mut [Boundaries],
    last: Option<usize>,
    run: &mut usize,
    report: &mut ReconcileReport,
) -> usize {
    let next = last.map_or(0, |index| index + 1);
    if *run > 0 {
        for boundaries in scratch.iter_mut() {
            boundaries.insert(next, *run);
        }
        report.inserted += *run;
        *run = 0;
    }
    next
}

fn fail(error: ReconcileError) -> ReconcileError {
    tracing::warn!(target: "textfx::reconcile", %error, "reconciliation aborted");
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(originals: &[usize]) -> Vec<(usize, usize)> {
        originals.iter().copied().enumerate().collect()
    }

    fn run(spans: &mut [EffectTagIndices], originals: &[usize], len: usize) -> ReconcileReport {
        reconcile(spans.iter_mut(), map(originals), len).unwrap()
    }

    #[test]
    fn test_identity() {
        let mut spans = [EffectTagIndices::closed(2, 5, 0)];
        let report = run(&mut spans, &[0, 1, 2, 3, 4, 5, 6], 7);
        assert!(report.is_identity());
        assert_eq!(report.rendered_len, 7);
        assert_eq!((spans[0].start, spans[0].end), (2, 5));
    }

    #[test]
    fn test_deletion_before_span() {
        let mut spans = [EffectTagIndices::closed(2, 5, 0)];
        let report = run(&mut spans, &[2, 3, 4, 5, 6], 7);
        assert_eq!(report.deleted, 2);
        assert_eq!((spans[0].start, spans[0].end), (0, 3));
    }

    #[test]
    fn test_insertion_before_span() {
        let mut spans = [EffectTagIndices::closed(2, 5, 0)];
        let report = run(&mut spans, &[0, 1, 1, 1, 1, 2, 3, 4, 5, 6], 7);
        assert_eq!(report.inserted, 3);
        assert_eq!((spans[0].start, spans[0].end), (5, 8));
    }

    #[test]
    fn test_insertion_inside_span() {
        let mut spans = [EffectTagIndices::closed(1, 4, 0)];
        run(&mut spans, &[0, 1, 2, 2, 3, 4], 5);
        assert_eq!((spans[0].start, spans[0].end), (1, 5));
    }

    #[test]
    fn test_insertion_after_span() {
        let mut spans = [EffectTagIndices::closed(0, 2, 0)];
        run(&mut spans, &[0, 1, 2, 3, 3, 3], 4);
        assert_eq!((spans[0].start, spans[0].end), (0, 2));
    }

    #[test]
    fn test_insertion_at_span_end_grows_span() {
        let mut spans = [
            EffectTagIndices::closed(0, 2, 0),
            EffectTagIndices::closed(2, 4, 0),
        ];
        run(&mut spans, &[0, 1, 1, 2, 3], 4);
        assert_eq!((spans[0].start, spans[0].end), (0, 3));
        assert_eq!((spans[1].start, spans[1].end), (3, 5));
    }

    #[test]
    fn test_deletion_inside_span() {
        let mut spans = [EffectTagIndices::closed(1, 6, 0)];
        run(&mut spans, &[0, 1, 4, 5, 6, 7], 8);
        assert_eq!((spans[0].start, spans[0].end), (1, 4));
    }

    #[test]
    fn test_deletion_covering_span_start() {
        let mut spans = [EffectTagIndices::closed(2, 6, 0)];
        run(&mut spans, &[0, 4, 5, 6, 7], 8);
        assert_eq!((spans[0].start, spans[0].end), (1, 3));
    }

    #[test]
    fn test_trailing_deletion() {
        let mut spans = [EffectTagIndices::open_ended(1, 6, 0)];
        let report = run(&mut spans, &[0, 1, 2, 3], 6);
        assert_eq!(report.deleted, 2);
        assert_eq!((spans[0].start, spans[0].end), (1, 4));
    }

    #[test]
    fn test_single_spans_keep_width() {
        let mut spans = [EffectTagIndices::single(2, 0)];
        run(&mut spans, &[0, 1, 2, 2, 2, 3], 4);
        assert_eq!((spans[0].start, spans[0].end), (2, 3));

        let mut spans = [EffectTagIndices::single(3, 0)];
        run(&mut spans, &[0, 1, 1, 2, 3], 4);
        assert_eq!((spans[0].start, spans[0].end), (4, 5));
    }

    #[test]
    fn test_everything_deleted() {
        let mut spans = [EffectTagIndices::closed(1, 3, 0)];
        let report = run(&mut spans, &[], 4);
        assert_eq!(report.rendered_len, 0);
        assert_eq!((spans[0].start, spans[0].end), (0, 0));
    }

    #[test]
    fn test_regression_is_an_error_and_leaves_spans() {
        let mut spans = [EffectTagIndices::closed(2, 5, 0)];
        let result = reconcile(spans.iter_mut(), map(&[0, 2, 1, 3]), 7);
        assert_eq!(
            result,
            Err(ReconcileError::IndexRegressed {
                rendered: 2,
                previous: 2,
                found: 1
            })
        );
        assert_eq!((spans[0].start, spans[0].end), (2, 5));
    }

    #[test]
    fn test_skipped_rendered_position() {
        let mut spans: [EffectTagIndices; 0] = [];
        let result = reconcile(spans.iter_mut(), vec![(0, 0), (2, 1)], 3);
        assert_eq!(
            result,
            Err(ReconcileError::RenderedPositionSkipped {
                expected: 1,
                found: 2
            })
        );
    }

    #[test]
    fn test_out_of_range() {
        let mut spans: [EffectTagIndices; 0] = [];
        let result = reconcile(spans.iter_mut(), map(&[0, 5]), 3);
        assert_eq!(
            result,
            Err(ReconcileError::OriginalOutOfRange { original: 5, len: 3 })
        );
    }
}
