//! Index maps as a host renderer would report them

/// Nothing inserted or deleted.
pub fn identity_map(len: usize) -> Vec<(usize, usize)> {
    (0..len).map(|i| (i, i)).collect()
}

/// `count` characters inserted right after original character `after`.
pub fn map_with_insertion(len: usize, after: usize, count: usize) -> Vec<(usize, usize)> {
    let originals = (0..len).flat_map(|i| {
        let repeats = if i == after { 1 + count } else { 1 };
        std::iter::repeat(i).take(repeats)
    });
    originals.enumerate().collect()
}

/// Original characters in `deleted` dropped.
pub fn map_with_deletion(len: usize, deleted: std::ops::Range<usize>) -> Vec<(usize, usize)> {
    (0..len)
        .filter(|i| !deleted.contains(i))
        .enumerate()
        .collect()
}
