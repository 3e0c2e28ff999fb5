//! Match navigation.
//!
//! Pure functions over the current match index. `None` stands for "no active
//! match" and is the only valid value when there are no matches.

/// Navigate to the next match, wrapping from last to first.
///
/// No-op when `len == 0`. From `None` the first match is selected.
pub fn next_index(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match current {
        Some(index) => Some((index + 1) % len),
        None => Some(0),
    }
}

/// Navigate to the previous match, wrapping from first to last.
///
/// No-op when `len == 0`. From `None` the last match is selected.
pub fn prev_index(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match current {
        Some(index) => Some((index % len + len - 1) % len),
        None => Some(len - 1),
    }
}

/// Re-validate the current index after the match set was recomputed.
///
/// - No matches: `None`
/// - Query just became non-empty, or there was no active match: first match
/// - Otherwise the index is kept, clamped to the last match
pub fn reconcile_index(
    previous: Option<usize>,
    len: usize,
    query_became_active: bool,
) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match previous {
        _ if query_became_active => Some(0),
        Some(index) => Some(index.min(len - 1)),
        None => Some(0),
    }
}

/// Signed view of the current index: `-1` for no active match.
pub fn as_signed(current: Option<usize>) -> isize {
    current.map_or(-1, |index| index as isize)
}

#[cfg(test)]
#[path = "navigation_tests.rs"]
mod tests;
