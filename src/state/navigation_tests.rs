//! Tests for match navigation.

use super::*;
use proptest::prelude::*;

// ===== next_index Tests =====

#[test]
fn next_increments_current_match() {
    assert_eq!(next_index(Some(0), 3), Some(1));
}

#[test]
fn next_wraps_from_last_to_first() {
    assert_eq!(next_index(Some(2), 3), Some(0));
}

#[test]
fn next_with_no_matches_is_noop() {
    assert_eq!(next_index(None, 0), None);
}

#[test]
fn next_from_no_active_match_selects_first() {
    assert_eq!(next_index(None, 4), Some(0));
}

// ===== prev_index Tests =====

#[test]
fn prev_decrements_current_match() {
    assert_eq!(prev_index(Some(2), 3), Some(1));
}

#[test]
fn prev_wraps_from_first_to_last() {
    assert_eq!(prev_index(Some(0), 3), Some(2));
}

#[test]
fn prev_with_no_matches_is_noop() {
    assert_eq!(prev_index(None, 0), None);
}

#[test]
fn single_match_stays_selected() {
    assert_eq!(next_index(Some(0), 1), Some(0));
    assert_eq!(prev_index(Some(0), 1), Some(0));
}

// ===== reconcile_index Tests =====

#[test]
fn reconcile_initializes_to_first_when_query_becomes_active() {
    assert_eq!(reconcile_index(None, 2, true), Some(0));
    assert_eq!(reconcile_index(Some(1), 2, true), Some(0));
}

#[test]
fn reconcile_keeps_index_while_matches_grow() {
    assert_eq!(reconcile_index(Some(1), 5, false), Some(1));
}

#[test]
fn reconcile_clamps_when_matches_shrink() {
    assert_eq!(reconcile_index(Some(4), 2, false), Some(1));
}

#[test]
fn reconcile_clears_when_no_matches() {
    assert_eq!(reconcile_index(Some(1), 0, false), None);
    assert_eq!(reconcile_index(None, 0, true), None);
}

#[test]
fn signed_view_uses_minus_one_for_none() {
    assert_eq!(as_signed(None), -1);
    assert_eq!(as_signed(Some(3)), 3);
}

// ===== Properties =====

proptest! {
    #[test]
    fn n_nexts_return_to_start(len in 1usize..50, start in 0usize..50) {
        let start = start % len;
        let mut current = Some(start);
        for _ in 0..len {
            current = next_index(current, len);
        }
        prop_assert_eq!(current, Some(start));
    }

    #[test]
    fn prev_undoes_next(len in 1usize..50, start in 0usize..50) {
        let start = Some(start % len);
        prop_assert_eq!(prev_index(next_index(start, len), len), start);
    }

    #[test]
    fn index_always_in_range(len in 1usize..50, start in 0usize..50, forward: bool) {
        let start = Some(start % len);
        let moved = if forward { next_index(start, len) } else { prev_index(start, len) };
        prop_assert!(moved.is_some_and(|i| i < len));
    }
}
