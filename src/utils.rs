//! Utility functions.

/// Round to the nearest integer, with halves rounded towards positive infinity.
///
/// This differs from [`f64::round`] for negative halves: `-20.5` rounds to `-20`, not `-21`.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round to one decimal place, with halves rounded away from zero.
///
/// Used for displayed percentages, so `-0.25` becomes `-0.3` rather than `-0.2`.
pub fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Check that a slice contains unique elements, returning the first duplicate if not
pub fn find_duplicate<T: Eq + std::hash::Hash>(items: &[T]) -> Option<&T> {
    let mut seen = std::collections::HashSet::new();
    items.iter().find(|item| !seen.insert(*item))
}
