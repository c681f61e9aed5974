//! Recall metrics for approximate nearest-label search.
//!
//! With ties at the k-th score several identifier sets are equally correct,
//! so recall compares score lists rank by rank instead of intersecting ids.

/// Fraction of the exact top-k scores matched by an approximate result.
///
/// Both slices are ascending score lists. The i-th approximate score counts
/// as a hit when it is no worse than the i-th exact score. Returns a value in
/// `[0.0, 1.0]`, and 1.0 when `exact` is empty.
pub fn score_recall(exact: &[f64], approximate: &[f64]) -> f32 {
    if exact.is_empty() {
        return 1.0;
    }
    let hits = exact
        .iter()
        .zip(approximate.iter())
        .filter(|(e, a)| a <= e)
        .count();
    hits as f32 / exact.len() as f32
}

/// Mean [`score_recall`] across queries.
pub fn mean_score_recall(exact: &[Vec<f64>], approximate: &[Vec<f64>]) -> f32 {
    if exact.is_empty() {
        return 0.0;
    }
    let total: f32 = exact
        .iter()
        .zip(approximate.iter())
        .map(|(e, a)| score_recall(e, a))
        .sum();
    total / exact.len() as f32
}
