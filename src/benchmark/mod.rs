//! Evaluation helpers for the bounded search.
//!
//! [`PatriciaTrie::nearest`](crate::trie::PatriciaTrie::nearest) is only
//! exact when the frontier is never trimmed. These helpers compute the exact
//! answer by brute force and measure how much a given `frontier_cap` loses.
//!
//! Recall is measured on scores rather than identifiers (see [`metrics`]).

pub mod metrics;

pub use metrics::{mean_score_recall, score_recall};

use crate::blocking::LabelRecord;
use crate::distance::normalized_edit_distance;

/// Exact k nearest records by a full scan, ascending by score.
///
/// Ties keep corpus order.
pub fn brute_force_nearest<'a, I>(
    corpus: &'a [LabelRecord<I>],
    query: &str,
    k: usize,
) -> Vec<(&'a I, f64)> {
    let mut scored: Vec<(&I, f64)> = corpus
        .iter()
        .filter(|record| !record.label.is_empty())
        .map(|record| (&record.id, normalized_edit_distance(query, &record.label)))
        .collect();
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));
    scored.truncate(k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brute_force_orders_by_score() {
        let corpus = vec![
            LabelRecord::new(1, "sitting"),
            LabelRecord::new(2, "kitten"),
            LabelRecord::new(3, "kitchen"),
        ];
        let top = brute_force_nearest(&corpus, "sitten", 2);
        let ids: Vec<i32> = top.iter().map(|(id, _)| **id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn brute_force_skips_empty_labels() {
        let corpus = vec![LabelRecord::new(1, ""), LabelRecord::new(2, "a")];
        let top = brute_force_nearest(&corpus, "", 5);
        assert_eq!(top.len(), 1);
    }
}
