//! Best-first nearest-neighbor search over a [`PatriciaTrie`].
//!
//! Two [`ScoredQueue`]s drive the search:
//! - the **frontier** holds unexplored subtrees, scored by an admissible lower
//!   bound on the normalized distance of anything stored below them;
//! - the **beam** holds the best `k` payloads found so far, scored exactly.
//!
//! Expansion stops as soon as the most promising subtree cannot beat the worst
//! beam entry. Because the bound never overestimates, an unbounded frontier
//! makes the result exact. With `frontier_cap` set, the least promising pending
//! subtrees are discarded whenever the frontier grows past the cap; the result
//! may then miss true top-k members, in exchange for a hard memory bound on
//! keys that share very long prefixes.
//!
//! A frontier entry stores the DP row for its accumulated key instead of the
//! key text. Extending the row over a child edge costs `O(|query| · |label|)`,
//! and the row alone yields both the prefix bound and, at a terminal node, the
//! exact distance.

use tracing::trace;

use super::{PatriciaTrie, ROOT};
use crate::distance::{normalize, normalized_bound, EditRow};
use crate::error::{BlockingError, Result};
use crate::queue::ScoredQueue;

/// Unexplored subtree on the frontier.
struct Pending {
    node: usize,
    key_len: usize,
    row: EditRow,
}

/// Counters describing one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Frontier entries popped and expanded.
    pub expanded: usize,
    /// Times the frontier exceeded its cap and was trimmed.
    pub frontier_trims: usize,
    /// Largest frontier size observed before trimming.
    pub peak_frontier: usize,
}

/// Reject `k == 0` and `frontier_cap == 0`.
pub(crate) fn validate_search_params(k: usize, frontier_cap: usize) -> Result<()> {
    if k == 0 {
        return Err(BlockingError::InvalidParameter(
            "k must be at least 1".to_string(),
        ));
    }
    if frontier_cap == 0 {
        return Err(BlockingError::InvalidParameter(
            "frontier_cap must be at least 1".to_string(),
        ));
    }
    Ok(())
}

impl<V> PatriciaTrie<V> {
    /// Approximate `k` nearest payloads to `query` under normalized edit distance.
    ///
    /// Returns at most `k` `(payload, score)` pairs in ascending score order,
    /// where `score = edit_distance / (|query| + |key|)`.
    ///
    /// # Arguments
    ///
    /// * `k` - Number of payloads wanted (at least 1)
    /// * `frontier_cap` - Maximum pending subtrees kept between expansions (at
    ///   least 1). A cap below `k` is legal but may yield fewer than `k` results.
    ///
    /// # Errors
    ///
    /// [`BlockingError::InvalidParameter`] if `k` or `frontier_cap` is zero.
    pub fn nearest(&self, query: &str, k: usize, frontier_cap: usize) -> Result<Vec<(&V, f64)>> {
        self.nearest_with_stats(query, k, frontier_cap)
            .map(|(results, _)| results)
    }

    /// [`PatriciaTrie::nearest`], also returning search counters.
    pub fn nearest_with_stats(
        &self,
        query: &str,
        k: usize,
        frontier_cap: usize,
    ) -> Result<(Vec<(&V, f64)>, SearchStats)> {
        validate_search_params(k, frontier_cap)?;
        Ok(self.search(query, k, frontier_cap))
    }

    /// Search with pre-validated parameters.
    pub(crate) fn search(
        &self,
        query: &str,
        k: usize,
        frontier_cap: usize,
    ) -> (Vec<(&V, f64)>, SearchStats) {
        let query: Vec<char> = query.chars().collect();
        let q = query.len();
        let mut stats = SearchStats::default();

        let mut frontier: ScoredQueue<Pending> = ScoredQueue::new();
        let mut beam: ScoredQueue<&V> = ScoredQueue::new();

        let seed = EditRow::new(&query);
        for edge in &self.nodes[ROOT].edges {
            let row = seed.extend(&query, &edge.label);
            let bound = normalized_bound(q, edge.label.len(), row.min());
            frontier.insert(
                Pending {
                    node: edge.target,
                    key_len: edge.label.len(),
                    row,
                },
                bound,
            );
        }

        while !frontier.is_empty() {
            // Bounds are admissible: nothing left can enter a full beam.
            if frontier.peek_best() > beam.peek_worst() && beam.len() >= k {
                break;
            }
            let Ok((pending, _)) = frontier.pop_best() else {
                break;
            };
            stats.expanded += 1;
            let node = &self.nodes[pending.node];

            for edge in &node.edges {
                let row = pending.row.extend(&query, &edge.label);
                let key_len = pending.key_len + edge.label.len();
                let bound = normalized_bound(q, key_len, row.min());
                if bound < beam.peek_worst() || beam.len() < k {
                    frontier.insert(
                        Pending {
                            node: edge.target,
                            key_len,
                            row,
                        },
                        bound,
                    );
                }
            }

            stats.peak_frontier = stats.peak_frontier.max(frontier.len());
            if frontier.len() > frontier_cap {
                frontier.trim(frontier_cap);
                stats.frontier_trims += 1;
            }

            if !node.values.is_empty() {
                let score = normalize(q, pending.key_len, pending.row.distance());
                for value in &node.values {
                    if score < beam.peek_worst() || beam.len() < k {
                        beam.insert(value, score);
                    }
                }
                beam.trim(k);
            }
        }

        trace!(
            query_len = q,
            k,
            frontier_cap,
            expanded = stats.expanded,
            frontier_trims = stats.frontier_trims,
            peak_frontier = stats.peak_frontier,
            found = beam.len(),
            "nearest search finished"
        );

        (beam.into_sorted_vec(), stats)
    }
}
