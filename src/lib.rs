//! blocklex: approximate string blocking for record linkage.
//!
//! Links resources across two datasets by their labels without comparing
//! every left item with every right item. The right-hand labels go into a
//! compressed prefix trie; each left label then runs a best-first,
//! memory-bounded nearest-neighbor search under normalized edit distance.
//!
//! - [`distance`]: Levenshtein distance and admissible prefix lower bounds
//! - [`queue`]: bounded score queue shared by the search frontier and beam
//! - [`trie`]: Patricia trie and `nearest` search
//! - [`blocking`]: the blocking index that turns two corpora into candidate pairs
//! - [`benchmark`]: brute-force reference search and recall metrics
//!
//! # Critical Nuances
//!
//! ## The frontier cap makes search approximate
//!
//! With an unbounded frontier the search is exact: bounds never overestimate,
//! so the stop rule only discards subtrees that cannot beat the current
//! k-th result. A finite `frontier_cap` discards the least promising pending
//! subtrees to keep memory and latency flat on keys with long shared
//! prefixes. True top-k members can then be missed. That is the trade, not a
//! bug. The default cap is `20 * k`.
//!
//! ## Normalized distance favors long strings
//!
//! Scores are `edit_distance / (|s| + |t|)`. One typo in a long label costs
//! less than one typo in a short label, and the empty query is at distance 1
//! from everything.
//!
//! ## Ties
//!
//! A candidate that only ties the current worst result never displaces it.
//! Among equal scores the earlier-found payload wins, so results are
//! deterministic for a given corpus order.

pub mod benchmark;
pub mod blocking;
pub mod distance;
pub mod error;
pub mod queue;
pub mod trie;

// Re-exports
pub use blocking::{BlockingConfig, BlockingIndex, CandidatePair, LabelRecord};
pub use distance::{edit_distance, lower_bound, normalized_edit_distance};
pub use error::{BlockingError, Result};
pub use queue::ScoredQueue;
pub use trie::{PatriciaTrie, SearchStats};
