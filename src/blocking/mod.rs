//! Approximate string blocking between two labeled datasets.
//!
//! Comparing every left resource with every right resource is quadratic.
//! [`BlockingIndex`] indexes the right-hand labels in a [`PatriciaTrie`] once,
//! then runs a bounded nearest-neighbor search per left label and emits only
//! the `(left, right)` pairs worth scoring downstream.
//!
//! # Lifecycle
//!
//! 1. [`BlockingIndex::build`] consumes the right corpus. This is the only
//!    phase that mutates the trie and it runs on one thread.
//! 2. [`BlockingIndex::generate`] (or `generate_par`) borrows the index
//!    immutably. Searches share nothing but the trie, so left items can be
//!    spread over a worker pool.
//!
//! # Usage
//!
//! ```rust
//! use blocklex::blocking::{BlockingConfig, BlockingIndex, LabelRecord};
//!
//! # fn main() -> blocklex::Result<()> {
//! let right = vec![
//!     LabelRecord::new("r1", "kitten"),
//!     LabelRecord::new("r2", "sitting"),
//!     LabelRecord::new("r3", "kitchen"),
//! ];
//! let index = BlockingIndex::build(BlockingConfig::new(1), right)?;
//!
//! let left = vec![LabelRecord::new("l1", "Sitten")];
//! let pairs: Vec<_> = index.generate(left).collect();
//! assert_eq!(pairs.len(), 1);
//! assert_eq!((pairs[0].left, pairs[0].right), ("l1", "r1"));
//! # Ok(())
//! # }
//! ```

mod config;
pub mod records;

pub use config::{BlockingConfig, DEFAULT_QUEUE_FACTOR};
pub use records::LabelRecord;

use std::borrow::Cow;

use tracing::{debug, error, info};

use crate::error::{BlockingError, Result};
use crate::trie::PatriciaTrie;

/// Candidate link emitted by blocking.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidatePair<I> {
    pub left: I,
    pub right: I,
    /// Normalized edit distance between the two labels.
    pub score: f64,
}

/// Right-hand corpus indexed for approximate label search.
#[derive(Debug, Clone)]
pub struct BlockingIndex<I> {
    trie: PatriciaTrie<I>,
    config: BlockingConfig,
    frontier_cap: usize,
}

impl<I> BlockingIndex<I> {
    /// Index every right-hand record.
    ///
    /// Duplicate labels accumulate identifiers; one identifier may appear under
    /// several labels.
    ///
    /// # Errors
    ///
    /// - [`BlockingError::InvalidParameter`] for an invalid `config`, before any
    ///   record is read.
    /// - [`BlockingError::MalformedRecord`] for a record whose label is empty.
    ///   In-memory records carry no source line, so `line` is the record's
    ///   1-based position in `right`.
    pub fn build<R>(config: BlockingConfig, right: R) -> Result<Self>
    where
        R: IntoIterator<Item = LabelRecord<I>>,
    {
        Self::try_build(config, right.into_iter().map(Ok))
    }

    /// [`BlockingIndex::build`] over fallible records, e.g. from
    /// [`records::read_json_lines`]. The first error aborts the build.
    ///
    /// Records from `read_json_lines` are already checked for empty labels and
    /// report their file line; the positional fallback only applies to records
    /// that reach the trie unchecked.
    pub fn try_build<R>(config: BlockingConfig, right: R) -> Result<Self>
    where
        R: IntoIterator<Item = Result<LabelRecord<I>>>,
    {
        config.validate()?;
        let frontier_cap = config.effective_queue_max();

        let mut trie = PatriciaTrie::new();
        for (idx, record) in right.into_iter().enumerate() {
            let record = record?;
            let label = normalize_label(&record.label, config.lowercase);
            trie.insert(&label, record.id).map_err(|e| match e {
                BlockingError::EmptyKey => BlockingError::MalformedRecord {
                    line: idx + 1,
                    reason: "empty label".to_string(),
                },
                other => other,
            })?;
        }

        if trie.is_empty() {
            error!("no labels in the right dataset; blocking will produce no candidates");
        } else {
            info!(
                labels = trie.len(),
                nodes = trie.node_count(),
                max_matches = config.max_matches,
                queue_max = frontier_cap,
                "built blocking index"
            );
        }

        Ok(Self {
            trie,
            config,
            frontier_cap,
        })
    }

    pub fn config(&self) -> &BlockingConfig {
        &self.config
    }

    /// Read-only view of the underlying trie.
    pub fn trie(&self) -> &PatriciaTrie<I> {
        &self.trie
    }

    /// Upper bound on the number of pairs `generate` emits for `n_left` labels.
    ///
    /// Computed as `n_left * min(n_right, max_matches)`, where `n_right` counts
    /// indexed labels. Duplicate labels count once per record, so this can
    /// exceed the number of distinct right-hand resources.
    pub fn estimate_size(&self, n_left: usize) -> usize {
        n_left.saturating_mul(self.trie.len().min(self.config.max_matches))
    }

    /// Nearest right identifiers for one left label, best first.
    pub fn candidates(&self, label: &str) -> Vec<(&I, f64)> {
        let query = normalize_label(label, self.config.lowercase);
        let (results, stats) = self
            .trie
            .search(&query, self.config.max_matches, self.frontier_cap);
        debug!(
            expanded = stats.expanded,
            frontier_trims = stats.frontier_trims,
            found = results.len(),
            "blocked one label"
        );
        results
    }

    /// Lazily pair every left record with its nearest right identifiers.
    ///
    /// The sequence is single-pass: each left record is searched when the
    /// iterator reaches it.
    pub fn generate<L>(&self, left: L) -> CandidatePairs<'_, I, L::IntoIter>
    where
        L: IntoIterator<Item = LabelRecord<I>>,
        I: Clone,
    {
        CandidatePairs {
            index: self,
            left: left.into_iter(),
            pending: Vec::new().into_iter(),
            searched: 0,
            exhausted: false,
        }
    }

    fn pairs_for(&self, record: &LabelRecord<I>) -> Vec<CandidatePair<I>>
    where
        I: Clone,
    {
        self.candidates(&record.label)
            .into_iter()
            .map(|(right, score)| CandidatePair {
                left: record.id.clone(),
                right: right.clone(),
                score,
            })
            .collect()
    }
}

#[cfg(feature = "parallel")]
impl<I> BlockingIndex<I>
where
    I: Clone + Send + Sync,
{
    /// Search all left records on the rayon pool.
    ///
    /// Pairs come back in the same order `generate` would produce them.
    pub fn generate_par(&self, left: &[LabelRecord<I>]) -> Vec<CandidatePair<I>> {
        use rayon::prelude::*;

        if left.is_empty() {
            error!("no labels in the left dataset; blocking will produce no candidates");
        }
        left.par_iter()
            .map(|record| self.pairs_for(record))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Iterator returned by [`BlockingIndex::generate`].
pub struct CandidatePairs<'a, I, L> {
    index: &'a BlockingIndex<I>,
    left: L,
    pending: std::vec::IntoIter<CandidatePair<I>>,
    searched: usize,
    exhausted: bool,
}

impl<I, L> Iterator for CandidatePairs<'_, I, L>
where
    I: Clone,
    L: Iterator<Item = LabelRecord<I>>,
{
    type Item = CandidatePair<I>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(pair) = self.pending.next() {
                return Some(pair);
            }
            if self.exhausted {
                return None;
            }
            match self.left.next() {
                Some(record) => {
                    self.searched += 1;
                    self.pending = self.index.pairs_for(&record).into_iter();
                }
                None => {
                    self.exhausted = true;
                    if self.searched == 0 {
                        error!("no labels in the left dataset; blocking will produce no candidates");
                    } else {
                        debug!(searched = self.searched, "left dataset exhausted");
                    }
                    return None;
                }
            }
        }
    }
}

fn normalize_label(label: &str, lowercase: bool) -> Cow<'_, str> {
    if lowercase {
        Cow::Owned(label.to_lowercase())
    } else {
        Cow::Borrowed(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(items: &[(&'static str, &'static str)]) -> Vec<LabelRecord<&'static str>> {
        items.iter().map(|&(id, label)| LabelRecord::new(id, label)).collect()
    }

    #[test]
    fn build_rejects_bad_config_eagerly() {
        let err = BlockingIndex::build(BlockingConfig::new(0), records(&[("r1", "a")])).unwrap_err();
        assert!(matches!(err, BlockingError::InvalidParameter(_)));
    }

    #[test]
    fn build_rejects_empty_label_with_position() {
        let err = BlockingIndex::build(
            BlockingConfig::new(1),
            records(&[("r1", "alpha"), ("r2", "")]),
        )
        .unwrap_err();
        match err {
            BlockingError::MalformedRecord { line, reason } => {
                assert_eq!(line, 2);
                assert_eq!(reason, "empty label");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn lowercases_by_default() {
        let index =
            BlockingIndex::build(BlockingConfig::new(1), records(&[("r1", "KITTEN")])).unwrap();
        let found = index.candidates("Kitten");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].1, 0.0);
    }

    #[test]
    fn case_sensitive_when_disabled() {
        let config = BlockingConfig::new(1).with_lowercase(false);
        let index = BlockingIndex::build(config, records(&[("r1", "KITTEN")])).unwrap();
        let found = index.candidates("kitten");
        assert_eq!(found.len(), 1);
        assert!(found[0].1 > 0.0);
    }

    #[test]
    fn generate_pairs_every_candidate() {
        let index = BlockingIndex::build(
            BlockingConfig::new(2),
            records(&[("r1", "paris"), ("r2", "paris"), ("r3", "london")]),
        )
        .unwrap();
        let pairs: Vec<_> = index
            .generate(records(&[("l1", "paris"), ("l2", "londres")]))
            .collect();
        let links: Vec<_> = pairs.iter().map(|p| (p.left, p.right)).collect();
        assert_eq!(links.len(), 4);
        assert_eq!(&links[..2], &[("l1", "r1"), ("l1", "r2")]);
        assert_eq!(links[2], ("l2", "r3"));
    }

    #[test]
    fn blank_lines_do_not_shift_empty_label_line() {
        let input = "{\"id\":\"r1\",\"label\":\"a\"}\n\n\n{\"id\":\"r2\",\"label\":\"\"}\n";
        let err = BlockingIndex::try_build(
            BlockingConfig::new(1),
            super::records::read_json_lines(std::io::Cursor::new(input)),
        )
        .unwrap_err();
        match err {
            BlockingError::MalformedRecord { line, reason } => {
                assert_eq!(line, 4);
                assert!(reason.contains("r2"), "{reason}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn estimate_size_counts_duplicate_labels() {
        let index = BlockingIndex::build(
            BlockingConfig::new(5),
            records(&[("r1", "paris"), ("r1", "paris"), ("r2", "rome")]),
        )
        .unwrap();
        assert_eq!(index.estimate_size(2), 6);
    }

    #[test]
    fn estimate_size_caps_at_corpus() {
        let index = BlockingIndex::build(
            BlockingConfig::new(5),
            records(&[("r1", "a"), ("r2", "b")]),
        )
        .unwrap();
        assert_eq!(index.estimate_size(10), 20);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_matches_sequential() {
        let right = records(&[
            ("r1", "kitten"),
            ("r2", "sitting"),
            ("r3", "kitchen"),
            ("r4", "mitten"),
        ]);
        let left = records(&[("l1", "sitten"), ("l2", "kitchens"), ("l3", "smitten")]);
        let index = BlockingIndex::build(BlockingConfig::new(2), right).unwrap();
        let sequential: Vec<_> = index.generate(left.clone()).collect();
        let parallel = index.generate_par(&left);
        assert_eq!(sequential, parallel);
    }
}
