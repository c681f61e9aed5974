//! Bounded score queue.
//!
//! An ordered multiset of `(item, score)` entries, lowest score first. Both the
//! search frontier and the result beam are instances of [`ScoredQueue`].
//!
//! A binary heap only exposes one end cheaply. The search needs both ends
//! (`peek_best` to decide what to expand, `peek_worst` to decide whether a new
//! candidate can still matter) and bulk removal of the worst entries in
//! [`ScoredQueue::trim`], so entries live in an ordered tree keyed by
//! `(score, sequence)`.
//!
//! Equal scores are ordered by insertion sequence: the entry inserted first
//! ranks better and survives a trim. Omissions under ties are therefore
//! deterministic for a given insertion order.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::error::{BlockingError, Result};

type EntryKey = (OrderedFloat<f64>, u64);

/// Ordered `(item, score)` container that can be trimmed to its `n` best entries.
#[derive(Debug, Clone)]
pub struct ScoredQueue<T> {
    entries: BTreeMap<EntryKey, T>,
    next_seq: u64,
}

impl<T> Default for ScoredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ScoredQueue<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_seq: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert an entry. NaN scores order after every finite score.
    pub fn insert(&mut self, item: T, score: f64) {
        let key = (OrderedFloat(score), self.next_seq);
        self.next_seq += 1;
        self.entries.insert(key, item);
    }

    /// Lowest score held, or `+inf` when empty ("no constraint yet").
    #[inline]
    pub fn peek_best(&self) -> f64 {
        self.entries
            .first_key_value()
            .map_or(f64::INFINITY, |((score, _), _)| score.0)
    }

    /// Highest score held, or `+inf` when empty ("no constraint yet").
    #[inline]
    pub fn peek_worst(&self) -> f64 {
        self.entries
            .last_key_value()
            .map_or(f64::INFINITY, |((score, _), _)| score.0)
    }

    /// Remove and return the lowest-scored entry.
    pub fn pop_best(&mut self) -> Result<(T, f64)> {
        self.entries
            .pop_first()
            .map(|((score, _), item)| (item, score.0))
            .ok_or(BlockingError::EmptyQueue)
    }

    /// Discard everything except the `n` globally best entries.
    pub fn trim(&mut self, n: usize) {
        while self.entries.len() > n {
            self.entries.pop_last();
        }
    }

    /// Entries in ascending score order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, f64)> + '_ {
        self.entries.iter().map(|((score, _), item)| (item, score.0))
    }

    /// Consume the queue, returning entries in ascending score order.
    pub fn into_sorted_vec(self) -> Vec<(T, f64)> {
        self.entries
            .into_iter()
            .map(|((score, _), item)| (item, score.0))
            .collect()
    }
}
