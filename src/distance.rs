//! Edit distance and prefix lower bounds.
//!
//! Everything here works on Unicode scalar values (`char`), not bytes, so a
//! single accented letter counts as one edit.
//!
//! ## Important nuance
//!
//! The trie search never sees a whole stored string until it reaches a
//! terminal node. It has to score *prefixes*, and the score must never
//! overestimate the distance to any string that starts with that prefix,
//! otherwise the best-first stop rule would discard subtrees that still hold
//! a better match. [`lower_bound`] and [`normalized_lower_bound`] are the two
//! admissible estimates; [`EditRow`] is the shared DP state that lets the
//! search extend a prefix edge by edge instead of recomputing from scratch.

/// One row of the Levenshtein DP table, indexed by query position.
///
/// `cells[i]` is the edit distance between `query[..i]` and the prefix
/// consumed so far. The row always has `query.len() + 1` cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditRow {
    cells: Vec<usize>,
}

impl EditRow {
    /// Row for the empty prefix: `0, 1, ..., query.len()`.
    pub fn new(query: &[char]) -> Self {
        Self {
            cells: (0..=query.len()).collect(),
        }
    }

    /// Advance the row over `chars`, returning the row for the longer prefix.
    ///
    /// Uses two rows of scratch space regardless of `chars.len()`.
    #[must_use]
    pub fn extend(&self, query: &[char], chars: &[char]) -> Self {
        debug_assert_eq!(self.cells.len(), query.len() + 1);
        let mut last = self.cells.clone();
        let mut next = vec![0usize; last.len()];
        for &c in chars {
            next[0] = last[0] + 1;
            for i in 1..last.len() {
                let substitute = last[i - 1] + usize::from(query[i - 1] != c);
                next[i] = (last[i] + 1).min(next[i - 1] + 1).min(substitute);
            }
            std::mem::swap(&mut last, &mut next);
        }
        Self { cells: last }
    }

    /// Edit distance between the whole query and the consumed prefix.
    #[inline]
    pub fn distance(&self) -> usize {
        self.cells[self.cells.len() - 1]
    }

    /// Minimum over the row: a lower bound on the distance between the query
    /// and *any* completion of the consumed prefix.
    #[inline]
    pub fn min(&self) -> usize {
        self.cells.iter().copied().min().unwrap_or(0)
    }
}

/// Levenshtein distance between two strings.
///
/// O(|s|·|t|) time, O(min(|s|, |t|)) space.
#[must_use]
pub fn edit_distance(s: &str, t: &str) -> usize {
    let s: Vec<char> = s.chars().collect();
    let t: Vec<char> = t.chars().collect();
    edit_distance_chars(&s, &t)
}

/// [`edit_distance`] over pre-split characters.
#[must_use]
pub fn edit_distance_chars(s: &[char], t: &[char]) -> usize {
    // The row runs along the shorter string.
    let (short, long) = if s.len() <= t.len() { (s, t) } else { (t, s) };
    EditRow::new(short).extend(short, long).distance()
}

/// Lower bound on `edit_distance(s, p + suffix)` for every possible `suffix`.
///
/// Runs the DP of `s` against `p` and takes the minimum of the final row:
/// any alignment of `s` with a completion of `p` aligns `p` with some prefix
/// of `s`, and the row holds the exact cost of each such alignment.
#[must_use]
pub fn lower_bound(s: &str, p: &str) -> usize {
    let s: Vec<char> = s.chars().collect();
    let p: Vec<char> = p.chars().collect();
    EditRow::new(&s).extend(&s, &p).min()
}

/// Normalized edit distance `edit_distance(s, t) / (|s| + |t|)`, in `[0, 1]`.
///
/// Two empty strings are at distance 0.
#[must_use]
pub fn normalized_edit_distance(s: &str, t: &str) -> f64 {
    let s: Vec<char> = s.chars().collect();
    let t: Vec<char> = t.chars().collect();
    normalize(s.len(), t.len(), edit_distance_chars(&s, &t))
}

/// Lower bound on the normalized distance between `s` and any completion of `p`.
#[must_use]
pub fn normalized_lower_bound(s: &str, p: &str) -> f64 {
    let s: Vec<char> = s.chars().collect();
    let p: Vec<char> = p.chars().collect();
    let row = EditRow::new(&s).extend(&s, &p);
    normalized_bound(s.len(), p.len(), row.min())
}

/// Divide a raw distance by the combined length of the compared strings.
#[inline]
pub(crate) fn normalize(s_len: usize, t_len: usize, distance: usize) -> f64 {
    let total = s_len + t_len;
    if total == 0 {
        return 0.0;
    }
    distance as f64 / total as f64
}

/// Normalized bound from a raw prefix bound.
///
/// A completion `t` of length `m >= prefix_len` satisfies
/// `edit_distance(s, t) >= max(lower, |m - |s||)`. The ratio
/// `max(lower, |m - |s||) / (|s| + m)` decreases up to `m = |s| + lower` and
/// increases after it, so the minimum over admissible `m` sits at
/// `max(prefix_len, |s| + lower)`.
#[inline]
pub(crate) fn normalized_bound(query_len: usize, prefix_len: usize, lower: usize) -> f64 {
    let m = prefix_len.max(query_len + lower);
    normalize(query_len, m, lower.max(m - query_len))
}
