//! Edge case tests for blocklex.
//!
//! Tests unusual inputs and boundary conditions that could cause failures.

use blocklex::{BlockingConfig, BlockingError, BlockingIndex, LabelRecord, PatriciaTrie};

// =============================================================================
// Empty inputs
// =============================================================================

#[test]
fn empty_right_corpus_yields_nothing() {
    let right: Vec<LabelRecord<u32>> = Vec::new();
    let index = BlockingIndex::build(BlockingConfig::new(3), right).expect("build");
    assert!(index.candidates("anything").is_empty());
    assert!(index.candidates("").is_empty());

    let pairs: Vec<_> = index.generate(vec![LabelRecord::new(1, "x")]).collect();
    assert!(pairs.is_empty());
}

#[test]
fn empty_left_corpus_yields_nothing() {
    let index =
        BlockingIndex::build(BlockingConfig::new(1), vec![LabelRecord::new(1, "alpha")]).unwrap();
    let mut pairs = index.generate(Vec::new());
    assert!(pairs.next().is_none());
    // Fused after exhaustion.
    assert!(pairs.next().is_none());
}

#[test]
fn empty_query_is_legal() {
    let mut trie = PatriciaTrie::new();
    trie.insert("a", 1).unwrap();
    trie.insert("abc", 2).unwrap();
    let results = trie.nearest("", 2, 10).unwrap();
    assert_eq!(results.len(), 2);
    for (_, score) in results {
        assert_eq!(score, 1.0);
    }
}

// =============================================================================
// Parameter edge cases
// =============================================================================

#[test]
fn k_of_one_and_cap_of_one() {
    let mut trie = PatriciaTrie::new();
    for (i, word) in ["kitten", "sitting", "kitchen", "mitten"].iter().enumerate() {
        trie.insert(word, i).unwrap();
    }
    let results = trie.nearest("kitten", 1, 1).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(*results[0].0, 0);
}

#[test]
fn cap_below_k_may_return_fewer() {
    // Distinct first letters put every key on its own root edge; a cap of 1
    // keeps a single pending subtree after the first expansion.
    let mut trie = PatriciaTrie::new();
    for (i, word) in ["apple", "banana", "cherry", "damson", "elder"]
        .iter()
        .enumerate()
    {
        trie.insert(word, i).unwrap();
    }
    let results = trie.nearest("apple", 5, 1).unwrap();
    assert!(!results.is_empty());
    assert!(results.len() < 5, "cap of 1 should lose results, got {}", results.len());
    assert_eq!(*results[0].0, 0);
}

#[test]
fn zero_k_rejected_at_construction() {
    let err = BlockingIndex::<u32>::build(BlockingConfig::new(0), Vec::new()).unwrap_err();
    assert!(matches!(err, BlockingError::InvalidParameter(_)));
}

#[test]
fn zero_queue_max_rejected_at_construction() {
    let config = BlockingConfig::new(1).with_queue_max(0);
    let err = BlockingIndex::<u32>::build(config, Vec::new()).unwrap_err();
    assert!(matches!(err, BlockingError::InvalidParameter(_)));
}

#[test]
fn huge_k_is_fine() {
    let mut trie = PatriciaTrie::new();
    trie.insert("one", 1).unwrap();
    trie.insert("two", 2).unwrap();
    let results = trie.nearest("one", usize::MAX, usize::MAX).unwrap();
    assert_eq!(results.len(), 2);
}

// =============================================================================
// Key shape edge cases
// =============================================================================

#[test]
fn single_character_keys() {
    let mut trie = PatriciaTrie::new();
    for (i, c) in ('a'..='z').enumerate() {
        trie.insert(&c.to_string(), i).unwrap();
    }
    trie.check_invariants().unwrap();
    let results = trie.nearest("q", 1, 100).unwrap();
    assert_eq!(*results[0].0, 16);
    assert_eq!(results[0].1, 0.0);
}

#[test]
fn deeply_nested_prefixes() {
    // "a", "aa", "aaa", ... forms a chain as deep as the longest key.
    let mut trie = PatriciaTrie::new();
    for len in 1..=2000 {
        trie.insert(&"a".repeat(len), len).unwrap();
    }
    trie.check_invariants().unwrap();
    assert_eq!(trie.lookup(&"a".repeat(1500)), &[1500]);

    let results = trie.nearest(&"a".repeat(20), 3, 60).unwrap();
    assert_eq!(*results[0].0, 20);
    assert_eq!(results.len(), 3);
}

#[test]
fn one_identifier_under_many_labels() {
    let right = vec![
        LabelRecord::new("r1", "colour"),
        LabelRecord::new("r1", "color"),
        LabelRecord::new("r2", "collar"),
    ];
    let index = BlockingIndex::build(BlockingConfig::new(2), right).unwrap();
    let found = index.candidates("color");
    let ids: Vec<&str> = found.iter().map(|(id, _)| **id).collect();
    assert_eq!(ids, vec!["r1", "r1"]);
}

#[test]
fn unicode_labels() {
    let right = vec![
        LabelRecord::new(1, "Zürich"),
        LabelRecord::new(2, "Genève"),
        LabelRecord::new(3, "東京"),
    ];
    let index = BlockingIndex::build(BlockingConfig::new(1), right).unwrap();
    assert_eq!(*index.candidates("zurich")[0].0, 1);
    assert_eq!(*index.candidates("geneve")[0].0, 2);
    assert_eq!(*index.candidates("東京都")[0].0, 3);
}
