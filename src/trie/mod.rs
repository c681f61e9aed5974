//! Compressed prefix (Patricia) trie over string keys.
//!
//! Every edge carries a non-empty label and every node holds a multiset of
//! payloads for the keys that end exactly there. Sibling labels never share a
//! first character, so at most one edge can continue any given key and
//! insertion never backtracks.
//!
//! Nodes live in a flat `Vec` and refer to children by index. That keeps the
//! trie `Send + Sync` whenever the payload is, and lets search frontier
//! entries point at subtrees without borrowing through a chain of boxes.
//!
//! There is no delete and no rebalancing: depth is bounded by total key length,
//! not key count. Both insertion and search walk the tree iteratively, so a
//! pathological, heavily shared key set cannot overflow the stack.
//!
//! # Usage
//!
//! ```rust
//! use blocklex::trie::PatriciaTrie;
//!
//! # fn main() -> blocklex::Result<()> {
//! let mut trie = PatriciaTrie::new();
//! trie.insert("kitten", "r1")?;
//! trie.insert("sitting", "r2")?;
//! trie.insert("kitchen", "r3")?;
//!
//! assert_eq!(trie.lookup("kitten"), &["r1"]);
//!
//! let nearest = trie.nearest("sitten", 1, 20)?;
//! assert_eq!(*nearest[0].0, "r1");
//! # Ok(())
//! # }
//! ```

mod search;

pub use search::SearchStats;

use smallvec::SmallVec;

use crate::error::{BlockingError, Result};

pub(crate) const ROOT: usize = 0;

/// Labeled edge to a child node.
#[derive(Debug, Clone)]
pub(crate) struct Edge {
    pub(crate) label: Box<[char]>,
    pub(crate) target: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct Node<V> {
    pub(crate) edges: SmallVec<[Edge; 4]>,
    pub(crate) values: Vec<V>,
}

impl<V> Node<V> {
    fn empty() -> Self {
        Self {
            edges: SmallVec::new(),
            values: Vec::new(),
        }
    }

    fn leaf(value: V) -> Self {
        Self {
            edges: SmallVec::new(),
            values: vec![value],
        }
    }
}

/// Patricia trie mapping strings to multisets of payloads.
#[derive(Debug, Clone)]
pub struct PatriciaTrie<V> {
    pub(crate) nodes: Vec<Node<V>>,
    len: usize,
}

impl<V> Default for PatriciaTrie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> PatriciaTrie<V> {
    /// Create an empty trie (a childless root).
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::empty()],
            len: 0,
        }
    }

    /// Number of inserted `(key, value)` pairs, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes, root included.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn push_node(&mut self, node: Node<V>) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Insert `value` under `key`.
    ///
    /// Inserting the same key twice keeps both values. Returns
    /// [`BlockingError::EmptyKey`] for `""`.
    pub fn insert(&mut self, key: &str, value: V) -> Result<()> {
        let key: Vec<char> = key.chars().collect();
        if key.is_empty() {
            return Err(BlockingError::EmptyKey);
        }

        let mut node = ROOT;
        let mut rest: &[char] = &key;
        loop {
            let overlap = self.nodes[node]
                .edges
                .iter()
                .enumerate()
                .find_map(|(idx, edge)| {
                    let i = common_prefix_len(rest, &edge.label);
                    (i > 0).then_some((idx, i))
                });

            let Some((idx, i)) = overlap else {
                // No child shares a first character with the key.
                let leaf = self.push_node(Node::leaf(value));
                self.nodes[node].edges.push(Edge {
                    label: rest.into(),
                    target: leaf,
                });
                break;
            };

            let edge = &self.nodes[node].edges[idx];
            if i == edge.label.len() {
                let target = edge.target;
                if i == rest.len() {
                    self.nodes[target].values.push(value);
                    break;
                }
                node = target;
                rest = &rest[i..];
                continue;
            }

            // Partial overlap: split the edge at `i`.
            let common: Box<[char]> = edge.label[..i].into();
            let mut middle = Node::empty();
            middle.edges.push(Edge {
                label: edge.label[i..].into(),
                target: edge.target,
            });
            if i == rest.len() {
                middle.values.push(value);
            } else {
                let leaf = self.push_node(Node::leaf(value));
                middle.edges.push(Edge {
                    label: rest[i..].into(),
                    target: leaf,
                });
            }
            let middle = self.push_node(middle);
            self.nodes[node].edges[idx] = Edge {
                label: common,
                target: middle,
            };
            break;
        }

        self.len += 1;
        Ok(())
    }

    /// Payloads stored under exactly `key`, or an empty slice.
    pub fn lookup(&self, key: &str) -> &[V] {
        let key: Vec<char> = key.chars().collect();
        let mut node = ROOT;
        let mut rest: &[char] = &key;
        while !rest.is_empty() {
            let next = self.nodes[node].edges.iter().find_map(|edge| {
                let i = common_prefix_len(rest, &edge.label);
                (i > 0).then_some((edge, i))
            });
            match next {
                Some((edge, i)) if i == edge.label.len() => {
                    node = edge.target;
                    rest = &rest[i..];
                }
                // Diverges inside an edge, or ends part-way along one.
                _ => return &[],
            }
        }
        &self.nodes[node].values
    }

    /// All stored keys with their payloads, in depth-first edge order.
    pub fn iter(&self) -> impl Iterator<Item = (String, &[V])> + '_ {
        let mut stack: Vec<(usize, String)> = vec![(ROOT, String::new())];
        std::iter::from_fn(move || {
            while let Some((node, key)) = stack.pop() {
                let n = &self.nodes[node];
                for edge in n.edges.iter().rev() {
                    let mut child = key.clone();
                    child.extend(edge.label.iter());
                    stack.push((edge.target, child));
                }
                if !n.values.is_empty() {
                    return Some((key, n.values.as_slice()));
                }
            }
            None
        })
    }

    /// Verify structural invariants, describing the first violation found.
    ///
    /// - every edge label is non-empty;
    /// - no two sibling labels share a first character;
    /// - every non-root node is reachable from exactly one edge.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let mut parents = vec![0usize; self.nodes.len()];
        for (id, node) in self.nodes.iter().enumerate() {
            for (a, edge) in node.edges.iter().enumerate() {
                let Some(first) = edge.label.first() else {
                    return Err(format!("node {id} has an empty edge label"));
                };
                if node.edges[a + 1..]
                    .iter()
                    .any(|other| other.label.first() == Some(first))
                {
                    return Err(format!(
                        "node {id} has sibling edges sharing the prefix {first:?}"
                    ));
                }
                match parents.get_mut(edge.target) {
                    Some(count) => *count += 1,
                    None => return Err(format!("node {id} points at missing node {}", edge.target)),
                }
            }
        }
        if parents[ROOT] != 0 {
            return Err("root has an incoming edge".to_string());
        }
        if let Some(orphan) = (1..self.nodes.len()).find(|&id| parents[id] != 1) {
            return Err(format!(
                "node {orphan} has {} incoming edges",
                parents[orphan]
            ));
        }
        Ok(())
    }
}

/// Length of the longest common prefix of two character slices.
#[inline]
pub(crate) fn common_prefix_len(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}
