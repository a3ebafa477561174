//! Arena-based prefix trie for candidate lookup.
//!
//! Nodes live in a flat `Vec` and reference children by index, so there are
//! no ownership cycles and the whole structure is trivially `Send`. Removal
//! only decrements counters and detaches symbol ids; structural nodes are
//! never freed. Under frequent re-indexing the same words come and go
//! constantly, and retaining the skeleton avoids churning the arena.

use crate::types::SymbolId;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Default)]
struct TrieNode {
    /// Child index per character. Ordered map so traversal has a stable
    /// secondary order.
    children: BTreeMap<char, u32>,
    is_end: bool,
    /// Counts insert events, including re-insertion of the same symbol
    /// across files. Floored at zero on removal.
    frequency: u32,
    /// Distinct symbols terminating at this node.
    symbols: HashSet<SymbolId>,
    /// Highest terminal frequency in this node's subtree, maintained on
    /// insert and left stale on removal. Traversal heuristic only.
    subtree_max_freq: u32,
}

/// A terminal word produced by [`PrefixTrie::search_prefix`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixEntry {
    pub word: String,
    pub frequency: u32,
    pub symbols: Vec<SymbolId>,
}

/// Character-keyed prefix tree with frequency counters and symbol ids.
#[derive(Debug)]
pub struct PrefixTrie {
    nodes: Vec<TrieNode>,
    words: usize,
}

const ROOT: usize = 0;

impl PrefixTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            words: 0,
        }
    }

    /// Number of distinct live words (frequency or symbols still attached).
    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// Insert one occurrence of `word` terminating at `id`.
    ///
    /// Re-inserting the same symbol bumps the frequency again; that is how
    /// repeated occurrence across the codebase is modeled.
    pub fn insert(&mut self, word: &str, id: SymbolId) {
        if word.is_empty() {
            return;
        }

        let mut path = Vec::with_capacity(word.chars().count() + 1);
        let mut cur = ROOT;
        path.push(cur);
        for ch in word.chars() {
            cur = match self.nodes[cur].children.get(&ch) {
                Some(&idx) => idx as usize,
                None => {
                    let idx = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[cur].children.insert(ch, idx as u32);
                    idx
                }
            };
            path.push(cur);
        }

        let terminal = &mut self.nodes[cur];
        if !terminal.is_end {
            terminal.is_end = true;
            self.words += 1;
        }
        terminal.frequency += 1;
        terminal.symbols.insert(id);

        let freq = self.nodes[cur].frequency;
        for idx in path {
            let node = &mut self.nodes[idx];
            if node.subtree_max_freq < freq {
                node.subtree_max_freq = freq;
            }
        }
    }

    /// Remove one occurrence of `word` for `id`.
    ///
    /// Decrements the frequency (floored at zero) and detaches the symbol id.
    /// The node chain stays in place; a word whose frequency and symbol set
    /// are both exhausted stops being reported.
    pub fn remove(&mut self, word: &str, id: SymbolId) {
        let Some(idx) = self.descend(word) else {
            return;
        };
        let node = &mut self.nodes[idx];
        if !node.is_end {
            return;
        }
        node.frequency = node.frequency.saturating_sub(1);
        node.symbols.remove(&id);
        if node.frequency == 0 && node.symbols.is_empty() {
            node.is_end = false;
            self.words -= 1;
        }
    }

    /// Frequency recorded for an exact word, zero if absent.
    pub fn frequency(&self, word: &str) -> u32 {
        self.descend(word)
            .map(|idx| self.nodes[idx].frequency)
            .unwrap_or(0)
    }

    /// Lazy depth-first enumeration of terminal words under `prefix`,
    /// bounded by `limit`.
    ///
    /// Children are visited in descending subtree-max-frequency order so the
    /// likely-useful completions surface before the limit cuts off. The hint
    /// is not decayed on removal; ordering under a tight limit is a
    /// heuristic, completeness within the limit is not.
    pub fn search_prefix(&self, prefix: &str, limit: usize) -> PrefixIter<'_> {
        let start = self.descend(prefix);
        let mut stack = Vec::new();
        if let Some(idx) = start {
            stack.push((idx, prefix.to_string()));
        }
        PrefixIter {
            trie: self,
            stack,
            remaining: limit,
        }
    }

    fn descend(&self, prefix: &str) -> Option<usize> {
        let mut cur = ROOT;
        for ch in prefix.chars() {
            cur = *self.nodes[cur].children.get(&ch)? as usize;
        }
        Some(cur)
    }
}

impl Default for PrefixTrie {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over terminal words beneath a prefix. Finite, lazy, and visits
/// every node at most once; dropping it mid-way has no side effects.
pub struct PrefixIter<'a> {
    trie: &'a PrefixTrie,
    stack: Vec<(usize, String)>,
    remaining: usize,
}

impl Iterator for PrefixIter<'_> {
    type Item = PrefixEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        while let Some((idx, word)) = self.stack.pop() {
            let node = &self.trie.nodes[idx];

            // Push children so the highest-frequency subtree pops first,
            // ties resolved by character order.
            let mut children: Vec<(&char, &u32)> = node.children.iter().collect();
            children.sort_by(|(ca, a), (cb, b)| {
                let fa = self.trie.nodes[**a as usize].subtree_max_freq;
                let fb = self.trie.nodes[**b as usize].subtree_max_freq;
                fa.cmp(&fb).then(cb.cmp(ca))
            });
            for (ch, child) in children {
                let mut next = word.clone();
                next.push(*ch);
                self.stack.push((*child as usize, next));
            }

            if node.is_end && (node.frequency > 0 || !node.symbols.is_empty()) {
                self.remaining -= 1;
                let mut symbols: Vec<SymbolId> = node.symbols.iter().copied().collect();
                symbols.sort();
                return Some(PrefixEntry {
                    word,
                    frequency: node.frequency,
                    symbols,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> SymbolId {
        SymbolId::new(n).unwrap()
    }

    #[test]
    fn test_insert_and_frequency() {
        let mut trie = PrefixTrie::new();
        trie.insert("print", id(1));
        trie.insert("print", id(1));
        trie.insert("print", id(2));
        assert_eq!(trie.frequency("print"), 3);
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn test_empty_word_is_noop() {
        let mut trie = PrefixTrie::new();
        trie.insert("", id(1));
        assert!(trie.is_empty());
    }

    #[test]
    fn test_search_prefix_returns_only_matching_words() {
        let mut trie = PrefixTrie::new();
        trie.insert("print", id(1));
        trie.insert("private", id(2));
        trie.insert("parse", id(3));

        let words: Vec<String> = trie
            .search_prefix("pri", 10)
            .map(|e| e.word)
            .collect();
        assert_eq!(words.len(), 2);
        assert!(words.iter().all(|w| w.starts_with("pri")));
    }

    #[test]
    fn test_search_absent_prefix_is_empty() {
        let mut trie = PrefixTrie::new();
        trie.insert("print", id(1));
        assert_eq!(trie.search_prefix("xyz", 10).count(), 0);
    }

    #[test]
    fn test_limit_bounds_enumeration() {
        let mut trie = PrefixTrie::new();
        for (i, word) in ["aa", "ab", "ac", "ad"].iter().enumerate() {
            trie.insert(word, id(i as u32 + 1));
        }
        assert_eq!(trie.search_prefix("a", 2).count(), 2);
        assert_eq!(trie.search_prefix("a", 0).count(), 0);
    }

    #[test]
    fn test_frequency_guided_order_surfaces_hot_words_first() {
        let mut trie = PrefixTrie::new();
        trie.insert("parse", id(1));
        for _ in 0..5 {
            trie.insert("print", id(2));
        }
        let first = trie.search_prefix("p", 1).next().unwrap();
        assert_eq!(first.word, "print");
    }

    #[test]
    fn test_no_word_yielded_twice() {
        let mut trie = PrefixTrie::new();
        for word in ["a", "ab", "abc", "abd", "b"] {
            trie.insert(word, id(9));
        }
        let words: Vec<String> = trie.search_prefix("", 100).map(|e| e.word).collect();
        let mut deduped = words.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(words.len(), deduped.len());
        assert_eq!(words.len(), 5);
    }

    #[test]
    fn test_remove_floors_at_zero_and_hides_word() {
        let mut trie = PrefixTrie::new();
        trie.insert("helper", id(4));
        trie.remove("helper", id(4));
        assert_eq!(trie.frequency("helper"), 0);
        assert_eq!(trie.search_prefix("help", 10).count(), 0);

        // Removing again must not underflow.
        trie.remove("helper", id(4));
        assert_eq!(trie.frequency("helper"), 0);
    }

    #[test]
    fn test_reinsert_after_removal_revives_word() {
        let mut trie = PrefixTrie::new();
        trie.insert("helper", id(4));
        trie.remove("helper", id(4));
        trie.insert("helper", id(5));

        let entries: Vec<PrefixEntry> = trie.search_prefix("help", 10).collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].frequency, 1);
        assert_eq!(entries[0].symbols, vec![id(5)]);
    }

    #[test]
    fn test_entry_carries_distinct_symbol_ids() {
        let mut trie = PrefixTrie::new();
        trie.insert("run", id(1));
        trie.insert("run", id(1));
        trie.insert("run", id(2));

        let entry = trie.search_prefix("run", 10).next().unwrap();
        assert_eq!(entry.frequency, 3);
        assert_eq!(entry.symbols, vec![id(1), id(2)]);
    }
}
