//! Symbol index: trie-backed candidate lookup plus symbol metadata storage
//! with a file-scoped lifecycle.
//!
//! Mutating operations take `&mut self` and are serialized by the engine
//! behind a write lock; lookups take `&self` and run concurrently under read
//! locks. The lookup cache is cleared, and the mutation generation bumped,
//! before any mutating call returns, so the invalidation is visible to every
//! reader that can observe the mutated data.

use crate::parsing::Language;
use crate::symbol::{NewSymbol, Symbol};
use crate::trie::PrefixTrie;
use crate::types::{CompactString, SymbolId};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// A lookup result: the symbol plus the trie frequency of its name at the
/// time of the query.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub symbol: Symbol,
    pub frequency: u32,
}

type CacheKey = (String, Option<Language>, usize);

#[derive(Debug, Default, Serialize)]
pub struct IndexCounts {
    pub files: usize,
    pub unique_words: usize,
    pub symbols: usize,
}

/// Owns the prefix trie, the id→symbol map, and the file→ids registry.
pub struct SymbolIndex {
    trie: PrefixTrie,
    symbols: HashMap<SymbolId, Symbol>,
    file_symbols: HashMap<CompactString, HashSet<SymbolId>>,
    file_generations: HashMap<CompactString, u64>,
    next_id: u32,
    /// Bumped on every mutation; cache entries from an older generation are
    /// never served or stored.
    generation: AtomicU64,
    cache: DashMap<CacheKey, (u64, Vec<Candidate>)>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self {
            trie: PrefixTrie::new(),
            symbols: HashMap::new(),
            file_symbols: HashMap::new(),
            file_generations: HashMap::new(),
            next_id: 1,
            generation: AtomicU64::new(0),
            cache: DashMap::new(),
        }
    }

    /// Add a symbol: assign an id, insert the name into the trie, store the
    /// metadata, and register it under its file.
    pub fn add_symbol(&mut self, new_symbol: NewSymbol) -> SymbolId {
        let id = SymbolId::new(self.next_id).expect("symbol id counter overflowed");
        self.next_id += 1;

        let symbol = new_symbol.into_symbol(id);
        self.trie.insert(&symbol.name, id);
        self.file_symbols
            .entry(symbol.file.clone())
            .or_default()
            .insert(id);
        self.symbols.insert(id, symbol);

        self.invalidate();
        id
    }

    /// Remove every symbol registered under `path`, decrementing trie
    /// frequencies and dropping metadata. Returns how many were removed.
    pub fn remove_file(&mut self, path: &str) -> usize {
        let Some(ids) = self.file_symbols.remove(path) else {
            return 0;
        };
        let count = ids.len();
        for id in ids {
            if let Some(symbol) = self.symbols.remove(&id) {
                self.trie.remove(&symbol.name, id);
            }
        }
        debug!(path, count, "removed file from index");
        self.invalidate();
        count
    }

    /// Next indexing generation for `path`, stamped onto the symbols of the
    /// scan that is about to replace the file's contribution.
    pub fn next_file_generation(&mut self, path: &str) -> u64 {
        let entry = self
            .file_generations
            .entry(path.into())
            .or_insert(0);
        *entry += 1;
        *entry
    }

    /// Candidate lookup for a prefix, bounded by `limit` trie words.
    ///
    /// De-duplicates by symbol id; ordering is left entirely to the ranker.
    /// An unbuilt index simply yields no candidates.
    pub fn lookup(
        &self,
        prefix: &str,
        limit: usize,
        language: Option<Language>,
    ) -> Vec<Candidate> {
        let key = (prefix.to_string(), language, limit);
        let generation = self.generation.load(Ordering::Acquire);

        if let Some(cached) = self.cache.get(&key) {
            let (cached_generation, candidates) = cached.value();
            if *cached_generation == generation {
                return candidates.clone();
            }
        }

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for entry in self.trie.search_prefix(prefix, limit) {
            for id in entry.symbols {
                if !seen.insert(id) {
                    continue;
                }
                let Some(symbol) = self.symbols.get(&id) else {
                    continue;
                };
                if let Some(wanted) = language {
                    if symbol.language != wanted {
                        continue;
                    }
                }
                candidates.push(Candidate {
                    symbol: symbol.clone(),
                    frequency: entry.frequency,
                });
            }
        }

        // Only publish results computed against the current generation.
        if self.generation.load(Ordering::Acquire) == generation {
            self.cache.insert(key, (generation, candidates.clone()));
        }
        candidates
    }

    /// Frequency recorded for an exact word.
    pub fn frequency(&self, name: &str) -> u32 {
        self.trie.frequency(name)
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(&id)
    }

    /// Names of the symbols registered under a file.
    pub fn symbols_in_file(&self, path: &str) -> Vec<&Symbol> {
        self.file_symbols
            .get(path)
            .map(|ids| ids.iter().filter_map(|id| self.symbols.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn counts(&self) -> IndexCounts {
        IndexCounts {
            files: self.file_symbols.len(),
            unique_words: self.trie.len(),
            symbols: self.symbols.len(),
        }
    }

    /// Coarse, whole-cache invalidation on any mutation. Deliberate: the
    /// mutation rate is low relative to reads, and no stale entry may
    /// survive a mutation.
    fn invalidate(&mut self) {
        self.generation.fetch_add(1, Ordering::Release);
        self.cache.clear();
    }
}

impl Default for SymbolIndex {
    fn default() -> Self {
        Self::new()
    }
}
