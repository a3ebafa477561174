//! Codebase indexing: per-file parsing, symbol extraction, and index
//! population across a bounded worker pool.
//!
//! Workers parse and extract on private data; shared state is touched only
//! through `SymbolIndex` mutation calls behind the write lock. A single
//! file's failure is recorded and skipped; it never aborts the batch.

pub mod walker;

pub use walker::FileWalker;

use crate::config::Settings;
use crate::error::{IndexError, IndexResult};
use crate::index::SymbolIndex;
use crate::parsing::{Language, LanguageParser, ParserFactory};
use crate::symbol::NewSymbol;
use crate::types::compact_string;
use parking_lot::RwLock;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// A file that could not be indexed, with the reason it was skipped.
#[derive(Debug, Clone)]
pub struct FailedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Aggregate result of an indexing run.
#[derive(Debug, Default)]
pub struct IndexStats {
    pub files_indexed: usize,
    pub symbols_indexed: usize,
    pub failed: Vec<FailedFile>,
    pub elapsed: Duration,
}

/// Orchestrates parsing, extraction, and index updates for whole
/// directories or single files.
pub struct CodebaseIndexer {
    settings: Arc<Settings>,
    index: Arc<RwLock<SymbolIndex>>,
    factory: ParserFactory,
}

type WorkerParsers = HashMap<Language, Box<dyn LanguageParser>>;

impl CodebaseIndexer {
    pub fn new(settings: Arc<Settings>, index: Arc<RwLock<SymbolIndex>>) -> Self {
        let factory = ParserFactory::new(settings.clone());
        Self {
            settings,
            index,
            factory,
        }
    }

    /// Index every enabled-language file under `root`, optionally narrowed
    /// to one language, across a bounded worker pool.
    pub fn index_directory(
        &self,
        root: &Path,
        language_filter: Option<Language>,
    ) -> IndexResult<IndexStats> {
        let started = Instant::now();
        let threads = self.settings.indexing.parallel_threads.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| IndexError::WorkerPool(e.to_string()))?;

        let walker = FileWalker::new(self.settings.clone());
        let files: Vec<(PathBuf, Language)> = walker.walk(root, language_filter).collect();
        debug!(files = files.len(), threads, "starting indexing run");

        let outcomes: Vec<Result<usize, FailedFile>> = pool.install(|| {
            files
                .into_par_iter()
                .map_init(WorkerParsers::new, |parsers, (path, language)| {
                    self.index_one(parsers, &path, language)
                        .map_err(|e| FailedFile {
                            path,
                            reason: e.to_string(),
                        })
                })
                .collect()
        });

        let mut stats = IndexStats {
            elapsed: started.elapsed(),
            ..IndexStats::default()
        };
        for outcome in outcomes {
            match outcome {
                Ok(count) => {
                    stats.files_indexed += 1;
                    stats.symbols_indexed += count;
                }
                Err(failed) => {
                    warn!(path = %failed.path.display(), reason = %failed.reason, "skipped file");
                    stats.failed.push(failed);
                }
            }
        }
        info!(
            files = stats.files_indexed,
            symbols = stats.symbols_indexed,
            failed = stats.failed.len(),
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "indexing run finished"
        );
        Ok(stats)
    }

    /// Incremental single-file update: same pipeline as the batch path.
    pub fn index_file(&self, path: &Path) -> IndexResult<usize> {
        let language = Language::from_path(path)
            .ok_or_else(|| IndexError::UnknownLanguage(path.display().to_string()))?;
        let mut parsers = WorkerParsers::new();
        self.index_one(&mut parsers, path, language)
    }

    /// Parse, extract, and atomically replace one file's contribution.
    /// Re-indexing an unchanged file is idempotent: removal precedes
    /// re-insertion under a single write guard.
    fn index_one(
        &self,
        parsers: &mut WorkerParsers,
        path: &Path,
        language: Language,
    ) -> IndexResult<usize> {
        let metadata = std::fs::metadata(path).map_err(|source| IndexError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let limit = self.settings.indexing.max_file_size;
        if metadata.len() > limit {
            return Err(IndexError::FileTooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                limit,
            });
        }

        let code = std::fs::read_to_string(path).map_err(|source| IndexError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let parser = match parsers.entry(language) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(self.factory.create_parser(language)?)
            }
        };
        let Some(tree) = parser.parse(&code) else {
            return Err(IndexError::ParseFailure {
                path: path.to_path_buf(),
                reason: "parser produced no tree".to_string(),
            });
        };
        let parsed = language.collect_symbols(&tree, &code);
        let count = parsed.len();
        let path_str = path.to_string_lossy();

        let mut index = self.index.write();
        index.remove_file(&path_str);
        let generation = index.next_file_generation(&path_str);
        for symbol in parsed {
            index.add_symbol(NewSymbol {
                name: symbol.name.into(),
                kind: symbol.kind,
                file: compact_string(&path_str),
                scope_path: symbol.scope_path.into_iter().map(Into::into).collect(),
                language,
                range: symbol.range,
                generation,
            });
        }
        drop(index);

        debug!(path = %path.display(), count, generation, "indexed file");
        Ok(count)
    }
}
