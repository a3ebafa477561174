//! Completion engine facade.
//!
//! An explicitly constructed instance owning the symbol index; whatever
//! embeds this crate builds one, indexes directories into it, queries it,
//! and tears it down by dropping it. There is no ambient global state.

use crate::config::Settings;
use crate::context::{Context, ContextAnalyzer, prefix_at};
use crate::error::IndexResult;
use crate::index::{IndexCounts, SymbolIndex};
use crate::indexing::{CodebaseIndexer, IndexStats};
use crate::parsing::{Language, ParserFactory};
use crate::ranking::{Suggestion, SuggestionRanker, SuggestionStream};
use crate::symbol::NewSymbol;
use crate::types::{Range, SymbolKind};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Pseudo-path for language keywords and builtins seeded at construction.
pub const BUILTIN_FILE: &str = "<builtin>";

/// Trie words fetched per query, oversampled so ranking has room to reorder
/// beyond the response size.
const CANDIDATE_OVERSAMPLE: usize = 4;

/// A completion query, as the service layer would deliver it.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionRequest {
    pub code: String,
    /// When absent, the prefix is extracted from `code` at the cursor.
    pub prefix: Option<String>,
    /// Language tag; an unrecognized tag degrades to language-agnostic
    /// scoring instead of failing.
    pub language: String,
    /// 0-based cursor position.
    pub cursor_line: u32,
    pub cursor_column: u16,
    pub max_results: usize,
}

/// Ordered suggestions plus the context they were ranked against.
#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub suggestions: Vec<Suggestion>,
    pub context: Context,
}

/// Code-completion engine over an in-memory symbol index.
pub struct CompletionEngine {
    settings: Arc<Settings>,
    index: Arc<RwLock<SymbolIndex>>,
    indexer: CodebaseIndexer,
    ranker: SuggestionRanker,
    factory: ParserFactory,
}

impl CompletionEngine {
    /// Build an engine and seed each enabled language's keywords and
    /// builtin identifiers under [`BUILTIN_FILE`].
    pub fn new(settings: Settings) -> Self {
        let settings = Arc::new(settings);
        let factory = ParserFactory::new(settings.clone());

        let mut index = SymbolIndex::new();
        for language in factory.enabled_languages() {
            seed_language(&mut index, language);
        }
        let index = Arc::new(RwLock::new(index));

        let indexer = CodebaseIndexer::new(settings.clone(), index.clone());
        let ranker = SuggestionRanker::new(settings.ranking.clone());
        Self {
            settings,
            index,
            indexer,
            ranker,
            factory,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(Settings::default())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Index every supported file under `root`. See
    /// [`CodebaseIndexer::index_directory`].
    pub fn index_directory(
        &self,
        root: &Path,
        language_filter: Option<Language>,
    ) -> IndexResult<IndexStats> {
        self.indexer.index_directory(root, language_filter)
    }

    /// Incrementally (re-)index one file.
    pub fn index_file(&self, path: &Path) -> IndexResult<usize> {
        self.indexer.index_file(path)
    }

    /// Drop a file's contribution from the index.
    pub fn remove_file(&self, path: &Path) -> usize {
        self.index.write().remove_file(&path.to_string_lossy())
    }

    /// Answer a completion query. Never fails: an empty index yields an
    /// empty suggestion list, and the context is always computed from the
    /// submitted snippet alone.
    pub fn complete(&self, request: &CompletionRequest) -> CompletionResponse {
        let (stream, context) = self.suggest(request);
        CompletionResponse {
            suggestions: stream.into_vec(),
            context,
        }
    }

    /// Like [`complete`](Self::complete), but exposes the ordered
    /// suggestions as a lazy stream the consumer may abandon at any point.
    pub fn suggest(&self, request: &CompletionRequest) -> (SuggestionStream, Context) {
        let line = request.cursor_line;
        let column = request.cursor_column;

        let context = match Language::from_tag(&request.language) {
            Some(language) => self.analyze(&request.code, language, line, column),
            None => {
                debug!(tag = %request.language, "unknown language tag, degrading");
                Context::unknown_language(line, column)
            }
        };

        let prefix = match &request.prefix {
            Some(prefix) => prefix.as_str(),
            None => prefix_at(&request.code, line, column),
        };

        let max_results = request.max_results.max(1);
        let candidates =
            self.index
                .read()
                .lookup(prefix, max_results * CANDIDATE_OVERSAMPLE, None);
        let stream = self.ranker.rank(candidates, &context, prefix, max_results);
        (stream, context)
    }

    /// Context analysis on its own, for service layers exposing it directly.
    pub fn analyze_context(&self, code: &str, language_tag: &str, line: u32, column: u16) -> Context {
        match Language::from_tag(language_tag) {
            Some(language) => self.analyze(code, language, line, column),
            None => Context::unknown_language(line, column),
        }
    }

    pub fn stats(&self) -> IndexCounts {
        self.index.read().counts()
    }

    fn analyze(&self, code: &str, language: Language, line: u32, column: u16) -> Context {
        // A fresh parser per query keeps the read path lock-free; parser
        // construction failure degrades to the no-tree fallback.
        let tree = self
            .factory
            .create_parser(language)
            .ok()
            .and_then(|mut parser| parser.parse(code));
        ContextAnalyzer::new(language).analyze(code, tree.as_ref(), line, column)
    }
}

fn seed_language(index: &mut SymbolIndex, language: Language) {
    for name in language.keywords() {
        index.add_symbol(NewSymbol {
            name: (*name).into(),
            kind: SymbolKind::Keyword,
            file: BUILTIN_FILE.into(),
            scope_path: Vec::new(),
            language,
            range: Range::default(),
            generation: 0,
        });
    }
    for name in language.builtins() {
        index.add_symbol(NewSymbol {
            name: (*name).into(),
            kind: SymbolKind::Builtin,
            file: BUILTIN_FILE.into(),
            scope_path: Vec::new(),
            language,
            range: Range::default(),
            generation: 0,
        });
    }
}
