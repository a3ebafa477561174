pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod index;
pub mod indexing;
pub mod parsing;
pub mod ranking;
pub mod symbol;
pub mod trie;
pub mod types;

pub use config::{RankingConfig, Settings};
pub use context::{Context, ContextAnalyzer, prefix_at};
pub use engine::{CompletionEngine, CompletionRequest, CompletionResponse};
pub use error::{IndexError, IndexResult};
pub use index::{Candidate, IndexCounts, SymbolIndex};
pub use indexing::{CodebaseIndexer, FileWalker, IndexStats};
pub use parsing::{Language, LanguageParser, ParserFactory};
pub use ranking::{Suggestion, SuggestionRanker, SuggestionStream};
pub use symbol::{NewSymbol, Symbol};
pub use trie::PrefixTrie;
pub use types::*;
