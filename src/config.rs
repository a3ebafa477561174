//! Layered configuration for the completion engine.
//!
//! Values resolve in order: built-in defaults, then `codesense.toml` in the
//! working directory, then environment variables prefixed with `CODESENSE_`
//! (double underscore separates nesting levels):
//!
//! - `CODESENSE_INDEXING__PARALLEL_THREADS=8` sets `indexing.parallel_threads`
//! - `CODESENSE_RANKING__LANGUAGE_PENALTY=0.2` sets `ranking.language_penalty`
//! - `CODESENSE_LANGUAGES__PYTHON__ENABLED=false` disables Python indexing

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Indexing configuration
    #[serde(default)]
    pub indexing: IndexingConfig,

    /// Language-specific settings, keyed by language name
    #[serde(default = "default_languages")]
    pub languages: HashMap<String, LanguageConfig>,

    /// Ranking weights and bonuses
    #[serde(default)]
    pub ranking: RankingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IndexingConfig {
    /// Number of parallel worker threads for directory indexing
    #[serde(default = "default_parallel_threads")]
    pub parallel_threads: usize,

    /// Glob patterns excluded from directory walks, on top of gitignore rules
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// Files larger than this many bytes are skipped and recorded as failures
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LanguageConfig {
    /// Whether this language is indexed
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Scoring constants for [`SuggestionRanker`](crate::ranking::SuggestionRanker).
///
/// These are recognized tuning knobs, not hard-wired algorithm pieces: the
/// ranker reads every constant from here.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RankingConfig {
    /// Type weights applied to the frequency-derived base score
    #[serde(default = "default_keyword_weight")]
    pub keyword_weight: f64,
    #[serde(default = "default_builtin_weight")]
    pub builtin_weight: f64,
    #[serde(default = "default_function_weight")]
    pub function_weight: f64,
    #[serde(default = "default_class_weight")]
    pub class_weight: f64,
    #[serde(default = "default_variable_weight")]
    pub variable_weight: f64,
    #[serde(default = "default_import_weight")]
    pub import_weight: f64,
    /// Fallback weight for kinds without a dedicated entry
    #[serde(default = "default_generic_weight")]
    pub generic_weight: f64,

    /// Bonus when a keyword equals the typed prefix exactly
    #[serde(default = "default_exact_keyword_bonus")]
    pub exact_keyword_bonus: f64,
    /// Bonus when a keyword starts with the typed prefix
    #[serde(default = "default_keyword_prefix_bonus")]
    pub keyword_prefix_bonus: f64,

    /// Bonus when the symbol's scope path prefixes the query scope path
    #[serde(default = "default_scope_bonus")]
    pub scope_bonus: f64,
    /// Bonus when the symbol name is visible at the cursor; stacks with scope
    #[serde(default = "default_availability_bonus")]
    pub availability_bonus: f64,

    /// Cap on the linear frequency bonus
    #[serde(default = "default_frequency_bonus_cap")]
    pub frequency_bonus_cap: f64,
    /// Per-occurrence coefficient for the frequency bonus
    #[serde(default = "default_frequency_coefficient")]
    pub frequency_coefficient: f64,

    /// Multiplier applied last when the symbol's language differs from the
    /// query language
    #[serde(default = "default_language_penalty")]
    pub language_penalty: f64,
}

// Default value functions
fn default_parallel_threads() -> usize {
    num_cpus::get()
}
fn default_max_file_size() -> u64 {
    1_000_000
}
fn default_true() -> bool {
    true
}
fn default_ignore_patterns() -> Vec<String> {
    vec![
        "node_modules/**".to_string(),
        "__pycache__/**".to_string(),
        "dist/**".to_string(),
        "build/**".to_string(),
        "venv/**".to_string(),
    ]
}
fn default_keyword_weight() -> f64 {
    1.5
}
fn default_builtin_weight() -> f64 {
    1.4
}
fn default_function_weight() -> f64 {
    1.1
}
fn default_class_weight() -> f64 {
    1.1
}
fn default_variable_weight() -> f64 {
    1.0
}
fn default_import_weight() -> f64 {
    0.9
}
fn default_generic_weight() -> f64 {
    0.8
}
fn default_exact_keyword_bonus() -> f64 {
    1.5
}
fn default_keyword_prefix_bonus() -> f64 {
    0.75
}
fn default_scope_bonus() -> f64 {
    0.5
}
fn default_availability_bonus() -> f64 {
    0.4
}
fn default_frequency_bonus_cap() -> f64 {
    0.5
}
fn default_frequency_coefficient() -> f64 {
    0.01
}
fn default_language_penalty() -> f64 {
    0.1
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            parallel_threads: default_parallel_threads(),
            ignore_patterns: default_ignore_patterns(),
            max_file_size: default_max_file_size(),
        }
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            keyword_weight: default_keyword_weight(),
            builtin_weight: default_builtin_weight(),
            function_weight: default_function_weight(),
            class_weight: default_class_weight(),
            variable_weight: default_variable_weight(),
            import_weight: default_import_weight(),
            generic_weight: default_generic_weight(),
            exact_keyword_bonus: default_exact_keyword_bonus(),
            keyword_prefix_bonus: default_keyword_prefix_bonus(),
            scope_bonus: default_scope_bonus(),
            availability_bonus: default_availability_bonus(),
            frequency_bonus_cap: default_frequency_bonus_cap(),
            frequency_coefficient: default_frequency_coefficient(),
            language_penalty: default_language_penalty(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            indexing: IndexingConfig::default(),
            languages: default_languages(),
            ranking: RankingConfig::default(),
        }
    }
}

fn default_languages() -> HashMap<String, LanguageConfig> {
    let mut langs = HashMap::new();
    langs.insert("python".to_string(), LanguageConfig { enabled: true });
    langs.insert("javascript".to_string(), LanguageConfig { enabled: true });
    langs.insert("typescript".to_string(), LanguageConfig { enabled: true });
    langs
}

impl Settings {
    /// Load configuration from defaults, `codesense.toml`, and environment.
    pub fn load() -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file("codesense.toml"))
            .merge(Env::prefixed("CODESENSE_").map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(Box::new)
    }

    /// Whether a language is enabled; languages absent from the map default
    /// to enabled.
    pub fn language_enabled(&self, name: &str) -> bool {
        self.languages.get(name).map(|c| c.enabled).unwrap_or(true)
    }
}
