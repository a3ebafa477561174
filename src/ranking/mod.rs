//! Suggestion ranking.
//!
//! Turns raw candidates plus a computed [`Context`] into a deterministically
//! ordered, score-annotated suggestion sequence. Every constant lives in
//! [`RankingConfig`]; the scoring function reads only the configuration.
//! Ranking never fails; degenerate inputs (zero frequency, unknown query
//! language) degrade to safe defaults.

use crate::config::RankingConfig;
use crate::context::Context;
use crate::index::Candidate;
use crate::types::SymbolKind;
use serde::Serialize;

/// A ranked completion suggestion, shaped for the service layer.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Suggestion {
    pub text: String,
    pub kind: SymbolKind,
    pub score: f64,
    pub metadata: SuggestionMetadata,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SuggestionMetadata {
    pub file: String,
    pub scope: String,
}

/// Finite, lazy, ordered sequence of suggestions.
///
/// A consumer may stop drawing at any point; dropping the stream is
/// cancellation and has no side effects. No suggestion is emitted twice.
pub struct SuggestionStream {
    inner: std::vec::IntoIter<Suggestion>,
}

impl SuggestionStream {
    pub fn into_vec(self) -> Vec<Suggestion> {
        self.inner.collect()
    }
}

impl Iterator for SuggestionStream {
    type Item = Suggestion;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for SuggestionStream {}

/// Ranks candidates by frequency, symbol kind, and lexical/scope context.
pub struct SuggestionRanker {
    config: RankingConfig,
}

impl SuggestionRanker {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Score all candidates against the context, order them, and expose the
    /// result as a stream truncated to `max_results`.
    pub fn rank(
        &self,
        candidates: Vec<Candidate>,
        context: &Context,
        prefix: &str,
        max_results: usize,
    ) -> SuggestionStream {
        let mut scored: Vec<(f64, Suggestion)> = candidates
            .into_iter()
            .map(|candidate| {
                let score = self.score(&candidate, context, prefix);
                let suggestion = Suggestion {
                    text: candidate.symbol.name.to_string(),
                    kind: candidate.symbol.kind,
                    score,
                    metadata: SuggestionMetadata {
                        file: candidate.symbol.file.to_string(),
                        scope: candidate.symbol.scope_display(),
                    },
                };
                (score, suggestion)
            })
            .collect();

        // Deterministic order: score descending, then kind priority, then
        // name. Scores are finite by construction, so total_cmp is exact.
        scored.sort_by(|(a_score, a), (b_score, b)| {
            b_score
                .total_cmp(a_score)
                .then_with(|| a.kind.priority().cmp(&b.kind.priority()))
                .then_with(|| a.text.cmp(&b.text))
        });
        scored.truncate(max_results);

        SuggestionStream {
            inner: scored
                .into_iter()
                .map(|(_, suggestion)| suggestion)
                .collect::<Vec<_>>()
                .into_iter(),
        }
    }

    /// The scoring pipeline. Additive signals on top of a frequency-derived,
    /// kind-weighted base; the cross-language penalty multiplies last.
    pub fn score(&self, candidate: &Candidate, context: &Context, prefix: &str) -> f64 {
        let cfg = &self.config;
        let symbol = &candidate.symbol;
        let name: &str = &symbol.name;
        let frequency = f64::from(candidate.frequency);

        let base = (frequency / 100.0).min(1.0);
        let typed = base * self.weight_for(symbol.kind);

        let prefix_bonus = if symbol.kind == SymbolKind::Keyword {
            if name == prefix {
                cfg.exact_keyword_bonus
            } else if name.starts_with(prefix) {
                cfg.keyword_prefix_bonus
            } else {
                0.0
            }
        } else {
            0.0
        };

        let in_scope = symbol.scope_path.len() <= context.scope_path.len()
            && symbol
                .scope_path
                .iter()
                .zip(&context.scope_path)
                .all(|(a, b)| **a == **b);
        let scope_bonus = if in_scope { cfg.scope_bonus } else { 0.0 };

        let avail_bonus = if context.available_symbols.contains(name) {
            cfg.availability_bonus
        } else {
            0.0
        };

        let freq_bonus = (frequency * cfg.frequency_coefficient).min(cfg.frequency_bonus_cap);

        let mut score = typed + prefix_bonus + scope_bonus + avail_bonus + freq_bonus;

        // Applied last. An unrecognized query language penalizes every
        // candidate uniformly (flat, language-agnostic mode).
        match context.language {
            Some(lang) if lang == symbol.language => {}
            _ => score *= cfg.language_penalty,
        }
        score
    }

    fn weight_for(&self, kind: SymbolKind) -> f64 {
        let cfg = &self.config;
        match kind {
            SymbolKind::Keyword => cfg.keyword_weight,
            SymbolKind::Builtin => cfg.builtin_weight,
            SymbolKind::Function => cfg.function_weight,
            SymbolKind::Class => cfg.class_weight,
            SymbolKind::Variable => cfg.variable_weight,
            SymbolKind::Import => cfg.import_weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::Language;
    use crate::symbol::{NewSymbol, Symbol};
    use crate::types::{Range, SymbolId};

    fn symbol(name: &str, kind: SymbolKind, language: Language, id: u32) -> Symbol {
        NewSymbol {
            name: name.into(),
            kind,
            file: "test.py".into(),
            scope_path: Vec::new(),
            language,
            range: Range::default(),
            generation: 1,
        }
        .into_symbol(SymbolId::new(id).unwrap())
    }

    fn candidate(name: &str, kind: SymbolKind, language: Language, frequency: u32) -> Candidate {
        Candidate {
            symbol: symbol(name, kind, language, 1),
            frequency,
        }
    }

    fn python_context() -> Context {
        Context::module_fallback(Language::Python, 0, 0)
    }

    #[test]
    fn test_base_score_is_frequency_over_hundred_capped() {
        let ranker = SuggestionRanker::new(RankingConfig::default());
        let context = Context::unknown_language(0, 0);
        for (freq, expected_base) in [(0, 0.0), (1, 0.01), (99, 0.99), (100, 1.0), (500, 1.0)] {
            let c = candidate("name", SymbolKind::Variable, Language::Python, freq);
            let cfg = ranker.config();
            // Reconstruct the expected additive score in agnostic mode:
            // scope bonus applies (empty path), no availability.
            let expected = (expected_base * cfg.variable_weight
                + cfg.scope_bonus
                + (f64::from(freq) * cfg.frequency_coefficient).min(cfg.frequency_bonus_cap))
                * cfg.language_penalty;
            let got = ranker.score(&c, &context, "na");
            assert!(
                (got - expected).abs() < 1e-9,
                "freq {freq}: got {got}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_keyword_exact_match_outranks_prefix_match() {
        let ranker = SuggestionRanker::new(RankingConfig::default());
        let context = python_context();
        let exact = candidate("for", SymbolKind::Keyword, Language::Python, 1);
        let partial = candidate("format", SymbolKind::Keyword, Language::Python, 1);

        let exact_score = ranker.score(&exact, &context, "for");
        let partial_score = ranker.score(&partial, &context, "for");
        assert!(exact_score > partial_score);
    }

    #[test]
    fn test_availability_and_scope_bonuses_stack() {
        let config = RankingConfig::default();
        let ranker = SuggestionRanker::new(config.clone());
        let mut context = python_context();
        context.available_symbols.insert("visible".to_string());

        let visible = candidate("visible", SymbolKind::Variable, Language::Python, 1);
        let hidden = candidate("hidden_x", SymbolKind::Variable, Language::Python, 1);

        let diff = ranker.score(&visible, &context, "vi") - ranker.score(&hidden, &context, "hi");
        assert!((diff - config.availability_bonus).abs() < 1e-9);
    }

    #[test]
    fn test_scope_mismatch_gets_no_scope_bonus() {
        let ranker = SuggestionRanker::new(RankingConfig::default());
        let context = python_context(); // module scope, empty path

        let mut nested = candidate("inner_fn", SymbolKind::Function, Language::Python, 1);
        nested.symbol.scope_path = vec!["deep".into()];
        let top = candidate("top_fn", SymbolKind::Function, Language::Python, 1);

        assert!(ranker.score(&top, &context, "t") > ranker.score(&nested, &context, "i"));
    }

    #[test]
    fn test_cross_language_penalty_applies_last() {
        let config = RankingConfig::default();
        let ranker = SuggestionRanker::new(config.clone());
        let context = python_context();

        let same = candidate("handler", SymbolKind::Function, Language::Python, 50);
        let mut other = same.clone();
        other.symbol.language = Language::TypeScript;

        let same_score = ranker.score(&same, &context, "hand");
        let other_score = ranker.score(&other, &context, "hand");
        assert!((other_score - same_score * config.language_penalty).abs() < 1e-9);
    }

    #[test]
    fn test_private_outranks_print_with_availability() {
        // Scenario fixed by the constant table: "print" (builtin) inserted
        // three times, "private" (variable) once, prefix "pri", python
        // context with "private" available.
        let config = RankingConfig::default();
        let ranker = SuggestionRanker::new(config.clone());
        let mut context = python_context();
        context.available_symbols.insert("private".to_string());
        context.available_symbols.remove("print");

        let print_c = candidate("print", SymbolKind::Builtin, Language::Python, 3);
        let private_c = candidate("private", SymbolKind::Variable, Language::Python, 1);

        let print_score = ranker.score(&print_c, &context, "pri");
        let private_score = ranker.score(&private_c, &context, "pri");

        // Both sit at module scope; availability is the deciding signal.
        let expected_print = 0.03 * config.builtin_weight + config.scope_bonus + 0.03 * 1.0;
        let expected_private = 0.01 * config.variable_weight
            + config.scope_bonus
            + config.availability_bonus
            + 0.01 * 1.0;
        assert!((print_score - expected_print).abs() < 1e-9);
        assert!((private_score - expected_private).abs() < 1e-9);
        assert!(private_score > print_score);
    }

    #[test]
    fn test_rank_is_deterministic_and_ordered() {
        let ranker = SuggestionRanker::new(RankingConfig::default());
        let context = python_context();
        let make = || {
            vec![
                candidate("beta", SymbolKind::Variable, Language::Python, 5),
                candidate("alpha", SymbolKind::Variable, Language::Python, 5),
                candidate("gamma", SymbolKind::Function, Language::Python, 5),
            ]
        };

        let first: Vec<Suggestion> = ranker.rank(make(), &context, "", 10).collect();
        let second: Vec<Suggestion> = ranker.rank(make(), &context, "", 10).collect();
        assert_eq!(first, second);

        for pair in first.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        // Same score, same kind: lexicographic tie-break.
        let names: Vec<&str> = first
            .iter()
            .filter(|s| s.kind == SymbolKind::Variable)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_stream_truncates_and_never_repeats() {
        let ranker = SuggestionRanker::new(RankingConfig::default());
        let context = python_context();
        let candidates: Vec<Candidate> = (0..20)
            .map(|i| {
                Candidate {
                    symbol: symbol(&format!("name_{i:02}"), SymbolKind::Variable, Language::Python, i + 1),
                    frequency: 1,
                }
            })
            .collect();

        let stream = ranker.rank(candidates, &context, "name", 5);
        let texts: Vec<String> = stream.map(|s| s.text).collect();
        assert_eq!(texts.len(), 5);
        let mut unique = texts.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn test_partial_consumption_is_cancellation() {
        let ranker = SuggestionRanker::new(RankingConfig::default());
        let context = python_context();
        let candidates = vec![
            candidate("one", SymbolKind::Variable, Language::Python, 1),
            candidate("two", SymbolKind::Variable, Language::Python, 1),
        ];
        let mut stream = ranker.rank(candidates, &context, "", 10);
        let _first = stream.next();
        drop(stream); // no side effects to undo
    }
}
