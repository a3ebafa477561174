//! Parser factory for creating language-specific parsers.

use super::{JavaScriptParser, Language, LanguageParser, PythonParser, TypeScriptParser};
use crate::config::Settings;
use crate::error::{IndexError, IndexResult};
use std::sync::Arc;

fn init<P>(language: Language, result: Result<P, String>) -> IndexResult<P> {
    result.map_err(|reason| IndexError::ParserInit {
        language: language.to_string(),
        reason,
    })
}

/// Creates language parsers, honoring per-language enablement in settings.
pub struct ParserFactory {
    settings: Arc<Settings>,
}

impl ParserFactory {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Create a parser for the specified language.
    pub fn create_parser(&self, language: Language) -> IndexResult<Box<dyn LanguageParser>> {
        if !self.is_language_enabled(language) {
            return Err(IndexError::UnknownLanguage(format!(
                "{} is disabled in configuration",
                language
            )));
        }

        let parser: Box<dyn LanguageParser> = match language {
            Language::Python => Box::new(init(language, PythonParser::new())?),
            Language::JavaScript => Box::new(init(language, JavaScriptParser::new())?),
            Language::TypeScript => Box::new(init(language, TypeScriptParser::new())?),
        };
        Ok(parser)
    }

    pub fn is_language_enabled(&self, language: Language) -> bool {
        self.settings.language_enabled(language.config_key())
    }

    /// All languages currently enabled in settings.
    pub fn enabled_languages(&self) -> Vec<Language> {
        Language::all()
            .into_iter()
            .filter(|&lang| self.is_language_enabled(lang))
            .collect()
    }
}
