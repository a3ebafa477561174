//! Directory traversal for discovering source files to index.
//!
//! Respects gitignore rules and the configured ignore patterns, filters to
//! enabled languages by extension.

use crate::config::Settings;
use crate::parsing::Language;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

/// Walks directories to find source files to index.
pub struct FileWalker {
    settings: Arc<Settings>,
}

impl FileWalker {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Walk `root` and yield files whose language is enabled and, when a
    /// filter is given, matches it.
    pub fn walk(
        &self,
        root: &Path,
        language_filter: Option<Language>,
    ) -> impl Iterator<Item = (PathBuf, Language)> + use<> {
        let mut builder = WalkBuilder::new(root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .require_git(false);

        let mut override_builder = ignore::overrides::OverrideBuilder::new(root);
        for pattern in &self.settings.indexing.ignore_patterns {
            // Exclusion patterns are prefixed with ! in override syntax.
            if let Err(e) = override_builder.add(&format!("!{pattern}")) {
                warn!(pattern = %pattern, error = %e, "invalid ignore pattern");
            }
        }
        if let Ok(overrides) = override_builder.build() {
            builder.overrides(overrides);
        }

        let enabled = self.enabled_languages();
        builder
            .build()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .filter_map(move |entry| {
                let path = entry.path();
                let language = Language::from_path(path)?;
                if !enabled.contains(&language) {
                    return None;
                }
                if let Some(wanted) = language_filter {
                    if language != wanted {
                        return None;
                    }
                }
                Some((path.to_path_buf(), language))
            })
    }

    fn enabled_languages(&self) -> Vec<Language> {
        Language::all()
            .into_iter()
            .filter(|lang| self.settings.language_enabled(lang.config_key()))
            .collect()
    }
}
