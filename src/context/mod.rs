//! Cursor context analysis.
//!
//! Maps a cursor position in a syntax tree to the enclosing scope chain and
//! the set of symbol names visible there. Analysis never fails: a missing or
//! truncated tree, or a cursor outside every span, degrades to module scope
//! with builtin-only availability.

use crate::parsing::Language;
use crate::types::ScopeKind;
use serde::Serialize;
use std::collections::BTreeSet;
use tree_sitter::{Node, Point, Tree};

/// Structured description of the location a completion was requested at.
/// Created fresh per query, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Context {
    pub scope_kind: ScopeKind,
    /// Enclosing named constructs, outermost first.
    pub scope_path: Vec<String>,
    /// Symbol names visible at the cursor: declarations in enclosing scopes,
    /// module-level imports, and the language's builtin identifiers.
    pub available_symbols: BTreeSet<String>,
    /// `None` when the query carried an unrecognized language tag; scoring
    /// then degrades to language-agnostic mode.
    pub language: Option<Language>,
    pub cursor_line: u32,
    pub cursor_column: u16,
}

impl Context {
    /// Fallback context when no usable tree is available.
    pub fn module_fallback(language: Language, line: u32, column: u16) -> Self {
        let available_symbols = language
            .builtins()
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self {
            scope_kind: ScopeKind::Module,
            scope_path: Vec::new(),
            available_symbols,
            language: Some(language),
            cursor_line: line,
            cursor_column: column,
        }
    }

    /// Context for a query whose language tag was not recognized: module
    /// scope, no scope rules, no availability.
    pub fn unknown_language(line: u32, column: u16) -> Self {
        Self {
            scope_kind: ScopeKind::Module,
            scope_path: Vec::new(),
            available_symbols: BTreeSet::new(),
            language: None,
            cursor_line: line,
            cursor_column: column,
        }
    }
}

/// Computes a [`Context`] from a cursor position and an externally supplied
/// syntax tree. Language-specific scope rules come from the closed
/// [`Language`] rule tables.
pub struct ContextAnalyzer {
    language: Language,
}

impl ContextAnalyzer {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// Analyze the context at `(line, column)` (0-based).
    pub fn analyze(&self, code: &str, tree: Option<&Tree>, line: u32, column: u16) -> Context {
        let Some(tree) = tree else {
            return Context::module_fallback(self.language, line, column);
        };

        let point = Point {
            row: line as usize,
            column: column as usize,
        };
        let node = tree
            .root_node()
            .descendant_for_point_range(point, point)
            .unwrap_or_else(|| tree.root_node());

        let (scope_kind, scope_path) = self.enclosing_scopes(node, code);
        let available_symbols = self.visible_symbols(tree, code, &scope_path);

        Context {
            scope_kind,
            scope_path,
            available_symbols,
            language: Some(self.language),
            cursor_line: line,
            cursor_column: column,
        }
    }

    /// Walk ancestors collecting scope-introducing nodes. The innermost
    /// scope ancestor determines the kind; named scopes contribute path
    /// segments outermost-first.
    fn enclosing_scopes(&self, node: Node, code: &str) -> (ScopeKind, Vec<String>) {
        let mut kind = ScopeKind::Module;
        let mut kind_found = false;
        let mut path: Vec<String> = Vec::new();

        let mut current = Some(node);
        while let Some(n) = current {
            if let Some(scope_kind) = self.language.scope_kind_of(n.kind()) {
                if !kind_found && scope_kind != ScopeKind::Module {
                    kind = scope_kind;
                    kind_found = true;
                }
                if let Some(name) = self.language.scope_name_of(n, code) {
                    path.push(name.to_string());
                }
            }
            current = n.parent();
        }

        path.reverse();
        (kind, path)
    }

    /// Union of declarations visible from the enclosing scopes plus the
    /// builtin identifier table. A declaration is visible when its scope
    /// path is a prefix of the cursor's scope path (module level included,
    /// its path being empty).
    fn visible_symbols(
        &self,
        tree: &Tree,
        code: &str,
        scope_path: &[String],
    ) -> BTreeSet<String> {
        let mut names: BTreeSet<String> = self
            .language
            .builtins()
            .iter()
            .map(|s| s.to_string())
            .collect();

        for symbol in self.language.collect_symbols(tree, code) {
            let visible = symbol.scope_path.len() <= scope_path.len()
                && symbol
                    .scope_path
                    .iter()
                    .zip(scope_path)
                    .all(|(a, b)| a == b);
            if visible {
                names.insert(symbol.name);
            }
        }
        names
    }
}

/// Extract the identifier prefix being typed at `(line, column)` (0-based,
/// column is the caret position). Returns an empty string when the cursor is
/// outside the text or not after an identifier character.
pub fn prefix_at(code: &str, line: u32, column: u16) -> &str {
    let Some(text) = code.lines().nth(line as usize) else {
        return "";
    };
    let mut caret = (column as usize).min(text.len());
    while !text.is_char_boundary(caret) {
        caret -= 1;
    }
    let head = &text[..caret];
    let start = head
        .char_indices()
        .rev()
        .find(|(_, c)| !c.is_ascii_alphanumeric() && *c != '_')
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    &head[start..]
}
