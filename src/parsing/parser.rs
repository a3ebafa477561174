//! Language parser interface.
//!
//! Each supported language provides a tree-sitter backed implementation.
//! The core never parses text itself: it only asks for a syntax tree and a
//! flat list of declarations extracted from it.

use crate::parsing::Language;
use crate::types::{Range, SymbolKind};
use tree_sitter::{Node, Tree};

/// A declaration extracted from a syntax tree, before the index assigns it
/// an id and stamps file, language, and generation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSymbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Enclosing named constructs, outermost first. Empty at module level.
    pub scope_path: Vec<String>,
    pub range: Range,
}

/// Common interface for all language parsers.
pub trait LanguageParser: Send {
    /// Parse source code into a syntax tree. `None` when the parser cannot
    /// produce a tree at all (callers degrade, they do not fail).
    fn parse(&mut self, code: &str) -> Option<Tree>;

    /// Parse and extract every declaration the language rules recognize.
    fn extract_symbols(&mut self, code: &str) -> Vec<ParsedSymbol>;

    /// The language this parser handles.
    fn language(&self) -> Language;
}

/// Convert a tree-sitter node span into a [`Range`].
pub(crate) fn node_to_range(node: Node) -> Range {
    let start = node.start_position();
    let end = node.end_position();
    Range {
        start_line: start.row as u32,
        start_column: start.column as u16,
        end_line: end.row as u32,
        end_column: end.column as u16,
    }
}

/// Raw source text for a node.
pub(crate) fn text_for_node<'a>(code: &'a str, node: Node) -> &'a str {
    &code[node.byte_range()]
}
