//! The closed set of supported languages and their rule tables.
//!
//! The supported set is fixed and small, so language-specific behavior is
//! dispatched through exhaustive matches on this enum rather than trait
//! objects. Adding a language means adding one arm to each table.

use crate::parsing::parser::ParsedSymbol;
use crate::types::ScopeKind;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tree_sitter::{Node, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
        }
    }

    /// Key used in the `languages` section of the settings file.
    pub fn config_key(&self) -> &'static str {
        self.as_str()
    }

    /// Parse a language tag as supplied by the embedding application.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "python" | "py" => Some(Language::Python),
            "javascript" | "js" => Some(Language::JavaScript),
            "typescript" | "ts" => Some(Language::TypeScript),
            _ => None,
        }
    }

    /// Detect a language from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "py" | "pyi" => Some(Language::Python),
            "js" | "jsx" | "mjs" => Some(Language::JavaScript),
            "ts" | "tsx" => Some(Language::TypeScript),
            _ => None,
        }
    }

    pub fn all() -> [Language; 3] {
        [Language::Python, Language::JavaScript, Language::TypeScript]
    }

    /// Reserved words seeded into the index and boosted by the ranker.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &[
                "def", "class", "return", "if", "elif", "else", "for", "while",
                "try", "except", "finally", "with", "as", "import", "from",
                "pass", "break", "continue", "yield", "lambda", "raise",
                "global", "nonlocal", "assert", "del", "not", "and", "or",
                "in", "is", "None", "True", "False",
            ],
            Language::JavaScript => &[
                "function", "class", "return", "if", "else", "for", "while",
                "try", "catch", "finally", "import", "from", "export", "const",
                "let", "var", "async", "await", "new", "this", "typeof",
                "instanceof", "switch", "case", "default", "break", "continue",
                "throw", "yield", "delete", "void", "null", "undefined",
                "true", "false",
            ],
            Language::TypeScript => &[
                "function", "class", "return", "if", "else", "for", "while",
                "try", "catch", "finally", "import", "from", "export", "const",
                "let", "var", "async", "await", "new", "this", "typeof",
                "instanceof", "switch", "case", "default", "break", "continue",
                "throw", "yield", "interface", "type", "enum", "implements",
                "extends", "readonly", "public", "private", "protected",
                "namespace", "declare", "abstract", "null", "undefined",
                "true", "false",
            ],
        }
    }

    /// Built-in identifiers recognized in source and seeded into the index.
    pub fn builtins(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &[
                "print", "len", "range", "str", "int", "float", "list", "dict",
                "set", "tuple", "enumerate", "zip", "map", "filter", "sorted",
                "max", "min", "sum", "abs", "round", "type", "isinstance",
                "hasattr", "getattr", "setattr", "open", "input", "repr",
                "format", "bool", "bytes", "super", "object", "Exception",
            ],
            Language::JavaScript | Language::TypeScript => &[
                "console", "window", "document", "Array", "Object", "String",
                "Number", "Boolean", "Date", "Math", "JSON", "Promise", "Set",
                "Map", "WeakSet", "WeakMap", "Symbol", "Proxy", "Reflect",
                "Error", "TypeError", "RangeError", "parseInt", "parseFloat",
                "isNaN", "isFinite", "encodeURIComponent", "decodeURIComponent",
            ],
        }
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtins().contains(&name)
    }

    pub fn is_keyword(&self, name: &str) -> bool {
        self.keywords().contains(&name)
    }

    /// Map a syntax node kind to the scope it introduces, if any.
    ///
    /// Python scoping has no block scopes; JavaScript and TypeScript treat
    /// statement blocks as block scopes (`let`/`const` semantics).
    pub fn scope_kind_of(&self, node_kind: &str) -> Option<ScopeKind> {
        match self {
            Language::Python => match node_kind {
                "module" => Some(ScopeKind::Module),
                "class_definition" => Some(ScopeKind::Class),
                "function_definition" => Some(ScopeKind::Function),
                _ => None,
            },
            Language::JavaScript | Language::TypeScript => match node_kind {
                "program" => Some(ScopeKind::Module),
                "class_declaration" => Some(ScopeKind::Class),
                "function_declaration" | "method_definition" | "arrow_function"
                | "function_expression" | "generator_function_declaration" => {
                    Some(ScopeKind::Function)
                }
                "statement_block" => Some(ScopeKind::Block),
                _ => None,
            },
        }
    }

    /// Name of a scope-introducing node, when the construct is named.
    /// Anonymous scopes (blocks, arrow functions) contribute their kind to
    /// the context but no segment to the scope path.
    pub fn scope_name_of<'a>(&self, node: Node, code: &'a str) -> Option<&'a str> {
        let name = node.child_by_field_name("name")?;
        Some(super::parser::text_for_node(code, name))
    }

    /// Extract every declaration in a tree using this language's rules.
    pub fn collect_symbols(&self, tree: &Tree, code: &str) -> Vec<ParsedSymbol> {
        match self {
            Language::Python => super::python::collect_symbols(tree, code),
            Language::JavaScript => super::javascript::collect_symbols(tree, code, *self),
            Language::TypeScript => super::typescript::collect_symbols(tree, code),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
