//! Symbol records stored by the index.

use crate::parsing::Language;
use crate::types::{CompactString, Range, SymbolId, SymbolKind};
use serde::{Deserialize, Serialize};

/// A named program entity extracted from source.
///
/// The `generation` stamp records which indexing pass of the owning file
/// produced the symbol; re-indexing a file replaces its symbols with ones
/// carrying the next generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: CompactString,
    pub kind: SymbolKind,
    /// Path of the file the symbol was extracted from. Builtins and keywords
    /// seeded at engine construction use the pseudo-path `<builtin>`.
    pub file: CompactString,
    /// Enclosing named constructs, outermost first. Empty for module level.
    pub scope_path: Vec<CompactString>,
    pub language: Language,
    pub range: Range,
    pub generation: u64,
}

/// A symbol awaiting an id from the index.
#[derive(Debug, Clone)]
pub struct NewSymbol {
    pub name: CompactString,
    pub kind: SymbolKind,
    pub file: CompactString,
    pub scope_path: Vec<CompactString>,
    pub language: Language,
    pub range: Range,
    pub generation: u64,
}

impl NewSymbol {
    pub(crate) fn into_symbol(self, id: SymbolId) -> Symbol {
        Symbol {
            id,
            name: self.name,
            kind: self.kind,
            file: self.file,
            scope_path: self.scope_path,
            language: self.language,
            range: self.range,
            generation: self.generation,
        }
    }
}

impl Symbol {
    /// Scope path joined with `.`, or `module` when empty. This is the shape
    /// the service layer reports in suggestion metadata.
    pub fn scope_display(&self) -> String {
        if self.scope_path.is_empty() {
            "module".to_string()
        } else {
            self.scope_path.join(".")
        }
    }
}
