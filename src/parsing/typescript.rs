//! TypeScript symbol extraction.
//!
//! TypeScript trees reuse the JavaScript walker; the TS-only declaration
//! forms (interfaces, enums, type aliases) are already part of its match.

use crate::parsing::javascript;
use crate::parsing::language::Language;
use crate::parsing::parser::{LanguageParser, ParsedSymbol};
use tree_sitter::{Parser, Tree};

/// Parser for TypeScript source files (`.ts`; `.tsx` uses the TSX grammar).
pub struct TypeScriptParser {
    parser: Parser,
}

impl TypeScriptParser {
    pub fn new() -> Result<Self, String> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .map_err(|e| format!("Failed to initialize TypeScript parser: {e}"))?;
        Ok(Self { parser })
    }
}

impl LanguageParser for TypeScriptParser {
    fn parse(&mut self, code: &str) -> Option<Tree> {
        self.parser.parse(code, None)
    }

    fn extract_symbols(&mut self, code: &str) -> Vec<ParsedSymbol> {
        match self.parse(code) {
            Some(tree) => collect_symbols(&tree, code),
            None => Vec::new(),
        }
    }

    fn language(&self) -> Language {
        Language::TypeScript
    }
}

pub(crate) fn collect_symbols(tree: &Tree, code: &str) -> Vec<ParsedSymbol> {
    javascript::collect_symbols(tree, code, Language::TypeScript)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SymbolKind;

    fn extract(code: &str) -> Vec<ParsedSymbol> {
        let mut parser = TypeScriptParser::new().unwrap();
        parser.extract_symbols(code)
    }

    fn find<'a>(symbols: &'a [ParsedSymbol], name: &str) -> &'a ParsedSymbol {
        symbols
            .iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("symbol {name} not extracted"))
    }

    #[test]
    fn test_extract_interface_enum_and_alias() {
        let code = "interface Shape { area(): number }\nenum Color { Red }\ntype Id = string;\n";
        let symbols = extract(code);
        assert_eq!(find(&symbols, "Shape").kind, SymbolKind::Class);
        assert_eq!(find(&symbols, "Color").kind, SymbolKind::Class);
        assert_eq!(find(&symbols, "Id").kind, SymbolKind::Class);
    }

    #[test]
    fn test_typed_parameters() {
        let symbols = extract("function area(width: number, height?: number) { return 0; }\n");
        for name in ["width", "height"] {
            let param = find(&symbols, name);
            assert_eq!(param.kind, SymbolKind::Variable);
            assert_eq!(param.scope_path, vec!["area".to_string()]);
        }
    }

    #[test]
    fn test_class_with_typed_method() {
        let code = "class Store {\n  get(key: string): string { return key; }\n}\n";
        let symbols = extract(code);
        let method = find(&symbols, "get");
        assert_eq!(method.kind, SymbolKind::Function);
        assert_eq!(method.scope_path, vec!["Store".to_string()]);
    }
}
