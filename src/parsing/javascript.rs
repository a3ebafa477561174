//! JavaScript symbol extraction.
//!
//! The walker here also backs TypeScript: the TypeScript grammar shares all
//! of these node kinds and adds a few declaration forms of its own, handled
//! in the same match (they simply never appear in JavaScript trees).

use crate::parsing::language::Language;
use crate::parsing::parser::{LanguageParser, ParsedSymbol, node_to_range, text_for_node};
use crate::types::SymbolKind;
use tree_sitter::{Node, Parser, Tree};

const NODE_FUNCTION_DECLARATION: &str = "function_declaration";
const NODE_GENERATOR_FUNCTION_DECLARATION: &str = "generator_function_declaration";
const NODE_CLASS_DECLARATION: &str = "class_declaration";
const NODE_METHOD_DEFINITION: &str = "method_definition";
const NODE_VARIABLE_DECLARATOR: &str = "variable_declarator";
const NODE_IMPORT_STATEMENT: &str = "import_statement";
const NODE_IDENTIFIER: &str = "identifier";
// TypeScript-only declaration forms.
const NODE_INTERFACE_DECLARATION: &str = "interface_declaration";
const NODE_ENUM_DECLARATION: &str = "enum_declaration";
const NODE_TYPE_ALIAS_DECLARATION: &str = "type_alias_declaration";

/// Parser for JavaScript source files.
pub struct JavaScriptParser {
    parser: Parser,
}

impl JavaScriptParser {
    pub fn new() -> Result<Self, String> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .map_err(|e| format!("Failed to initialize JavaScript parser: {e}"))?;
        Ok(Self { parser })
    }
}

impl LanguageParser for JavaScriptParser {
    fn parse(&mut self, code: &str) -> Option<Tree> {
        self.parser.parse(code, None)
    }

    fn extract_symbols(&mut self, code: &str) -> Vec<ParsedSymbol> {
        match self.parse(code) {
            Some(tree) => collect_symbols(&tree, code, Language::JavaScript),
            None => Vec::new(),
        }
    }

    fn language(&self) -> Language {
        Language::JavaScript
    }
}

/// Extract all declarations from a parsed JavaScript or TypeScript tree.
pub(crate) fn collect_symbols(tree: &Tree, code: &str, language: Language) -> Vec<ParsedSymbol> {
    let mut symbols = Vec::new();
    let mut scope: Vec<String> = Vec::new();
    walk(tree.root_node(), code, language, &mut scope, &mut symbols);
    symbols
}

fn push_symbol(
    out: &mut Vec<ParsedSymbol>,
    name: &str,
    kind: SymbolKind,
    scope: &[String],
    node: Node,
) {
    if name.is_empty() {
        return;
    }
    out.push(ParsedSymbol {
        name: name.to_string(),
        kind,
        scope_path: scope.to_vec(),
        range: node_to_range(node),
    });
}

fn walk(
    node: Node,
    code: &str,
    language: Language,
    scope: &mut Vec<String>,
    out: &mut Vec<ParsedSymbol>,
) {
    match node.kind() {
        NODE_FUNCTION_DECLARATION | NODE_GENERATOR_FUNCTION_DECLARATION
        | NODE_METHOD_DEFINITION => {
            if let Some(name_node) = node.child_by_field_name("name") {
                let name = text_for_node(code, name_node);
                push_symbol(out, name, SymbolKind::Function, scope, node);

                scope.push(name.to_string());
                if let Some(params) = node.child_by_field_name("parameters") {
                    collect_parameters(params, code, scope, out);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    let mut cursor = body.walk();
                    for child in body.children(&mut cursor) {
                        walk(child, code, language, scope, out);
                    }
                }
                scope.pop();
                return;
            }
        }
        NODE_CLASS_DECLARATION => {
            if let Some(name_node) = node.child_by_field_name("name") {
                let name = text_for_node(code, name_node);
                push_symbol(out, name, SymbolKind::Class, scope, node);

                scope.push(name.to_string());
                if let Some(body) = node.child_by_field_name("body") {
                    let mut cursor = body.walk();
                    for child in body.children(&mut cursor) {
                        walk(child, code, language, scope, out);
                    }
                }
                scope.pop();
                return;
            }
        }
        NODE_INTERFACE_DECLARATION | NODE_ENUM_DECLARATION | NODE_TYPE_ALIAS_DECLARATION => {
            if let Some(name_node) = node.child_by_field_name("name") {
                push_symbol(
                    out,
                    text_for_node(code, name_node),
                    SymbolKind::Class,
                    scope,
                    node,
                );
            }
        }
        NODE_VARIABLE_DECLARATOR => {
            if let Some(name_node) = node.child_by_field_name("name") {
                if name_node.kind() == NODE_IDENTIFIER {
                    push_symbol(
                        out,
                        text_for_node(code, name_node),
                        SymbolKind::Variable,
                        scope,
                        node,
                    );
                }
            }
        }
        NODE_IMPORT_STATEMENT => {
            // Default imports, named imports, and aliases are all identifier
            // descendants of the statement; the source string is not.
            collect_import_names(node, code, out);
            return;
        }
        NODE_IDENTIFIER => {
            let name = text_for_node(code, node);
            if language.is_builtin(name) {
                push_symbol(out, name, SymbolKind::Builtin, &[], node);
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, code, language, scope, out);
    }
}

fn collect_import_names(node: Node, code: &str, out: &mut Vec<ParsedSymbol>) {
    if node.kind() == NODE_IDENTIFIER {
        push_symbol(out, text_for_node(code, node), SymbolKind::Import, &[], node);
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_import_names(child, code, out);
    }
}

/// Collect parameter names from a `formal_parameters` node.
fn collect_parameters(params: Node, code: &str, scope: &[String], out: &mut Vec<ParsedSymbol>) {
    let mut cursor = params.walk();
    for child in params.named_children(&mut cursor) {
        match child.kind() {
            NODE_IDENTIFIER => {
                push_symbol(out, text_for_node(code, child), SymbolKind::Variable, scope, child);
            }
            "assignment_pattern" => {
                if let Some(left) = child.child_by_field_name("left") {
                    if left.kind() == NODE_IDENTIFIER {
                        push_symbol(
                            out,
                            text_for_node(code, left),
                            SymbolKind::Variable,
                            scope,
                            child,
                        );
                    }
                }
            }
            "rest_pattern" => {
                if let Some(inner) = child.named_child(0) {
                    if inner.kind() == NODE_IDENTIFIER {
                        push_symbol(
                            out,
                            text_for_node(code, inner),
                            SymbolKind::Variable,
                            scope,
                            child,
                        );
                    }
                }
            }
            // TypeScript wraps each parameter in required/optional nodes.
            "required_parameter" | "optional_parameter" => {
                if let Some(pattern) = child.child_by_field_name("pattern") {
                    if pattern.kind() == NODE_IDENTIFIER {
                        push_symbol(
                            out,
                            text_for_node(code, pattern),
                            SymbolKind::Variable,
                            scope,
                            child,
                        );
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(code: &str) -> Vec<ParsedSymbol> {
        let mut parser = JavaScriptParser::new().unwrap();
        parser.extract_symbols(code)
    }

    fn find<'a>(symbols: &'a [ParsedSymbol], name: &str) -> &'a ParsedSymbol {
        symbols
            .iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("symbol {name} not extracted"))
    }

    #[test]
    fn test_extract_function_class_and_method() {
        let code = "class Widget {\n  render(props) { return null; }\n}\nfunction helper() {}\n";
        let symbols = extract(code);
        assert_eq!(find(&symbols, "Widget").kind, SymbolKind::Class);
        assert_eq!(find(&symbols, "helper").kind, SymbolKind::Function);

        let method = find(&symbols, "render");
        assert_eq!(method.kind, SymbolKind::Function);
        assert_eq!(method.scope_path, vec!["Widget".to_string()]);

        let param = find(&symbols, "props");
        assert_eq!(param.kind, SymbolKind::Variable);
        assert_eq!(
            param.scope_path,
            vec!["Widget".to_string(), "render".to_string()]
        );
    }

    #[test]
    fn test_extract_variable_declarations() {
        let symbols = extract("const total = 1;\nlet current = 2;\nvar legacy = 3;\n");
        for name in ["total", "current", "legacy"] {
            assert_eq!(find(&symbols, name).kind, SymbolKind::Variable);
        }
    }

    #[test]
    fn test_extract_import_names() {
        let symbols = extract("import fs from 'fs';\nimport { join, resolve as abs } from 'path';\n");
        for name in ["fs", "join", "abs"] {
            let import = find(&symbols, name);
            assert_eq!(import.kind, SymbolKind::Import);
            assert!(import.scope_path.is_empty());
        }
    }

    #[test]
    fn test_builtin_usage_is_recorded() {
        let symbols = extract("console.log(JSON.stringify({}));\n");
        assert_eq!(find(&symbols, "console").kind, SymbolKind::Builtin);
        assert_eq!(find(&symbols, "JSON").kind, SymbolKind::Builtin);
    }

    #[test]
    fn test_default_parameters_and_rest() {
        let symbols = extract("function f(a, b = 2, ...rest) {}\n");
        for name in ["a", "b", "rest"] {
            let param = find(&symbols, name);
            assert_eq!(param.kind, SymbolKind::Variable);
            assert_eq!(param.scope_path, vec!["f".to_string()]);
        }
    }
}
