//! Python symbol extraction.
//!
//! Declaration rules: `def` and `class` names open new scopes, assignment
//! targets become variables, imports register under the module scope, and
//! identifier occurrences matching the builtin table count as builtin usage.

use crate::parsing::language::Language;
use crate::parsing::parser::{LanguageParser, ParsedSymbol, node_to_range, text_for_node};
use crate::types::SymbolKind;
use tree_sitter::{Node, Parser, Tree};

const NODE_FUNCTION_DEFINITION: &str = "function_definition";
const NODE_CLASS_DEFINITION: &str = "class_definition";
const NODE_ASSIGNMENT: &str = "assignment";
const NODE_IMPORT_STATEMENT: &str = "import_statement";
const NODE_IMPORT_FROM_STATEMENT: &str = "import_from_statement";
const NODE_IDENTIFIER: &str = "identifier";
const NODE_DOTTED_NAME: &str = "dotted_name";
const NODE_ALIASED_IMPORT: &str = "aliased_import";

/// Parser for Python source files.
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    pub fn new() -> Result<Self, String> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| format!("Failed to initialize Python parser: {e}"))?;
        Ok(Self { parser })
    }
}

impl LanguageParser for PythonParser {
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
        Language::Python
    }
}

/// Extract all declarations from a parsed Python tree.
pub(crate) fn collect_symbols(tree: &Tree, code: &str) -> Vec<ParsedSymbol> {
    let mut symbols = Vec::new();
    let mut scope: Vec<String> = Vec::new();
    walk(tree.root_node(), code, &mut scope, &mut symbols);
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

fn walk(node: Node, code: &str, scope: &mut Vec<String>, out: &mut Vec<ParsedSymbol>) {
    match node.kind() {
        NODE_FUNCTION_DEFINITION => {
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
                        walk(child, code, scope, out);
                    }
                }
                scope.pop();
                return;
            }
        }
        NODE_CLASS_DEFINITION => {
            if let Some(name_node) = node.child_by_field_name("name") {
                let name = text_for_node(code, name_node);
                push_symbol(out, name, SymbolKind::Class, scope, node);

                scope.push(name.to_string());
                if let Some(body) = node.child_by_field_name("body") {
                    let mut cursor = body.walk();
                    for child in body.children(&mut cursor) {
                        walk(child, code, scope, out);
                    }
                }
                scope.pop();
                return;
            }
        }
        NODE_ASSIGNMENT => {
            if let Some(left) = node.child_by_field_name("left") {
                if left.kind() == NODE_IDENTIFIER {
                    push_symbol(
                        out,
                        text_for_node(code, left),
                        SymbolKind::Variable,
                        scope,
                        node,
                    );
                }
            }
        }
        NODE_IMPORT_STATEMENT => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                match child.kind() {
                    NODE_DOTTED_NAME => {
                        // Imports are always module-scoped.
                        push_symbol(out, text_for_node(code, child), SymbolKind::Import, &[], child);
                    }
                    NODE_ALIASED_IMPORT => {
                        if let Some(alias) = child.child_by_field_name("alias") {
                            push_symbol(
                                out,
                                text_for_node(code, alias),
                                SymbolKind::Import,
                                &[],
                                child,
                            );
                        }
                    }
                    _ => {}
                }
            }
        }
        NODE_IMPORT_FROM_STATEMENT => {
            if let Some(module) = node.child_by_field_name("module_name") {
                push_symbol(
                    out,
                    text_for_node(code, module),
                    SymbolKind::Import,
                    &[],
                    module,
                );
            }
        }
        NODE_IDENTIFIER => {
            let name = text_for_node(code, node);
            if Language::Python.is_builtin(name) {
                push_symbol(out, name, SymbolKind::Builtin, &[], node);
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, code, scope, out);
    }
}

/// Collect parameter names declared by a `parameters` node.
fn collect_parameters(params: Node, code: &str, scope: &[String], out: &mut Vec<ParsedSymbol>) {
    let mut cursor = params.walk();
    for child in params.named_children(&mut cursor) {
        match child.kind() {
            NODE_IDENTIFIER => {
                push_symbol(out, text_for_node(code, child), SymbolKind::Variable, scope, child);
            }
            "typed_parameter" => {
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
            "default_parameter" | "typed_default_parameter" => {
                if let Some(name) = child.child_by_field_name("name") {
                    push_symbol(
                        out,
                        text_for_node(code, name),
                        SymbolKind::Variable,
                        scope,
                        child,
                    );
                }
            }
            "list_splat_pattern" | "dictionary_splat_pattern" => {
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
            _ => {}
        }
    }
}
