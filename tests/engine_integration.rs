//! End-to-end tests for the completion engine: index real files from disk,
//! then query through the public facade.

use codesense::{CompletionEngine, CompletionRequest, Language, ScopeKind};
use std::fs;
use tempfile::TempDir;

fn request(code: &str, language: &str, line: u32, column: u16) -> CompletionRequest {
    CompletionRequest {
        code: code.to_string(),
        prefix: None,
        language: language.to_string(),
        cursor_line: line,
        cursor_column: column,
        max_results: 10,
    }
}

#[test]
fn test_index_directory_then_complete() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(
        root.join("calculator.py"),
        r#"
class Calculator:
    def add(self, value):
        self.total = value
        return self.total

def add_all(items):
    return sum(items)
"#,
    )
    .unwrap();
    fs::write(root.join("main.py"), "import os\n\ncounter = 0\n").unwrap();

    let engine = CompletionEngine::with_defaults();
    let stats = engine.index_directory(root, None).unwrap();
    assert_eq!(stats.files_indexed, 2);
    assert!(stats.failed.is_empty());

    // Query from inside a method body of a fresh snippet.
    let code = "class Calculator:\n    def add(self, value):\n        ad\n";
    let response = engine.complete(&request(code, "python", 2, 10));

    assert_eq!(response.context.scope_kind, ScopeKind::Function);
    assert_eq!(response.context.scope_path, vec!["Calculator", "add"]);

    let texts: Vec<&str> = response.suggestions.iter().map(|s| s.text.as_str()).collect();
    assert!(texts.contains(&"add"));
    assert!(texts.contains(&"add_all"));
    assert!(texts.iter().all(|t| t.starts_with("ad")));
}

#[test]
fn test_query_with_no_matches_is_empty_not_error() {
    let engine = CompletionEngine::with_defaults();
    let response = engine.complete(&request("zzqx", "python", 0, 4));
    assert!(response.suggestions.is_empty());
    assert_eq!(response.context.scope_kind, ScopeKind::Module);
}

#[test]
fn test_reindex_modified_file_replaces_contribution() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("module.py");
    fs::write(&path, "def old_handler():\n    pass\n").unwrap();

    let engine = CompletionEngine::with_defaults();
    engine.index_file(&path).unwrap();

    let mut req = request("", "python", 0, 0);
    req.prefix = Some("old_".to_string());
    assert_eq!(engine.complete(&req).suggestions.len(), 1);

    fs::write(&path, "def new_handler():\n    pass\n").unwrap();
    engine.index_file(&path).unwrap();

    assert!(engine.complete(&req).suggestions.is_empty());
    req.prefix = Some("new_".to_string());
    assert_eq!(engine.complete(&req).suggestions.len(), 1);
}

#[test]
fn test_language_filter_narrows_directory_indexing() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("script.py"), "py_only = 1\n").unwrap();
    fs::write(root.join("app.ts"), "const tsOnly = 1;\n").unwrap();

    let engine = CompletionEngine::with_defaults();
    let stats = engine.index_directory(root, Some(Language::Python)).unwrap();
    assert_eq!(stats.files_indexed, 1);

    let mut req = request("", "python", 0, 0);
    req.prefix = Some("py_only".to_string());
    assert_eq!(engine.complete(&req).suggestions.len(), 1);
    req.prefix = Some("tsOnly".to_string());
    assert!(engine.complete(&req).suggestions.is_empty());
}

#[test]
fn test_response_serializes_for_the_service_layer() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("shapes.py");
    fs::write(&path, "def shape_area(radius):\n    return radius\n").unwrap();

    let engine = CompletionEngine::with_defaults();
    engine.index_file(&path).unwrap();

    let mut req = request("", "python", 0, 0);
    req.prefix = Some("shape_".to_string());
    let response = engine.complete(&req);
    let value = serde_json::to_value(&response).unwrap();

    let suggestion = &value["suggestions"][0];
    assert_eq!(suggestion["text"], "shape_area");
    assert_eq!(suggestion["kind"], "function");
    assert!(suggestion["score"].is_number());
    assert!(suggestion["metadata"]["file"].as_str().unwrap().ends_with("shapes.py"));
    assert_eq!(suggestion["metadata"]["scope"], "module");

    assert_eq!(value["context"]["scope_kind"], "module");
    assert!(value["context"]["available_symbols"].is_array());
}

#[test]
fn test_stats_grow_with_indexing() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("grow.py");
    fs::write(&path, "alpha = 1\nbeta = 2\n").unwrap();

    let engine = CompletionEngine::with_defaults();
    let before = engine.stats();
    engine.index_file(&path).unwrap();
    let after = engine.stats();

    assert_eq!(after.files, before.files + 1);
    assert_eq!(after.symbols, before.symbols + 2);
    assert!(after.unique_words >= before.unique_words + 2);
}
