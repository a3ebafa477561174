pub mod factory;
pub mod javascript;
pub mod language;
pub mod parser;
pub mod python;
pub mod typescript;

pub use factory::ParserFactory;
pub use javascript::JavaScriptParser;
pub use language::Language;
pub use parser::{LanguageParser, ParsedSymbol};
pub use python::PythonParser;
pub use typescript::TypeScriptParser;
