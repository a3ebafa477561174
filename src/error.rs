use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Parse failure in {}: {reason}", .path.display())]
    ParseFailure { path: PathBuf, reason: String },

    #[error("Failed to initialize {language} parser: {reason}")]
    ParserInit { language: String, reason: String },

    #[error("Failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File too large: {} ({size} bytes, limit {limit})", .path.display())]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(String),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

pub type IndexResult<T> = Result<T, IndexError>;
