use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaggerError {
    #[error("Missing required input file")]
    MissingFile,

    #[error("Invalid tag key {0}")]
    InvalidKey(String),

    #[error("Parse error at line {line}, column {column}: {msg}")]
    ParseError {
        msg:    String,
        line:   usize,
        column: usize,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path:   PathBuf,
        source: std::io::Error,
    },

    #[error("Report encode error: {0}")]
    Report(#[from] serde_json::Error),
}
