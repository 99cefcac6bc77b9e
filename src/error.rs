use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InspectorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("The path to file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Parse error in {path} at line {line}: {message}")]
    Parse {
        path: String,
        line: usize,
        message: String,
    },

    #[error("Language error: {0}")]
    Language(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, InspectorError>;
