use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LayoutError>;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid CSV header: {0}")]
    CsvHeader(String),

    #[error("Invalid CSV row {row}: expected at least 2 columns, got {got}")]
    CsvRow { row: usize, got: usize },

    #[error("Invalid relevance at row {row}: {value}")]
    RelevanceParse { row: usize, value: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to create output directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create file '{path}': {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scene: {message}")]
    InvalidScene { message: String },

    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("{phase} search exceeded its time budget of {budget_ms} ms")]
    SearchTimeout { phase: &'static str, budget_ms: u64 },

    #[error("Invalid layout: {message}")]
    InvalidLayout { message: String },
}

impl From<toml::de::Error> for LayoutError {
    fn from(err: toml::de::Error) -> Self {
        LayoutError::Config(format!("TOML parse error: {}", err))
    }
}
