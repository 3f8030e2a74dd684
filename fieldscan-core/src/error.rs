//! Error types for workbook analysis

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FieldScanError {
    #[error("File '{}' not found", .0.display())]
    InputMissing(PathBuf),

    #[error("Failed to open workbook {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Excel generation error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T> = std::result::Result<T, FieldScanError>;
