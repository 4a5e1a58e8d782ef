use std::path::PathBuf;
use thiserror::Error;

/// Failures reading the input sales export.
#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("input file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to open '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("'{}' has no header row", path.display())]
    MissingHeader { path: PathBuf },

    #[error("malformed record in '{}': {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("record on line {line} of '{}' has {found} fields, header has {expected}", path.display())]
    TooManyFields {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("column '{column}' appears more than once after normalization")]
    DuplicateColumn { column: String },

    #[error("required column '{column}' not found after normalization")]
    MissingColumn { column: String },
}

/// Failures writing the cleaned export or the JSON summary.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to create output directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to flush '{}': {source}", path.display())]
    Flush {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write summary '{}': {source}", path.display())]
    Summary {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures from the chart rendering collaborator.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("failed to create chart directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render chart '{}': {message}", path.display())]
    Render { path: PathBuf, message: String },
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
