use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the summary pipeline.
#[derive(Error, Debug)]
pub enum SummaryError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file or directory could not be created or written.
    #[error("Failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader or writer failed on the given file.
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A row was readable but did not have the expected shape.
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    /// A timestamp string did not match any recognised format.
    #[error("Invalid timestamp format: {0}")]
    TimestampParse(String),

    /// The JSON profile could not be parsed.
    #[error("Failed to parse profile {path}: {source}")]
    Profile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A chart could not be drawn or encoded.
    #[error("Failed to render chart {path}: {message}")]
    Chart { path: PathBuf, message: String },
}

/// Convenience alias used throughout the summary crates.
pub type Result<T> = std::result::Result<T, SummaryError>;
