use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Cause of a per-file extraction failure.
#[derive(Debug, Error)]
pub enum ParseCause {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors raised while building or writing the index.
///
/// `ParseFailure`, `DirectoryMissing` and `DirectoryUnreadable` are contained
/// by the scanner and only show up in reports; the others end the run.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to process {file}: {source}")]
    ParseFailure {
        file: String,
        #[source]
        source: ParseCause,
    },
    #[error("directory not found: {}", path.display())]
    DirectoryMissing { path: PathBuf },
    #[error("cannot read directory {}: {source}", path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no bibles found")]
    EmptyResult,
    #[error("failed to write index to {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for IndexError {
    fn from(err: config::ConfigError) -> Self {
        IndexError::Config(err.to_string())
    }
}

impl From<globset::Error> for IndexError {
    fn from(err: globset::Error) -> Self {
        IndexError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;
