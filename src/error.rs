use std::io;
use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// LoaderError
// ---------------------------------------------------------------------------

/// Errors raised while validating or parsing dataset files.
///
/// `MissingFile` and `InvalidExtension` come from [`check`](crate::data::loader::check)
/// and are raised before any parsing starts. The remaining variants wrap the
/// failure reported by the underlying reader, with the offending path (and
/// line, where the reader exposes one) attached.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("File {} not present! Please provide accurate file.", .path.display())]
    MissingFile { path: PathBuf },

    #[error("File {} must be present with extension {expected}", .path.display())]
    InvalidExtension { path: PathBuf, expected: String },

    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}:{line}: {source}", .path.display())]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}:{line}: expected at least {expected} columns, found {found}", .path.display())]
    ShortRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{}:{line}: score '{value}' is not an integer", .path.display())]
    InvalidScore {
        path: PathBuf,
        line: u64,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, LoaderError>;
