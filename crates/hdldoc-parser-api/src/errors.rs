use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting documentation from a file
///
/// Malformed source text is never an error: parsers degrade to a
/// best-effort (possibly empty) result instead.
#[derive(Error, Debug)]
pub enum ParserError {
    /// Failed to read file (missing, unreadable or not valid UTF-8)
    #[error("IO error reading {0}: {1}")]
    IoError(PathBuf, #[source] std::io::Error),

    /// File too large
    #[error("File {0} exceeds maximum size ({1} bytes)")]
    FileTooLarge(PathBuf, usize),
}

/// Result type for parser operations
pub type ParserResult<T> = Result<T, ParserError>;
