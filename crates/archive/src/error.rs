//! Archive Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An archive error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The images root does not exist or is not a directory. Unlike a
    /// directory without matching files, this aborts the run.
    #[display(
        "images directory not found: {} (a missing directory is an error, not an empty archive)",
        _0.display()
    )]
    InvalidRoot(#[error(not(source))] PathBuf),
    /// The images root exists but could not be listed.
    #[display("could not read images directory: {}", _0.display())]
    Walk(#[error(not(source))] PathBuf),
    /// The report file could not be created or written.
    #[display("could not write report: {}", _0.display())]
    Write(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Walk(_) | Self::Write(_))
    }
}
