//! Catalog Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use crate::reference::REQUIRED_COLUMNS;
use derive_more::{Display, Error};
use std::path::PathBuf;

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The reference dataset does not exist. Create it.
    #[display(
        "could not find '{}'; please create this file with product details (columns: {})",
        _0.display(),
        REQUIRED_COLUMNS.join(", ")
    )]
    NotFound(#[error(not(source))] PathBuf),
    /// The header row lacks one or more required columns. Fix the dataset.
    #[display("the CSV file is missing required columns: {}", _0.join(", "))]
    MissingColumns(#[error(not(source))] Vec<String>),
    /// A row could not be decoded (bad quoting, invalid UTF-8).
    #[display("malformed reference dataset")]
    InvalidData,
    /// A string did not have the `AA0000-000` identifier shape.
    #[display("invalid identifier: {_0}")]
    InvalidIdentifier(#[error(not(source))] String),
    /// Underlying I/O failure while opening or reading the dataset.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io)
    }
}
