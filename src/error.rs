//! Top-level Error Types
//!
//! Wraps each stage's error kind so the user sees the stage's own message
//! while the full `exn` tree stays available for debugging.

use derive_more::{Display, Error};
use rpmlog_archive::error::{Error as ArchiveError, ErrorKind as ArchiveErrorKind};
use rpmlog_catalog::error::{Error as CatalogError, ErrorKind as CatalogErrorKind};
use rpmlog_config::error::{Error as ConfigError, ErrorKind as ConfigErrorKind};

/// A pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration could not be assembled.
    #[display("{_0}")]
    Config(#[error(not(source))] ConfigErrorKind),
    /// The reference dataset could not be loaded. Nothing was written.
    #[display("{_0}")]
    Catalog(#[error(not(source))] CatalogErrorKind),
    /// Scanning or report writing failed.
    #[display("{_0}")]
    Archive(#[error(not(source))] ArchiveErrorKind),
}

impl ErrorKind {
    /// Convert a config error, keeping its `Exn` frame as a child.
    #[track_caller]
    pub fn config(err: ConfigError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Config(inner))
    }

    /// Convert a catalog error, keeping its `Exn` frame as a child.
    #[track_caller]
    pub fn catalog(err: CatalogError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Catalog(inner))
    }

    /// Convert an archive error, keeping its `Exn` frame as a child.
    #[track_caller]
    pub fn archive(err: ArchiveError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Archive(inner))
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Config(kind) => kind.is_retryable(),
            Self::Catalog(kind) => kind.is_retryable(),
            Self::Archive(kind) => kind.is_retryable(),
        }
    }
}
