//! Builds a product archive from a directory of images.
//!
//! [`build`] walks the images directory, pulls an
//! [`Identifier`](rpmlog_catalog::Identifier) out of every image filename,
//! looks it up in a [`Catalog`](rpmlog_catalog::Catalog) and collects one
//! [`Archive`] entry per identifier, in the order first seen.
//! [`write_report`] then serializes those entries to CSV.

mod build;
pub mod error;
mod report;

pub use crate::build::{Archive, DEFAULT_EXTENSIONS, FileOutcome, ScanOptions, ScanStats, build};
pub use crate::report::{write_records, write_report};
