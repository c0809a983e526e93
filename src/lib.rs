//! rpmlog: build a product archive from a directory of images.
//!
//! The pipeline is strictly linear: load the reference [`Catalog`], scan the
//! images directory into an [`Archive`], then write the report. Any failure
//! before the report stage aborts the run without touching the output file.

pub mod cli;
pub mod error;

use crate::error::{ErrorKind, Result};
use rpmlog_archive::{Archive, build, write_report};
use rpmlog_catalog::Catalog;
use rpmlog_config::Config;
use tracing::instrument;

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The report was written with this many entries.
    Written(usize),
    /// Nothing matched, so no report was written.
    Empty,
}

/// Runs the whole pipeline for an already-resolved configuration.
#[instrument(skip_all, fields(images = %config.images.display(), reference = %config.reference.display()))]
pub fn run(config: &Config) -> Result<Outcome> {
    let catalog = Catalog::load(&config.reference).map_err(ErrorKind::catalog)?;
    if config.audit {
        audit_catalog(&catalog);
    }
    let archive = build(&config.images, &catalog, &config.scan_options()).map_err(ErrorKind::archive)?;
    report(&archive, config)
}

fn report(archive: &Archive, config: &Config) -> Result<Outcome> {
    if archive.is_empty() {
        return Ok(Outcome::Empty);
    }
    write_report(archive, &config.output).map_err(ErrorKind::archive)?;
    tracing::info!("Archive created: {} (entries: {})", config.output.display(), archive.len());
    Ok(Outcome::Written(archive.len()))
}

fn audit_catalog(catalog: &Catalog) {
    for duplicate in catalog.duplicates() {
        tracing::warn!(
            identifier = %duplicate.identifier,
            line = duplicate.line,
            "Reference row overrides an earlier row with the same identifier"
        );
    }
    for identifier in catalog.unmatchable() {
        tracing::warn!(%identifier, "Reference identifier can never match an image filename");
    }
}
