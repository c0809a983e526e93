use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use indexmap::IndexMap;
use indexmap::map::Entry;
use rpmlog_catalog::{Catalog, Identifier, Record};
use std::ffi::OsStr;
use std::path::Path;
use tracing::instrument;
use walkdir::{DirEntry, WalkDir};

/// Image extensions considered by default (compared case-insensitively).
pub const DEFAULT_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Lowercase extensions, without the leading dot.
    pub extensions: Vec<String>,
    /// Warn about every duplicate file instead of skipping it quietly.
    pub audit: bool,
}
impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            audit: false,
        }
    }
}
impl ScanOptions {
    /// Returns `true` if the file's extension is one of [`Self::extensions`].
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| self.extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
    }
}

/// What happened to a single file during the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Extension is not an allowed image type.
    Unsupported,
    /// Filename does not start with an identifier.
    Unparseable,
    /// Identifier is not in the catalog yet.
    Uncatalogued(Identifier),
    /// Identifier was already archived by an earlier file.
    Duplicate(Identifier),
    /// First file seen for this identifier; its record was archived.
    Archived(Identifier),
}

/// Per-run counters, one per [`FileOutcome`] plus walk failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub visited: u64,
    pub unsupported: u64,
    pub unparseable: u64,
    pub uncatalogued: u64,
    pub duplicates: u64,
    pub archived: u64,
    /// Entries below the root that could not be read.
    pub unreadable: u64,
}

/// The ordered, deduplicated result of a scan.
///
/// Entries are keyed by [`Identifier`] and kept in first-seen order. Once an
/// identifier is archived its entry never changes for the rest of the run.
#[derive(Debug, Clone, Default)]
pub struct Archive {
    entries: IndexMap<Identifier, Record>,
    stats: ScanStats,
}
impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies one file and archives its record if it is the first match
    /// for its identifier.
    pub fn consider(&mut self, path: &Path, catalog: &Catalog, options: &ScanOptions) -> FileOutcome {
        self.stats.visited += 1;
        if !options.accepts(path) {
            self.stats.unsupported += 1;
            return FileOutcome::Unsupported;
        }
        let Some(identifier) = Identifier::from_filename(path) else {
            self.stats.unparseable += 1;
            return FileOutcome::Unparseable;
        };
        let Some(record) = catalog.get(&identifier) else {
            tracing::trace!(%identifier, path = %path.display(), "Identifier not in catalog");
            self.stats.uncatalogued += 1;
            return FileOutcome::Uncatalogued(identifier);
        };
        match self.entries.entry(identifier) {
            Entry::Occupied(entry) => {
                let identifier = entry.key().clone();
                if options.audit {
                    tracing::warn!(%identifier, path = %path.display(), "Duplicate image for archived identifier");
                } else {
                    tracing::trace!(%identifier, path = %path.display(), "Skipping duplicate");
                }
                self.stats.duplicates += 1;
                FileOutcome::Duplicate(identifier)
            },
            Entry::Vacant(entry) => {
                let identifier = entry.key().clone();
                tracing::debug!(%identifier, path = %path.display(), "Archived");
                entry.insert(record.clone());
                self.stats.archived += 1;
                FileOutcome::Archived(identifier)
            },
        }
    }

    pub fn get(&self, identifier: &Identifier) -> Option<&Record> {
        self.entries.get(identifier)
    }

    /// Archived records in first-seen order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.entries.values()
    }

    /// Archived identifiers in first-seen order.
    pub fn identifiers(&self) -> impl Iterator<Item = &Identifier> {
        self.entries.keys()
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Recursively scans `root` and archives the catalog record of every
/// identifier found in an image filename.
///
/// Order follows the filesystem's enumeration order, which is not sorted.
/// Files that don't qualify are skipped silently; an empty archive is a
/// normal (logged) outcome, not an error.
///
/// # Errors
///
/// - [`ErrorKind::InvalidRoot`] if `root` is missing or not a directory.
/// - [`ErrorKind::Walk`] if `root` itself cannot be listed. Unreadable entries
///   further down are logged and skipped.
#[instrument(skip(root, catalog, options), fields(root = %root.as_ref().display()))]
pub fn build(root: impl AsRef<Path>, catalog: &Catalog, options: &ScanOptions) -> Result<Archive> {
    let root = root.as_ref();
    if !root.is_dir() {
        exn::bail!(ErrorKind::InvalidRoot(root.to_path_buf()));
    }

    let mut archive = Archive::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e).or_raise(|| ErrorKind::Walk(root.to_path_buf())),
            Err(e) => {
                tracing::warn!(path = ?e.path(), error = %e, "Skipping unreadable entry");
                archive.stats.unreadable += 1;
                continue;
            },
        };
        if is_file(&entry) {
            archive.consider(entry.path(), catalog, options);
        }
    }

    let stats = archive.stats;
    tracing::debug!(
        visited = stats.visited,
        unsupported = stats.unsupported,
        unparseable = stats.unparseable,
        uncatalogued = stats.uncatalogued,
        duplicates = stats.duplicates,
        unreadable = stats.unreadable,
        "Scan complete"
    );
    if archive.is_empty() {
        tracing::info!(entries = 0, "No matching product entries found. Did you populate the reference dataset?");
    }
    Ok(archive)
}

/// Regular files, and symlinks that resolve to one. Symlinked directories
/// are not descended into.
fn is_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}
