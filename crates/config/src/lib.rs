//! Run configuration for rpmlog.
//!
//! Values are layered with [figment], lowest priority first:
//!
//! 1. Built-in defaults ([`Config::default`]).
//! 2. A TOML file: either the one explicitly requested, or
//!    [`DEFAULT_CONFIG_FILE`] in the working directory if it exists.
//! 3. Command-line [`Overrides`].
//!
//! Environment variables are deliberately not consulted.
//!
//! ```toml
//! images = "./downloads"
//! reference = "model_data.csv"
//! output = "archive_output.csv"
//! extensions = ["jpg", "jpeg", "png", "webp"]
//! audit = false
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use figment::Figment;
use figment::providers::{Format, Serialized, Toml};
use rpmlog_archive::{DEFAULT_EXTENSIONS, ScanOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Looked up in the working directory when no config file is given.
pub const DEFAULT_CONFIG_FILE: &str = "rpmlog.toml";
pub const DEFAULT_IMAGES: &str = ".";
pub const DEFAULT_REFERENCE: &str = "model_data.csv";
pub const DEFAULT_OUTPUT: &str = "archive_output.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root of the image directory tree.
    pub images: PathBuf,
    /// Reference dataset (CSV).
    pub reference: PathBuf,
    /// Report destination (CSV), overwritten on every run.
    pub output: PathBuf,
    /// Image extensions to consider, case-insensitive.
    pub extensions: Vec<String>,
    /// Warn about duplicate reference rows and duplicate image files.
    pub audit: bool,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            images: PathBuf::from(DEFAULT_IMAGES),
            reference: PathBuf::from(DEFAULT_REFERENCE),
            output: PathBuf::from(DEFAULT_OUTPUT),
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            audit: false,
        }
    }
}

/// Command-line values. `None` leaves the lower layers untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit: Option<bool>,
}

impl Config {
    /// Builds the layered [`Figment`] without extracting it.
    pub fn figment(file: Option<&Path>, overrides: &Overrides) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        match file {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Some(path) => figment = figment.merge(Toml::file_exact(path)),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                tracing::debug!(path = DEFAULT_CONFIG_FILE, "Using configuration file from working directory");
                figment = figment.merge(Toml::file_exact(DEFAULT_CONFIG_FILE));
            },
            None => {},
        }
        Ok(figment.merge(Serialized::defaults(overrides)))
    }

    /// Loads and validates the configuration.
    #[instrument(skip(overrides))]
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let config: Config = match Self::figment(file, overrides)?.extract() {
            Ok(config) => config,
            Err(e) => exn::bail!(ErrorKind::Invalid(e.to_string())),
        };
        config.validate()
    }

    /// Normalizes extensions (lowercase, no leading dot, no duplicates) and
    /// rejects configurations that could never match a file.
    pub fn validate(mut self) -> Result<Self> {
        let mut extensions: Vec<String> = Vec::with_capacity(self.extensions.len());
        for ext in &self.extensions {
            let ext = ext.trim().trim_start_matches('.').to_lowercase();
            if !ext.is_empty() && !extensions.contains(&ext) {
                extensions.push(ext);
            }
        }
        if extensions.is_empty() {
            exn::bail!(ErrorKind::Invalid("at least one image extension is required".to_string()));
        }
        self.extensions = extensions;
        Ok(self)
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            extensions: self.extensions.clone(),
            audit: self.audit,
        }
    }
}
