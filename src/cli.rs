//! Command-line interface.

use clap::{ArgAction, Parser};
use rpmlog_config::Overrides;
use std::path::PathBuf;

/// The only command keyword that starts a run.
pub const TRIGGER: &str = "log!";

#[derive(Debug, Parser)]
#[command(
    name = "rpmlog",
    version,
    about = "Build a product archive from image filenames",
    long_about = "Scans an image directory for files named like `BA2449-089_front_01.jpg`, looks each \
                  identifier up in a reference CSV and writes one row per matched product to a new CSV.",
    after_help = "Options not given on the command line fall back to the config file, then to built-in defaults."
)]
pub struct Cli {
    /// Use 'log!' to trigger archiving.
    pub command: String,
    /// Directory containing the downloaded images [default: .]
    #[arg(long, value_name = "DIR")]
    pub images: Option<PathBuf>,
    /// CSV file containing product details [default: model_data.csv]
    #[arg(long = "model-csv", visible_alias = "reference", value_name = "FILE")]
    pub model_csv: Option<PathBuf>,
    /// Output CSV file to write the archive to [default: archive_output.csv]
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Image extension to consider; repeat for several [default: jpg, jpeg, png, webp]
    #[arg(long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,
    /// TOML configuration file [default: ./rpmlog.toml, if present]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Warn about duplicate reference rows and duplicate image files
    #[arg(long)]
    pub audit: bool,
    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,
    /// Only print warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}
impl Cli {
    /// Returns `true` if the command keyword is [`TRIGGER`], ignoring case and
    /// surrounding whitespace.
    pub fn is_trigger(&self) -> bool {
        self.command.trim().eq_ignore_ascii_case(TRIGGER)
    }

    /// Tells the user the command keyword wasn't recognized. Logged at `warn`
    /// so that `--quiet` still shows it.
    pub fn reject_command(&self) {
        tracing::warn!(command = %self.command, "Unknown command. Use '{TRIGGER}' to trigger the logging operation.");
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            images: self.images.clone(),
            reference: self.model_csv.clone(),
            output: self.output.clone(),
            extensions: (!self.extensions.is_empty()).then(|| self.extensions.clone()),
            audit: self.audit.then_some(true),
        }
    }

    /// Log filter directive for the requested verbosity.
    pub fn log_directive(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}
