//! Shared domain types.
//!
//! These are plain values handed from the CLI layer to the pipeline, so the
//! interpolation core never sees clap or the file system.

use std::path::PathBuf;

/// Default population size (cells `0..=10`).
pub const DEFAULT_CELLS: usize = 11;

/// Separator joining the two components of a ranging value (`10:4`).
pub const RANGE_SEPARATOR: char = ':';

/// How interpolated numbers are written into statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberFormat {
    /// Shortest text that round-trips, always with a decimal point (`55.0`, `45.2`).
    #[default]
    Shortest,
    /// Fixed number of decimals (`55.00`).
    Fixed(usize),
}

impl NumberFormat {
    pub fn from_precision(precision: Option<usize>) -> Self {
        match precision {
            Some(p) => NumberFormat::Fixed(p),
            None => NumberFormat::Shortest,
        }
    }

    pub fn format(self, value: f64) -> String {
        match self {
            // `Debug` for f64 keeps the trailing `.0` that `Display` drops.
            NumberFormat::Shortest => format!("{value:?}"),
            NumberFormat::Fixed(p) => format!("{value:.p$}"),
        }
    }
}

/// Resolved configuration for one `cellpop generate` run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub csv_path: PathBuf,
    pub cells: usize,
    /// Explicit base name for member directories/files; derived when `None`.
    pub base_name: Option<String>,
    pub out_dir: PathBuf,
    pub number_format: NumberFormat,
    pub manifest: Option<PathBuf>,
    pub dry_run: bool,
}
