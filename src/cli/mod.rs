//! Command-line parsing for the graded population generator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the interpolation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::DEFAULT_CELLS;

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "cellpop",
    version,
    about = "Generate a graded population of hoc cell files from an lt/ht parameter table"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interpolate the table and write one hoc file per cell.
    Generate(GenerateArgs),
    /// Print the value every cell receives for each interpolated row.
    Preview(PreviewArgs),
    /// Print the interpolation table for ad-hoc lt/ht values and indicators.
    Curve(CurveArgs),
}

#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    /// Parameter table (CSV). Prompts with a file picker when omitted.
    #[arg(value_name = "CSV")]
    pub csv: Option<PathBuf>,

    /// Number of cells, including the lt cell (0) and the ht cell (N-1).
    ///
    /// Prompted for (default 11) when the table was picked interactively.
    #[arg(short = 'n', long, env = "CELLPOP_CELLS")]
    pub cells: Option<usize>,

    /// Base name for cell directories/files (default: working directory name up to its first `_`).
    #[arg(long)]
    pub base_name: Option<String>,

    /// Directory under which the cell directories are created.
    #[arg(short, long, env = "CELLPOP_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Write numbers with this many decimals instead of the shortest exact form.
    #[arg(long)]
    pub precision: Option<usize>,

    /// Write a JSON manifest of the generated population.
    #[arg(long, value_name = "JSON")]
    pub manifest: Option<PathBuf>,

    /// Compute and report everything without writing hoc files.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args, Clone)]
pub struct PreviewArgs {
    /// Parameter table (CSV).
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Number of cells.
    #[arg(short = 'n', long, env = "CELLPOP_CELLS", default_value_t = DEFAULT_CELLS)]
    pub cells: usize,
}

#[derive(Debug, Args, Clone)]
pub struct CurveArgs {
    /// Low-threshold value (cell 0).
    #[arg(long, allow_hyphen_values = true, value_parser = parse_finite)]
    pub low: f64,

    /// High-threshold value (cell N-1).
    #[arg(long, allow_hyphen_values = true, value_parser = parse_finite)]
    pub high: f64,

    /// Nonlinear indicator; repeat for several columns.
    #[arg(
        short = 'k',
        long = "indicator",
        allow_hyphen_values = true,
        value_parser = parse_finite,
        default_values_t = [0.0, 1.0, 2.0]
    )]
    pub indicators: Vec<f64>,

    /// Number of cells.
    #[arg(short = 'n', long, default_value_t = DEFAULT_CELLS)]
    pub cells: usize,
}

/// Same rule as table values: finite numbers only.
fn parse_finite(text: &str) -> Result<f64, String> {
    let value: f64 = text.trim().parse().map_err(|_| format!("'{text}' is not a number"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{text}' is not a finite number"))
    }
}
