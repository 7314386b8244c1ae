//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initializes logging
//! - parses CLI arguments
//! - prompts for the table / number of cells when needed
//! - runs the generate pipeline or prints preview tables

use std::path::PathBuf;

use clap::Parser;
use log::debug;

use crate::cli::{Command, CurveArgs, GenerateArgs, PreviewArgs, picker};
use crate::domain::{DEFAULT_CELLS, GenerateConfig, NumberFormat};
use crate::error::AppError;
use crate::grade::population::Population;

pub mod pipeline;

/// Entry point for the `cellpop` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    // `cellpop table.csv` and a bare `cellpop` behave like `cellpop generate ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Generate(args) => handle_generate(args),
        Command::Preview(args) => handle_preview(args),
        Command::Curve(args) => handle_curve(args),
    }
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let (csv_path, interactive) = match &args.csv {
        Some(path) => (path.clone(), false),
        None => (picker::prompt_for_csv_path()?, true),
    };

    let cells = match args.cells {
        Some(n) => n,
        None if interactive => picker::prompt_for_cell_count(DEFAULT_CELLS)?,
        None => DEFAULT_CELLS,
    };

    let config = generate_config_from_args(&args, csv_path, cells);
    debug!("{config:?}");

    let run = pipeline::run_generate(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&crate::report::RunSummary {
            source: &config.csv_path,
            table: &run.table,
            population: run.population,
            base_name: &run.base_name,
            out_dir: &config.out_dir,
            dry_run: config.dry_run,
        })
    );

    Ok(())
}

fn handle_preview(args: PreviewArgs) -> Result<(), AppError> {
    let population = Population::new(args.cells)?;
    let table = crate::io::ingest::load_table(&args.csv)?;
    println!("{}", crate::report::format_preview(&table, population));
    Ok(())
}

fn handle_curve(args: CurveArgs) -> Result<(), AppError> {
    let population = Population::new(args.cells)?;
    println!(
        "{}",
        crate::report::format_curve_table(args.low, args.high, &args.indicators, population)
    );
    Ok(())
}

pub fn generate_config_from_args(args: &GenerateArgs, csv_path: PathBuf, cells: usize) -> GenerateConfig {
    GenerateConfig {
        csv_path,
        cells,
        base_name: args.base_name.clone(),
        out_dir: args.out_dir.clone(),
        number_format: NumberFormat::from_precision(args.precision),
        manifest: args.manifest.clone(),
        dry_run: args.dry_run,
    }
}

/// Rewrite argv so `cellpop` defaults to `cellpop generate`.
///
/// Rules:
/// - `cellpop`                      -> `cellpop generate`
/// - `cellpop table.csv -n 21`      -> `cellpop generate table.csv -n 21`
/// - `cellpop -n 21`                -> `cellpop generate -n 21`
/// - `cellpop --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("generate".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "generate" | "preview" | "curve");
    if is_subcommand {
        return argv;
    }

    argv.insert(1, "generate".to_string());
    argv
}
