//! Shared "generate" pipeline used by the CLI front-end.
//!
//! Keeping this in one place keeps the workflow in a single readable sequence:
//! population check -> table ingest -> interpolation -> hoc files -> manifest
//!
//! Every fatal error surfaces before the first file is written.

use std::path::PathBuf;

use log::info;

use crate::domain::GenerateConfig;
use crate::error::AppError;
use crate::grade::population::{MemberOutput, Population, build_population};
use crate::io::export::{resolve_base_name, write_member_files};
use crate::io::ingest::{IngestedTable, load_table};
use crate::io::manifest::{Manifest, write_manifest_json};

/// All computed outputs of a single `cellpop generate` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub table: IngestedTable,
    pub population: Population,
    pub base_name: String,
    pub members: Vec<MemberOutput>,
    /// Written hoc files in member order (empty on a dry run).
    pub written: Vec<PathBuf>,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_generate(config: &GenerateConfig) -> Result<RunOutput, AppError> {
    // 1) Reject degenerate populations before touching the table.
    let population = Population::new(config.cells)?;

    // 2) Parse and classify the table (fatal content errors abort here).
    let table = load_table(&config.csv_path)?;
    info!(
        "{}: {} usable rows, {} skipped",
        config.csv_path.display(),
        table.rows.len(),
        table.skipped.len()
    );

    // 3) Interpolate every member.
    let members = build_population(&table.rows, population, config.number_format);

    // 4) Write hoc files.
    let base_name = resolve_base_name(config)?;
    let written = if config.dry_run {
        Vec::new()
    } else {
        write_member_files(&config.out_dir, &base_name, &members)?
    };

    // 5) Optional manifest; a dry run writes nothing at all.
    match &config.manifest {
        Some(path) if config.dry_run => info!("dry run: manifest {} not written", path.display()),
        Some(path) => {
            let manifest = Manifest::new(&config.csv_path, &table, &base_name, &members, &written);
            write_manifest_json(path, &manifest)?;
            info!("manifest written to {}", path.display());
        }
        None => {}
    }

    Ok(RunOutput {
        table,
        population,
        base_name,
        members,
        written,
    })
}
