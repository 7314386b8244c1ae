//! JSON manifest describing a generated population.
//!
//! The manifest records what was generated from which table:
//! - source CSV, population size and base name
//! - lt/ht header labels and the lines that were skipped
//! - per member: name, hoc path (absent on dry runs) and emitted statements

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::{AppError, EXIT_OUTPUT};
use crate::grade::population::MemberOutput;
use crate::grade::row::EmittedLine;
use crate::io::export::member_name;
use crate::io::ingest::IngestedTable;

#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub tool: String,
    pub source: PathBuf,
    pub generated_at: DateTime<Local>,
    pub cells: usize,
    pub base_name: String,
    pub low_label: Option<String>,
    pub high_label: Option<String>,
    pub skipped_lines: Vec<usize>,
    pub members: Vec<ManifestMember>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestMember {
    pub index: usize,
    pub name: String,
    pub path: Option<PathBuf>,
    pub lines: Vec<EmittedLine>,
}

impl Manifest {
    /// `paths` holds the written hoc files in member order; empty on a dry run.
    pub fn new(
        source: &Path,
        table: &IngestedTable,
        base_name: &str,
        members: &[MemberOutput],
        paths: &[PathBuf],
    ) -> Self {
        let entries = members
            .iter()
            .map(|m| ManifestMember {
                index: m.index,
                name: member_name(base_name, m.index),
                path: paths.get(m.index).cloned(),
                lines: m.lines.clone(),
            })
            .collect();

        Manifest {
            tool: env!("CARGO_PKG_NAME").to_string(),
            source: source.to_path_buf(),
            generated_at: Local::now(),
            cells: members.len(),
            base_name: base_name.to_string(),
            low_label: table.header.low_label.clone(),
            high_label: table.header.high_label.clone(),
            skipped_lines: table.skipped.iter().map(|s| s.line).collect(),
            members: entries,
        }
    }
}

/// Write the manifest as pretty-printed JSON.
pub fn write_manifest_json(path: &Path, manifest: &Manifest) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_OUTPUT, format!("Failed to create manifest '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, manifest)
        .map_err(|e| AppError::new(EXIT_OUTPUT, format!("Failed to write manifest JSON: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NumberFormat;
    use crate::grade::population::{Population, build_population};
    use crate::io::ingest::read_table;

    #[test]
    fn manifest_lists_members_and_skipped_lines() {
        let table = read_table(",,lt,ht\nsoma,diam,45,65\nsoma,L,,30\n".as_bytes()).unwrap();
        let members = build_population(&table.rows, Population::new(3).unwrap(), NumberFormat::Shortest);
        let manifest = Manifest::new(Path::new("mn.csv"), &table, "mn", &members, &[]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        write_manifest_json(&path, &manifest).unwrap();

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["tool"], "cellpop");
        assert_eq!(json["cells"], 3);
        assert_eq!(json["low_label"], "lt");
        assert_eq!(json["skipped_lines"], serde_json::json!([3]));
        assert_eq!(json["members"][1]["name"], "mn_1");
        assert_eq!(json["members"][1]["path"], serde_json::Value::Null);
        assert_eq!(json["members"][1]["lines"][0]["text"], "soma.diam = 55.0");
    }
}
