//! Write one hoc file per member.
//!
//! Member `i` lands in `<out_dir>/<base>_<i>/<base>_<i>.hoc`. Existing member
//! directories are reused and existing files overwritten, so re-running a
//! table refreshes the population in place.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::domain::GenerateConfig;
use crate::error::{AppError, EXIT_INPUT, EXIT_OUTPUT};
use crate::grade::population::MemberOutput;

/// Base name for member directories and files.
///
/// Order: explicit `--base-name`, then the working directory's name up to its
/// first underscore, then the CSV file stem.
pub fn resolve_base_name(config: &GenerateConfig) -> Result<String, AppError> {
    if let Some(name) = config.base_name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        return Ok(name.to_string());
    }

    let from_cwd = std::env::current_dir().ok().and_then(|cwd| base_name_from_dir(&cwd));
    if let Some(name) = from_cwd {
        return Ok(name);
    }

    config
        .csv_path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            AppError::new(
                EXIT_INPUT,
                "Could not derive a base name; pass one with `--base-name`.",
            )
        })
}

/// `/work/motoneuron_v2` -> `motoneuron`.
pub fn base_name_from_dir(dir: &Path) -> Option<String> {
    let name = dir.file_name()?.to_str()?.trim();
    let base = name.split('_').next().unwrap_or(name).trim();
    if base.is_empty() { None } else { Some(base.to_string()) }
}

pub fn member_name(base: &str, index: usize) -> String {
    format!("{base}_{index}")
}

/// `<out_dir>/<base>_<i>/<base>_<i>.hoc`
pub fn member_file_path(out_dir: &Path, base: &str, index: usize) -> PathBuf {
    let name = member_name(base, index);
    out_dir.join(&name).join(format!("{name}.hoc"))
}

/// Write every member's hoc file; returns the written paths in member order.
pub fn write_member_files(out_dir: &Path, base: &str, members: &[MemberOutput]) -> Result<Vec<PathBuf>, AppError> {
    let mut written = Vec::with_capacity(members.len());
    for member in members {
        let path = member_file_path(out_dir, base, member.index);
        write_member_file(&path, member)?;
        debug!("wrote {} ({} lines)", path.display(), member.lines.len());
        written.push(path);
    }
    Ok(written)
}

fn write_member_file(path: &Path, member: &MemberOutput) -> Result<(), AppError> {
    if let Some(dir) = path.parent() {
        create_dir_all(dir).map_err(|e| {
            AppError::new(
                EXIT_OUTPUT,
                format!("Failed to create directory '{}': {e}", dir.display()),
            )
        })?;
    }

    let mut file = File::create(path)
        .map_err(|e| AppError::new(EXIT_OUTPUT, format!("Failed to create '{}': {e}", path.display())))?;
    file.write_all(member.contents().as_bytes())
        .map_err(|e| AppError::new(EXIT_OUTPUT, format!("Failed to write '{}': {e}", path.display())))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NumberFormat;
    use crate::grade::row::EmittedLine;

    fn member(index: usize, text: &str) -> MemberOutput {
        MemberOutput {
            index,
            lines: vec![EmittedLine {
                line: 2,
                text: text.to_string(),
            }],
        }
    }

    #[test]
    fn base_name_stops_at_first_underscore() {
        assert_eq!(
            base_name_from_dir(Path::new("/work/motoneuron_v2_final")).as_deref(),
            Some("motoneuron")
        );
        assert_eq!(base_name_from_dir(Path::new("/work/pyramid")).as_deref(), Some("pyramid"));
        assert_eq!(base_name_from_dir(Path::new("/work/_hidden")), None);
    }

    #[test]
    fn explicit_base_name_wins() {
        let config = GenerateConfig {
            csv_path: PathBuf::from("cells.csv"),
            cells: 11,
            base_name: Some(" mn ".to_string()),
            out_dir: PathBuf::from("."),
            number_format: NumberFormat::Shortest,
            manifest: None,
            dry_run: false,
        };
        assert_eq!(resolve_base_name(&config).unwrap(), "mn");
    }

    #[test]
    fn member_paths_nest_name_twice() {
        let path = member_file_path(Path::new("out"), "mn", 3);
        assert_eq!(path, Path::new("out").join("mn_3").join("mn_3.hoc"));
    }

    #[test]
    fn writes_and_overwrites_member_files() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_member_files(dir.path(), "mn", &[member(0, "a = 1.0"), member(1, "a = 2.0")]).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(std::fs::read_to_string(&written[1]).unwrap(), "a = 2.0\n");

        // Re-running reuses the directory and replaces the file.
        let written = write_member_files(dir.path(), "mn", &[member(1, "a = 3.0")]).unwrap();
        assert_eq!(std::fs::read_to_string(&written[0]).unwrap(), "a = 3.0\n");
    }
}
