//! Interactive prompts.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the picker provides the "run `cellpop` and choose a table" UX, followed
//!   by the number-of-cells prompt
//!
//! The picker searches for `*.csv` files under the current working directory.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::{AppError, EXIT_INPUT};

/// Default directory recursion depth for finding CSV files.
const DEFAULT_SEARCH_DEPTH: usize = 4;

/// Prompt the user to select a CSV file from the current directory tree.
///
/// Behavior:
/// - list discovered `*.csv` files
/// - accept either a number (from the list) or an explicit path
/// - `q` cancels
pub fn prompt_for_csv_path() -> Result<PathBuf, AppError> {
    let files = discover_csv_files();
    if files.is_empty() {
        return Err(AppError::new(
            EXIT_INPUT,
            "No .csv files found. Provide one with `cellpop generate <table.csv>`.",
        ));
    }

    println!("Found {} CSV file(s):", files.len());
    for (idx, path) in files.iter().enumerate() {
        println!("{:>3}) {}", idx + 1, pretty_path(path));
    }

    let stdin = io::stdin();
    loop {
        let input = read_reply(
            &mut stdin.lock(),
            &format!("Select the lt/ht parameter file by number (1-{}) or type a path (q to quit): ", files.len()),
        )?;

        if input.eq_ignore_ascii_case("q") {
            return Err(AppError::new(EXIT_INPUT, "Canceled."));
        }

        if let Ok(choice) = input.parse::<usize>() {
            if (1..=files.len()).contains(&choice) {
                return validate_csv_path(&files[choice - 1]);
            }
            println!("Invalid choice: {choice}. Enter a number between 1 and {}.", files.len());
            continue;
        }

        match validate_csv_path(Path::new(&input)) {
            Ok(path) => return Ok(path),
            Err(err) => {
                println!("{err}");
                continue;
            }
        }
    }
}

/// Ask for the number of cells, keeping `default` on empty or unusable input.
pub fn prompt_for_cell_count(default: usize) -> Result<usize, AppError> {
    println!("Default number of cells is {default}");
    let input = read_reply(
        &mut io::stdin().lock(),
        "If this is ok hit <return>; otherwise type the desired number: ",
    )?;

    let reply = parse_cell_count(&input, default);
    if let CellCountReply::Rejected(count) = reply {
        println!("non-numeric or zero input; using default number of cells = {count}");
    }
    Ok(reply.count())
}

/// Outcome of the number-of-cells prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellCountReply {
    Default(usize),
    Chosen(usize),
    /// Input was not a positive integer; holds the default.
    Rejected(usize),
}

impl CellCountReply {
    pub fn count(self) -> usize {
        match self {
            CellCountReply::Default(n) | CellCountReply::Chosen(n) | CellCountReply::Rejected(n) => n,
        }
    }
}

pub fn parse_cell_count(input: &str, default: usize) -> CellCountReply {
    let input = input.trim();
    if input.is_empty() {
        return CellCountReply::Default(default);
    }
    match input.parse::<usize>() {
        Ok(n) if n > 0 => CellCountReply::Chosen(n),
        _ => CellCountReply::Rejected(default),
    }
}

fn read_reply(input: &mut impl BufRead, prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout()
        .flush()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write prompt: {e}")))?;

    let mut line = String::new();
    let bytes = input
        .read_line(&mut line)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to read input: {e}")))?;
    if bytes == 0 {
        return Err(AppError::new(EXIT_INPUT, "No input received."));
    }
    Ok(line.trim().to_string())
}

/// Validate the provided path points to a `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::new(
            EXIT_INPUT,
            format!("CSV file not found: {}", path.display()),
        ));
    }
    if path.is_dir() {
        return Err(AppError::new(
            EXIT_INPUT,
            format!("Expected a file, got a directory: {}", path.display()),
        ));
    }
    if !has_csv_extension(path) {
        return Err(AppError::new(
            EXIT_INPUT,
            format!("Expected a .csv file (got: {}).", path.display()),
        ));
    }

    Ok(path.to_path_buf())
}

/// Discover `*.csv` files under the current directory (deterministic order).
pub fn discover_csv_files() -> Vec<PathBuf> {
    find_csv_files(Path::new("."), DEFAULT_SEARCH_DEPTH)
}

fn find_csv_files(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut out = Vec::new();
    find_csv_files_inner(root, 0, max_depth, &mut out);
    out.sort_by_key(|p| pretty_path(p));
    out
}

fn find_csv_files_inner(root: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }

    let Ok(entries) = fs::read_dir(root) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if !should_skip_dir(&path) {
                find_csv_files_inner(&path, depth + 1, max_depth, out);
            }
        } else if file_type.is_file() && has_csv_extension(&path) {
            out.push(path);
        }
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    matches!(name, ".git" | "target" | "node_modules")
}

fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}
