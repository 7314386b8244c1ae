//! Parameter-table ingest.
//!
//! Turns the lt/ht CSV into typed `TableRow`s that are safe to interpolate.
//!
//! Layout:
//! - first record: header (`,,lt header,ht header`); labels are only displayed
//! - remaining records: `target, attribute, lt, ht[, nonlinear indicator]`
//!
//! Policy:
//! - **Row-level defects** (too few fields, empty lt/ht) skip the row and are
//!   reported once, here, rather than once per member
//! - **Content defects** (non-numeric values, lt/ht shape mismatch) abort the
//!   whole run before anything is written

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use log::{info, warn};

use crate::error::{AppError, EXIT_INPUT, EXIT_TABLE, TableError, TableField};
use crate::grade::row::{ParameterRow, RowKind, TableRow, Target, VERBATIM_MARKER};
use crate::grade::value::{Thresholds, parse_number};

/// Minimum number of fields for an interpolated row.
pub const MIN_FIELDS: usize = 4;

/// lt/ht labels from the header record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableHeader {
    pub low_label: Option<String>,
    pub high_label: Option<String>,
}

/// Why a row was left out of every member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Fewer than the required fields.
    MalformedRow { fields: usize },
    /// lt or ht field present but empty.
    IncompleteValue { field: TableField },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MalformedRow { fields } => {
                write!(f, "less than {MIN_FIELDS} fields ({fields})")
            }
            SkipReason::IncompleteValue { field } => write!(f, "{} is empty", field.label()),
        }
    }
}

/// A discarded row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: usize,
    pub text: String,
    pub reason: SkipReason,
}

/// Ingest output: usable rows in table order plus what was skipped.
#[derive(Debug, Clone)]
pub struct IngestedTable {
    pub header: TableHeader,
    pub rows: Vec<TableRow>,
    pub skipped: Vec<SkippedRow>,
    pub rows_read: usize,
}

impl IngestedTable {
    pub fn parameter_rows(&self) -> impl Iterator<Item = (usize, &ParameterRow)> {
        self.rows.iter().filter_map(|row| match &row.kind {
            RowKind::Parameter(param) => Some((row.line, param)),
            RowKind::Verbatim(_) => None,
        })
    }
}

enum Classified {
    Row(TableRow),
    Skip(SkipReason),
}

/// Load the parameter table at `path`.
pub fn load_table(path: &Path) -> Result<IngestedTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Cannot open file '{}' for reading: {e}", path.display())))?;
    let table = read_table(file)?;
    if table.rows.is_empty() {
        return Err(AppError::new(
            EXIT_TABLE,
            format!("No usable rows in '{}'.", path.display()),
        ));
    }
    Ok(table)
}

/// Parse a parameter table from any reader.
pub fn read_table<R: Read>(input: R) -> Result<IngestedTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to read CSV header: {e}")))?
        .clone();
    let header = parse_header(&headers);
    info!(
        "lthdr = {}, hthdr = {}",
        header.low_label.as_deref().unwrap_or("-"),
        header.high_label.as_deref().unwrap_or("-")
    );

    let mut rows = Vec::new();
    let mut skipped = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // The reader drops blank lines, so the index alone can drift from the
        // file; +2 is only a fallback (header first, 1-based lines).
        let fallback = idx + 2;
        rows_read += 1;

        let record = result.map_err(|e| {
            let line = e.position().map_or(fallback, |p| p.line() as usize);
            AppError::new(EXIT_INPUT, format!("line {line}: cannot read record: {e}"))
        })?;
        let line = record.position().map_or(fallback, |p| p.line() as usize);

        let fields: Vec<&str> = record.iter().map(clean_field).collect();
        match classify_record(line, &fields)? {
            Classified::Row(row) => rows.push(row),
            Classified::Skip(reason) => {
                let text = fields.join(",");
                warn!("line {line}: discarded '{text}' ({reason})");
                skipped.push(SkippedRow { line, text, reason });
            }
        }
    }

    Ok(IngestedTable {
        header,
        rows,
        skipped,
        rows_read,
    })
}

fn parse_header(headers: &StringRecord) -> TableHeader {
    let label = |idx: usize| {
        headers
            .get(idx)
            .map(clean_field)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    if headers.len() >= MIN_FIELDS {
        TableHeader {
            low_label: label(2),
            high_label: label(3),
        }
    } else {
        TableHeader {
            low_label: label(0),
            high_label: label(1),
        }
    }
}

fn classify_record(line: usize, fields: &[&str]) -> Result<Classified, TableError> {
    if fields.first() == Some(&VERBATIM_MARKER) {
        return Ok(match fields.get(1) {
            Some(text) => Classified::Row(TableRow {
                line,
                kind: RowKind::Verbatim(text.to_string()),
            }),
            None => Classified::Skip(SkipReason::MalformedRow { fields: fields.len() }),
        });
    }

    let [target, attribute, low, high, rest @ ..] = fields else {
        return Ok(Classified::Skip(SkipReason::MalformedRow { fields: fields.len() }));
    };

    if low.is_empty() {
        return Ok(Classified::Skip(SkipReason::IncompleteValue { field: TableField::Low }));
    }
    if high.is_empty() {
        return Ok(Classified::Skip(SkipReason::IncompleteValue { field: TableField::High }));
    }

    let nonlinearity = match rest.first() {
        Some(text) if !text.is_empty() => parse_number(line, TableField::Nonlinearity, text)?,
        _ => 0.0,
    };

    Ok(Classified::Row(TableRow {
        line,
        kind: RowKind::Parameter(ParameterRow {
            target: Target::classify(target),
            attribute: attribute.to_string(),
            thresholds: Thresholds::parse(line, low, high)?,
            nonlinearity,
        }),
    }))
}

/// Spreadsheet exports sometimes leave a second quote pair around a field.
/// Quotes inside the text (hoc string literals) are kept.
fn clean_field(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .map_or(field, str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grade::value::ThresholdValue;

    const TABLE: &str = "\
,,low threshold,high threshold
*,create soma
soma,diam,45,65,1
Global,celsius,6.3,36
dend,diam(0:1),10:4,20:8,-0.5
soma,L,,30
soma,cm
";

    fn ingest(text: &str) -> Result<IngestedTable, AppError> {
        read_table(text.as_bytes())
    }

    #[test]
    fn header_labels_are_read() {
        let table = ingest(TABLE).unwrap();
        assert_eq!(table.header.low_label.as_deref(), Some("low threshold"));
        assert_eq!(table.header.high_label.as_deref(), Some("high threshold"));

        let table = ingest("lt,ht\nsoma,diam,1,2\n").unwrap();
        assert_eq!(table.header.low_label.as_deref(), Some("lt"));
        assert_eq!(table.header.high_label.as_deref(), Some("ht"));
    }

    #[test]
    fn rows_are_classified_in_order() {
        let table = ingest(TABLE).unwrap();
        assert_eq!(table.rows_read, 6);
        assert_eq!(table.rows.len(), 4);

        assert_eq!(table.rows[0].kind, RowKind::Verbatim("create soma".to_string()));

        let RowKind::Parameter(diam) = &table.rows[1].kind else {
            panic!("expected parameter row");
        };
        assert_eq!(table.rows[1].line, 3);
        assert_eq!(diam.target, Target::Section("soma".to_string()));
        assert_eq!(diam.nonlinearity, 1.0);
        assert_eq!(diam.thresholds.low(), ThresholdValue::Scalar(45.0));

        let RowKind::Parameter(celsius) = &table.rows[2].kind else {
            panic!("expected parameter row");
        };
        assert_eq!(celsius.target, Target::Global);
        assert_eq!(celsius.nonlinearity, 0.0);

        let RowKind::Parameter(range) = &table.rows[3].kind else {
            panic!("expected parameter row");
        };
        assert_eq!(range.thresholds.high(), ThresholdValue::Range(20.0, 8.0));
        assert_eq!(range.nonlinearity, -0.5);
    }

    #[test]
    fn incomplete_and_short_rows_are_skipped_once() {
        let table = ingest(TABLE).unwrap();
        assert_eq!(
            table.skipped,
            vec![
                SkippedRow {
                    line: 6,
                    text: "soma,L,,30".to_string(),
                    reason: SkipReason::IncompleteValue { field: TableField::Low },
                },
                SkippedRow {
                    line: 7,
                    text: "soma,cm".to_string(),
                    reason: SkipReason::MalformedRow { fields: 2 },
                },
            ]
        );
    }

    #[test]
    fn quoted_fields_are_unwrapped() {
        let table = ingest("\"\",\"\",\"lt\",\"ht\"\n\"soma\",\"diam\",\"45\",\"65\",\"\"\n").unwrap();
        assert_eq!(table.rows.len(), 1);
        assert!(table.skipped.is_empty());
        let (_, param) = table.parameter_rows().next().unwrap();
        assert_eq!(param.attribute, "diam");
        assert_eq!(param.nonlinearity, 0.0);

        let table = ingest(",,lt,ht\nsoma,\"\"\"L\"\"\",10,20\n").unwrap();
        let (_, param) = table.parameter_rows().next().unwrap();
        assert_eq!(param.attribute, "L");
    }

    #[test]
    fn verbatim_string_literals_keep_their_quotes() {
        let table = ingest(",,lt,ht\n*,\"print \"\"done\"\"\"\n*,print \"x\"\n").unwrap();
        assert_eq!(table.rows[0].kind, RowKind::Verbatim("print \"done\"".to_string()));
        assert_eq!(table.rows[1].kind, RowKind::Verbatim("print \"x\"".to_string()));
    }

    #[test]
    fn blank_records_are_skipped_and_counted() {
        let table = ingest(",,lt,ht\nsoma,diam,45,65\n,,,,\n,,\n").unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows_read, 3);
        assert_eq!(
            table.skipped,
            vec![
                SkippedRow {
                    line: 3,
                    text: ",,,,".to_string(),
                    reason: SkipReason::IncompleteValue { field: TableField::Low },
                },
                SkippedRow {
                    line: 4,
                    text: ",,".to_string(),
                    reason: SkipReason::MalformedRow { fields: 3 },
                },
            ]
        );
    }

    #[test]
    fn line_numbers_survive_blank_lines() {
        let err = ingest(",,lt,ht\n\nsoma,diam,45,65\n\nsoma,L,10:4,7\n").unwrap_err();
        assert_eq!(err.exit_code(), EXIT_TABLE);
        assert!(err.message().contains("line 5"), "{err}");

        let table = ingest(",,lt,ht\n\nsoma,diam,45,65\n\nsoma,L,,7\n").unwrap();
        assert_eq!(table.rows[0].line, 3);
        assert_eq!(table.skipped.len(), 1);
        assert_eq!(table.skipped[0].line, 5);
    }

    #[test]
    fn undecodable_records_abort() {
        let err = read_table(&b",,lt,ht\nsoma,diam,45,65\nsoma,L,\xff,2\n"[..]).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
        assert!(err.message().contains("line 3"), "{err}");
    }

    #[test]
    fn shape_mismatch_aborts() {
        let err = ingest(",,lt,ht\nsoma,diam,10:4,7\n").unwrap_err();
        assert_eq!(err.exit_code(), EXIT_TABLE);
        assert!(err.message().contains("line 2"), "{err}");
        assert!(err.message().contains("ranging"), "{err}");
    }

    #[test]
    fn non_numeric_values_abort() {
        let err = ingest(",,lt,ht\nsoma,diam,45,sixty\n").unwrap_err();
        assert_eq!(err.exit_code(), EXIT_TABLE);
        assert!(err.message().contains("'sixty'"), "{err}");

        let err = ingest(",,lt,ht\nsoma,diam,45,65,steep\n").unwrap_err();
        assert!(err.message().contains("nonlinear indicator"), "{err}");
    }

    #[test]
    fn silent_rows_are_still_validated() {
        let table = ingest(",,lt,ht\n,scratch,1,2\n").unwrap();
        assert_eq!(table.rows.len(), 1);
        assert!(ingest(",,lt,ht\n,scratch,1,x\n").is_err());
    }

    #[test]
    fn empty_table_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, ",,lt,ht\nsoma,diam,,\n").unwrap();
        let err = load_table(&path).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_TABLE);

        let err = load_table(&dir.path().join("missing.csv")).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
    }
}
