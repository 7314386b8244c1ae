//! Formatted terminal output: run summary, preview and curve tables.
//!
//! We keep formatting code in one place so the interpolation code stays clean
//! and output changes are localized.

use std::path::Path;

use crate::domain::NumberFormat;
use crate::grade::population::Population;
use crate::grade::value::interpolate_scalar;
use crate::io::ingest::IngestedTable;
use crate::math::skew;

/// Decimals used by the preview and curve tables.
const TABLE_DECIMALS: usize = 2;

/// Summary of a generate run.
pub struct RunSummary<'a> {
    pub source: &'a Path,
    pub table: &'a IngestedTable,
    pub population: Population,
    pub base_name: &'a str,
    pub out_dir: &'a Path,
    pub dry_run: bool,
}

/// Format the run summary (table stats, skipped rows, result line).
pub fn format_run_summary(summary: &RunSummary<'_>) -> String {
    let table = summary.table;
    let mut out = String::new();

    out.push_str(&format!("Table: {}\n", summary.source.display()));
    out.push_str(&format!(
        "Header: lt = {}, ht = {}\n",
        table.header.low_label.as_deref().unwrap_or("-"),
        table.header.high_label.as_deref().unwrap_or("-")
    ));
    out.push_str(&format!(
        "Rows: read {}, used {} ({} interpolated), skipped {}\n",
        table.rows_read,
        table.rows.len(),
        table.parameter_rows().count(),
        table.skipped.len()
    ));
    for skipped in &table.skipped {
        out.push_str(&format!("  line {}: {} ({})\n", skipped.line, skipped.text, skipped.reason));
    }

    let n = summary.population.size();
    let last = n - 1;
    if summary.dry_run {
        out.push_str(&format!(
            "DRY RUN: would create {}_0 .. {}_{last} under {} for {n} cells",
            summary.base_name,
            summary.base_name,
            summary.out_dir.display()
        ));
    } else {
        out.push_str(&format!(
            "SUCCESS: created directories and hoc files for {n} cells ({}_0 .. {}_{last} under {})",
            summary.base_name,
            summary.base_name,
            summary.out_dir.display()
        ));
    }
    out
}

/// Per-member values of every interpolated row (one column per row).
pub fn format_preview(table: &IngestedTable, population: Population) -> String {
    let format = NumberFormat::Fixed(TABLE_DECIMALS);
    let params: Vec<_> = table.parameter_rows().map(|(_, p)| p).collect();
    if params.is_empty() {
        return "No interpolated rows.".to_string();
    }

    let mut headers = vec!["Indicator".to_string()];
    headers.extend(params.iter().map(|p| format_indicator(p.nonlinearity)));

    let mut labels = vec![String::new()];
    labels.extend(params.iter().map(|p| p.label()));

    let mut rows = vec![labels];
    for member in population.members() {
        let marker = if member.is_low_extreme() {
            " (lt)"
        } else if member.is_high_extreme() {
            " (ht)"
        } else {
            ""
        };
        let mut row = vec![format!("Cell {:>2}{marker}", member.index)];
        row.extend(params.iter().map(|p| p.value_for(member).render(format)));
        rows.push(row);
    }

    render_table(&headers, &rows)
}

/// Reference table for ad-hoc extremes, one column per nonlinear indicator.
pub fn format_curve_table(low: f64, high: f64, indicators: &[f64], population: Population) -> String {
    let format = NumberFormat::Fixed(TABLE_DECIMALS);

    let mut headers = vec!["Indicator".to_string()];
    headers.extend(indicators.iter().map(|&k| format_indicator(k)));

    let rows: Vec<Vec<String>> = population
        .members()
        .map(|member| {
            let mut row = vec![format!("Cell {:>2}", member.index)];
            row.extend(indicators.iter().map(|&k| {
                let s = skew(member.index, population.size(), k);
                format.format(interpolate_scalar(low, high, s))
            }));
            row
        })
        .collect();

    render_table(&headers, &rows)
}

fn format_indicator(k: f64) -> String {
    if k.fract() == 0.0 { format!("{k:.0}") } else { format!("{k}") }
}

/// Left-aligned first column, right-aligned value columns.
fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let render_row = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, &w))| if i == 0 { format!("{cell:<w$}") } else { format!("{cell:>w$}") })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = render_row(headers);
    for row in rows {
        out.push('\n');
        out.push_str(&render_row(row.as_slice()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::read_table;

    #[test]
    fn curve_table_reproduces_reference_values() {
        let table = format_curve_table(45.0, 65.0, &[0.0, 1.0, 2.0], Population::new(11).unwrap());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 12);

        let cells = |line: &str| line.split_whitespace().skip(2).map(str::to_string).collect::<Vec<_>>();
        assert_eq!(lines[0].split_whitespace().collect::<Vec<_>>(), vec!["Indicator", "0", "1", "2"]);
        assert_eq!(cells(lines[1]), vec!["45.00", "45.00", "45.00"]);
        assert_eq!(cells(lines[2]), vec!["47.00", "45.20", "45.02"]);
        assert_eq!(cells(lines[6]), vec!["55.00", "50.00", "47.50"]);
        assert_eq!(cells(lines[10]), vec!["63.00", "61.20", "59.58"]);
        assert_eq!(cells(lines[11]), vec!["65.00", "65.00", "65.00"]);
    }

    #[test]
    fn preview_has_one_column_per_interpolated_row() {
        let table = read_table(",,lt,ht\n*,create soma\nsoma,diam,45,65,1\ndend,diam(0:1),10:4,20:8\n".as_bytes()).unwrap();
        let preview = format_preview(&table, Population::new(3).unwrap());
        let lines: Vec<&str> = preview.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[1].contains("soma.diam") && lines[1].contains("dend.diam(0:1)"));
        assert!(lines[3].ends_with("15.00:6.00"), "{preview}");
        assert!(lines[3].contains("50.00"), "{preview}");
        assert!(lines[2].starts_with("Cell  0 (lt)"), "{preview}");
        assert!(lines[4].starts_with("Cell  2 (ht)"), "{preview}");
    }

    #[test]
    fn summary_lists_skipped_rows() {
        let table = read_table(",,lt,ht\nsoma,diam,45,65\nsoma,L,45,\n".as_bytes()).unwrap();
        let summary = format_run_summary(&RunSummary {
            source: Path::new("mn.csv"),
            table: &table,
            population: Population::new(11).unwrap(),
            base_name: "mn",
            out_dir: Path::new("."),
            dry_run: false,
        });
        assert!(summary.contains("skipped 1"));
        assert!(summary.contains("line 3: soma,L,45,"));
        assert!(summary.contains("SUCCESS: created directories and hoc files for 11 cells"));
    }
}
