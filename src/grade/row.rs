//! Parameter rows and the hoc statements they produce.
//!
//! Each table row becomes one of:
//!
//! - a verbatim passthrough (`*` target): the attribute text is copied as-is
//! - a parameter row: interpolated per member, then rendered according to its
//!   target (`Global`, an iteration block such as `forall`, a section, or
//!   silent when the target is empty)

use serde::Serialize;

use crate::domain::NumberFormat;
use crate::grade::population::Member;
use crate::grade::value::{ThresholdValue, Thresholds};
use crate::math::skew;

/// Target marker for global variables.
pub const GLOBAL_MARKER: &str = "Global";
/// Target marker for verbatim passthrough rows.
pub const VERBATIM_MARKER: &str = "*";

/// Where an interpolated value is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// `attribute = value`
    Global,
    /// `target{attribute = value}`, e.g. `forall` or `forsec "dend"`.
    Iteration(String),
    /// `target.attribute = value`
    Section(String),
    /// Empty target: the row is still interpolated but emits nothing.
    Silent,
}

impl Target {
    /// Classify the first table field. The verbatim marker is handled by the caller.
    pub fn classify(text: &str) -> Target {
        let text = text.trim();
        if text.is_empty() {
            Target::Silent
        } else if text == GLOBAL_MARKER {
            Target::Global
        } else if text.starts_with("forall") || text.starts_with("forsec") {
            Target::Iteration(text.to_string())
        } else {
            Target::Section(text.to_string())
        }
    }
}

/// A fully parsed row whose value is interpolated between lt and ht.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRow {
    pub target: Target,
    pub attribute: String,
    pub thresholds: Thresholds,
    pub nonlinearity: f64,
}

impl ParameterRow {
    /// Skew for this row; each row carries its own nonlinear indicator.
    pub fn skew_for(&self, member: Member) -> f64 {
        skew(member.index, member.population.size(), self.nonlinearity)
    }

    pub fn value_for(&self, member: Member) -> ThresholdValue {
        self.thresholds.at(self.skew_for(member))
    }

    /// Statement text assigning `value`, or `None` for a silent row.
    pub fn statement(&self, value: &str) -> Option<String> {
        let attribute = &self.attribute;
        match &self.target {
            Target::Global => Some(format!("{attribute} = {value}")),
            Target::Iteration(block) => Some(format!("{block}{{{attribute} = {value}}}")),
            Target::Section(section) => Some(format!("{section}.{attribute} = {value}")),
            Target::Silent => None,
        }
    }

    /// Short label for tables and logs (`soma.diam`, `celsius`, `forall{g_pas}`).
    pub fn label(&self) -> String {
        match &self.target {
            Target::Global | Target::Silent => self.attribute.clone(),
            Target::Iteration(block) => format!("{block}{{{}}}", self.attribute),
            Target::Section(section) => format!("{section}.{}", self.attribute),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowKind {
    Verbatim(String),
    Parameter(ParameterRow),
}

/// A usable table row with its 1-based line number in the CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub line: usize,
    pub kind: RowKind,
}

/// One line written into a member's hoc file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmittedLine {
    pub line: usize,
    pub text: String,
}

/// Interpolate a row for one member and render its statement.
pub fn interpolate_row(row: &TableRow, member: Member, format: NumberFormat) -> Option<EmittedLine> {
    let text = match &row.kind {
        RowKind::Verbatim(text) => text.clone(),
        RowKind::Parameter(param) => {
            let value = param.value_for(member).render(format);
            param.statement(&value)?
        }
    };
    Some(EmittedLine { line: row.line, text })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grade::population::Population;

    fn param(target: &str, attribute: &str, low: &str, high: &str, k: f64) -> TableRow {
        TableRow {
            line: 2,
            kind: RowKind::Parameter(ParameterRow {
                target: Target::classify(target),
                attribute: attribute.to_string(),
                thresholds: Thresholds::parse(2, low, high).unwrap(),
                nonlinearity: k,
            }),
        }
    }

    fn text_at(row: &TableRow, index: usize, n: usize) -> Option<String> {
        let population = Population::new(n).unwrap();
        interpolate_row(row, population.member(index), NumberFormat::Fixed(2)).map(|l| l.text)
    }

    #[test]
    fn classify_targets() {
        assert_eq!(Target::classify(""), Target::Silent);
        assert_eq!(Target::classify("  "), Target::Silent);
        assert_eq!(Target::classify("Global"), Target::Global);
        assert_eq!(Target::classify("forall"), Target::Iteration("forall".to_string()));
        assert_eq!(
            Target::classify("forsec \"dend\""),
            Target::Iteration("forsec \"dend\"".to_string())
        );
        assert_eq!(Target::classify(" soma "), Target::Section("soma".to_string()));
    }

    #[test]
    fn section_row_follows_reference_table() {
        for (k, expected) in [(0.0, "55.00"), (1.0, "50.00"), (2.0, "47.50")] {
            let row = param("soma", "diam", "45", "65", k);
            assert_eq!(text_at(&row, 0, 11).unwrap(), "soma.diam = 45.00");
            assert_eq!(text_at(&row, 5, 11).unwrap(), format!("soma.diam = {expected}"));
            assert_eq!(text_at(&row, 10, 11).unwrap(), "soma.diam = 65.00");
        }
    }

    #[test]
    fn global_and_iteration_statements() {
        let row = param("Global", "celsius", "6.3", "36", 0.0);
        assert_eq!(text_at(&row, 0, 2).unwrap(), "celsius = 6.30");

        let row = param("forall", "Ra", "100", "200", 0.0);
        assert_eq!(text_at(&row, 1, 3).unwrap(), "forall{Ra = 150.00}");
    }

    #[test]
    fn ranging_statement_rejoins_components() {
        let row = param("dend", "diam(0:1)", "10:4", "20:8", 0.0);
        assert_eq!(text_at(&row, 1, 3).unwrap(), "dend.diam(0:1) = 15.00:6.00");
    }

    #[test]
    fn verbatim_and_silent_rows() {
        let verbatim = TableRow {
            line: 3,
            kind: RowKind::Verbatim("create soma".to_string()),
        };
        assert_eq!(text_at(&verbatim, 4, 5).unwrap(), "create soma");

        let silent = param("", "unused", "1", "2", 0.0);
        assert_eq!(text_at(&silent, 1, 3), None);
    }

    #[test]
    fn each_row_uses_its_own_indicator() {
        let population = Population::new(11).unwrap();
        let member = population.member(5);
        let steep = param("soma", "diam", "45", "65", 2.0);
        let linear = param("soma", "L", "45", "65", 0.0);
        let (RowKind::Parameter(steep), RowKind::Parameter(linear)) = (&steep.kind, &linear.kind) else {
            unreachable!()
        };
        assert!((steep.skew_for(member) - 0.125).abs() < 1e-12);
        assert!((linear.skew_for(member) - 0.5).abs() < 1e-12);
    }
}
