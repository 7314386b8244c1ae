//! Population of generated members and their per-member statements.
//!
//! Members are independent of each other, so they are built in parallel and
//! collected back in index order.

use rayon::prelude::*;

use crate::domain::NumberFormat;
use crate::error::TableError;
use crate::grade::row::{EmittedLine, TableRow, interpolate_row};

/// Validated population size (`>= 2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Population {
    size: usize,
}

impl Population {
    pub fn new(size: usize) -> Result<Self, TableError> {
        if size < 2 {
            return Err(TableError::DegeneratePopulation { size });
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn member(&self, index: usize) -> Member {
        debug_assert!(index < self.size);
        Member {
            index,
            population: *self,
        }
    }

    pub fn members(self) -> impl Iterator<Item = Member> {
        (0..self.size).map(move |i| self.member(i))
    }
}

/// One member: its index and the population it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    pub index: usize,
    pub population: Population,
}

impl Member {
    pub fn is_low_extreme(&self) -> bool {
        self.index == 0
    }

    pub fn is_high_extreme(&self) -> bool {
        self.index + 1 == self.population.size()
    }
}

/// The statements generated for one member, in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberOutput {
    pub index: usize,
    pub lines: Vec<EmittedLine>,
}

impl MemberOutput {
    /// File content: one statement per line, newline-terminated.
    pub fn contents(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text);
            out.push('\n');
        }
        out
    }
}

/// Statements for a single member.
pub fn build_member(rows: &[TableRow], member: Member, format: NumberFormat) -> MemberOutput {
    let lines = rows
        .iter()
        .filter_map(|row| interpolate_row(row, member, format))
        .collect();
    MemberOutput {
        index: member.index,
        lines,
    }
}

/// Statements for every member, ordered by index.
pub fn build_population(rows: &[TableRow], population: Population, format: NumberFormat) -> Vec<MemberOutput> {
    (0..population.size())
        .into_par_iter()
        .map(|i| build_member(rows, population.member(i), format))
        .collect()
}
