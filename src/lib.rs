//! `cellpop` library crate.
//!
//! Generates a graded population of cell models: every parameter row of an
//! lt/ht table is interpolated between its low- and high-threshold values,
//! shaped by a per-row nonlinear indicator, and each member gets its own hoc
//! file.
//!
//! The binary (`cellpop`) is a thin wrapper around this library so that:
//!
//! - the interpolation engine is testable without spawning processes
//! - file I/O and prompting stay at the edges

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod grade;
pub mod io;
pub mod math;
pub mod report;
