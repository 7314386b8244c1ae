//! Reporting utilities: run summary, preview and curve tables.

pub mod format;

pub use format::*;
