//! Input/output helpers.
//!
//! - parameter-table CSV ingest + row classification (`ingest`)
//! - per-member hoc files (`export`)
//! - JSON manifest (`manifest`)

pub mod export;
pub mod ingest;
pub mod manifest;

pub use export::*;
pub use ingest::*;
pub use manifest::*;
