//! Domain types used throughout the pipeline.
//!
//! This module defines the run configuration (`GenerateConfig`) and the
//! number formatting policy for emitted statements (`NumberFormat`).

pub mod types;

pub use types::*;
