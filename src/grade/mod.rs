//! Interpolation engine.
//!
//! Responsibilities:
//!
//! - parse and interpolate threshold values (scalar and ranging)
//! - render parameter rows into hoc statements
//! - build every member of the population (parallel)

pub mod population;
pub mod row;
pub mod value;

pub use population::*;
pub use row::*;
pub use value::*;
