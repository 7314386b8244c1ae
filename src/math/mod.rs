//! Mathematical utilities: the nonlinear skew function.

pub mod skew;

pub use skew::*;
