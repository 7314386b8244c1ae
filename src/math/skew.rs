//! Nonlinear skew between the low- and high-threshold extremes.
//!
//! For member `i` of a population of `n`, the fractional position is
//! `p = i / (n - 1)`. The nonlinear indicator `k` shapes it:
//!
//! - `k >= 0`: `skew = p^(1 + k)` (members cluster near the low extreme)
//! - `k < 0`:  `skew = 1 - (1 - p)^(1 - k)` (members cluster near the high extreme)
//!
//! The two branches mirror each other, and both leave the end points fixed:
//! `p = 0` maps to exactly `0.0` and `p = 1` to exactly `1.0` for every finite `k`.

/// Fractional position of `index` within a population of `population_size`.
///
/// Callers validate `population_size >= 2` (see `grade::Population`); the
/// divisor is clamped so a degenerate size still yields a finite value.
pub fn position_fraction(index: usize, population_size: usize) -> f64 {
    debug_assert!(population_size >= 2, "population size must be >= 2");
    debug_assert!(index < population_size.max(1), "index out of range");

    let last = population_size.saturating_sub(1).max(1);
    index as f64 / last as f64
}

/// Interpolation fraction in `[0, 1]` for one (member, row) pair.
pub fn skew(index: usize, population_size: usize, nonlinearity: f64) -> f64 {
    skew_at(position_fraction(index, population_size), nonlinearity)
}

/// Apply the nonlinear indicator to a fractional position `fraction ∈ [0, 1]`.
pub fn skew_at(fraction: f64, nonlinearity: f64) -> f64 {
    if nonlinearity >= 0.0 {
        fraction.powf(1.0 + nonlinearity)
    } else {
        1.0 - (1.0 - fraction).powf(1.0 - nonlinearity)
    }
}
