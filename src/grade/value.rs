//! Threshold values and their interpolation.
//!
//! A threshold is either a single number (`45`) or a ranging value: two
//! numbers joined by `:` (`10:4`), interpolated component-wise. The shape is
//! decided once at parse time; low and high must agree on it.

use crate::domain::{NumberFormat, RANGE_SEPARATOR};
use crate::error::{TableError, TableField};

/// Scalar vs. ranging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Scalar,
    Range,
}

/// One low- or high-threshold value (or an interpolated result).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdValue {
    Scalar(f64),
    Range(f64, f64),
}

impl ThresholdValue {
    pub fn shape(&self) -> ValueShape {
        match self {
            ThresholdValue::Scalar(_) => ValueShape::Scalar,
            ThresholdValue::Range(..) => ValueShape::Range,
        }
    }

    /// Render as statement text; ranging values are re-joined with `:`.
    pub fn render(&self, format: NumberFormat) -> String {
        match *self {
            ThresholdValue::Scalar(v) => format.format(v),
            ThresholdValue::Range(start, end) => {
                format!("{}{RANGE_SEPARATOR}{}", format.format(start), format.format(end))
            }
        }
    }
}

/// Low and high disagree on shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMismatch {
    pub low: ValueShape,
    pub high: ValueShape,
}

/// Low/high pair with matching shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    low: ThresholdValue,
    high: ThresholdValue,
}

impl Thresholds {
    /// Pair two parsed values, rejecting a shape mismatch.
    pub fn new(low: ThresholdValue, high: ThresholdValue) -> Result<Self, ShapeMismatch> {
        if low.shape() != high.shape() {
            return Err(ShapeMismatch {
                low: low.shape(),
                high: high.shape(),
            });
        }
        Ok(Self { low, high })
    }

    /// Parse the lt/ht fields of table line `line`.
    pub fn parse(line: usize, low: &str, high: &str) -> Result<Self, TableError> {
        let low_value = parse_threshold(line, TableField::Low, low)?;
        let high_value = parse_threshold(line, TableField::High, high)?;
        Thresholds::new(low_value, high_value).map_err(|_| TableError::ShapeMismatch {
            line,
            low: low.trim().to_string(),
            high: high.trim().to_string(),
        })
    }

    pub fn low(&self) -> ThresholdValue {
        self.low
    }

    pub fn high(&self) -> ThresholdValue {
        self.high
    }

    pub fn shape(&self) -> ValueShape {
        self.low.shape()
    }

    /// Value at `skew ∈ [0, 1]`; the shapes are already known to match.
    pub fn at(&self, skew: f64) -> ThresholdValue {
        match (self.low, self.high) {
            (ThresholdValue::Scalar(lo), ThresholdValue::Scalar(hi)) => {
                ThresholdValue::Scalar(interpolate_scalar(lo, hi, skew))
            }
            (ThresholdValue::Range(lo0, lo1), ThresholdValue::Range(hi0, hi1)) => ThresholdValue::Range(
                interpolate_scalar(lo0, hi0, skew),
                interpolate_scalar(lo1, hi1, skew),
            ),
            // Unreachable: `new` rejects mixed shapes.
            (low, _) => low,
        }
    }
}

/// `low + skew * (high - low)`.
pub fn interpolate_scalar(low: f64, high: f64, skew: f64) -> f64 {
    // `low + (high - low)` can round away from `high`; the last member must land on it.
    if skew == 1.0 {
        return high;
    }
    low + skew * (high - low)
}

/// Interpolate two values of the same shape.
pub fn interpolate(low: ThresholdValue, high: ThresholdValue, skew: f64) -> Result<ThresholdValue, ShapeMismatch> {
    Ok(Thresholds::new(low, high)?.at(skew))
}

/// Parse a threshold field: `45`, `-0.5`, `1e-3` or a ranging `10:4`.
pub fn parse_threshold(line: usize, field: TableField, text: &str) -> Result<ThresholdValue, TableError> {
    let text = text.trim();
    let parts: Vec<&str> = text.split(RANGE_SEPARATOR).collect();
    match parts.as_slice() {
        [single] => Ok(ThresholdValue::Scalar(parse_number(line, field, single)?)),
        [start, end] => Ok(ThresholdValue::Range(
            parse_number(line, field, start)?,
            parse_number(line, field, end)?,
        )),
        _ => Err(TableError::NonNumericValue {
            line,
            field,
            text: text.to_string(),
        }),
    }
}

/// Strict numeric parse; the text is never evaluated as an expression.
pub fn parse_number(line: usize, field: TableField, text: &str) -> Result<f64, TableError> {
    let text = text.trim();
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(TableError::NonNumericValue {
            line,
            field,
            text: text.to_string(),
        }),
    }
}
