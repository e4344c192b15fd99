use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Tolerance for exact grid alignment: boundary exclusion and origin detection.
pub const STRICT_EPSILON: f64 = 1e-15;

/// Tolerance for coincidence checks that must absorb arithmetic drift.
pub const LEAN_EPSILON: f64 = 1e-14;

/// Compares two values with a tolerance relative to their magnitude.
///
/// The tolerance is `epsilon * max(|a|, |b|)`, so the comparison keeps the
/// same precision on a window of width `1e-15` near zero as on one at `1e9`.
/// Zero only equals zero.
#[must_use]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    if a == b {
        return true;
    }
    let scale = a.abs().max(b.abs());
    (a - b).abs() <= epsilon * scale
}

/// Floored modulo for a positive `modulus`.
///
/// The remainder is always in `[0, modulus)`, which keeps grid alignment
/// independent of the sign of `value`.
#[must_use]
pub fn floor_mod(value: f64, modulus: f64) -> f64 {
    let remainder = value - modulus * (value / modulus).floor();
    // Rounding in the division can push the remainder onto the modulus itself.
    if remainder >= modulus || remainder < 0.0 {
        0.0
    } else {
        remainder
    }
}

/// Non-degenerate span range enforced on each viewport axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanLimits {
    pub min_span: f64,
    pub max_span: f64,
}

impl Default for SpanLimits {
    fn default() -> Self {
        Self {
            min_span: 1e-15,
            max_span: 1e15,
        }
    }
}

impl SpanLimits {
    pub fn new(min_span: f64, max_span: f64) -> ChartResult<Self> {
        Self { min_span, max_span }.validate()
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.min_span.is_finite() || self.min_span <= 0.0 {
            return Err(ChartError::InvalidData(
                "span limits min_span must be finite and > 0".to_owned(),
            ));
        }
        if !self.max_span.is_finite() || self.max_span < self.min_span {
            return Err(ChartError::InvalidData(
                "span limits max_span must be finite and >= min_span".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Returns `true` when `start..end` is a finite span inside the limits.
    #[must_use]
    pub fn accepts(self, start: f64, end: f64) -> bool {
        if !start.is_finite() || !end.is_finite() {
            return false;
        }
        let span = (end - start).abs();
        span.is_finite() && span >= self.min_span && span <= self.max_span
    }

    /// Clamps a span magnitude into the limits.
    #[must_use]
    pub fn clamp_span(self, span: f64) -> f64 {
        span.abs().clamp(self.min_span, self.max_span)
    }

    /// Nudges the endpoints of `start..end` until the span is inside the limits.
    ///
    /// Endpoints rebuilt around a pivot are rounded to the representable
    /// values near that pivot, so a span clamped to exactly `min_span` or
    /// `max_span` can land just outside the limits. Each step moves both
    /// endpoints by at least one unit in the last place. `ascending` gives the
    /// orientation of the result, which matters once both endpoints round to
    /// the same value.
    ///
    /// Non-finite input is returned as is and still fails [`SpanLimits::accepts`].
    #[must_use]
    pub fn fit_span(self, start: f64, end: f64, ascending: bool) -> (f64, f64) {
        if !start.is_finite() || !end.is_finite() {
            return (start, end);
        }
        let mut low = start.min(end);
        let mut high = start.max(end);
        for _ in 0..FIT_SPAN_MAX_STEPS {
            if !low.is_finite() || !high.is_finite() {
                break;
            }
            let span = high - low;
            if span < self.min_span {
                let half = (self.min_span - span) * 0.5;
                low -= half.max(ulp_bound(low));
                high += half.max(ulp_bound(high));
            } else if span > self.max_span {
                let half = (span - self.max_span) * 0.5;
                low += half.max(ulp_bound(low));
                high -= half.max(ulp_bound(high));
            } else {
                break;
            }
        }
        if ascending { (low, high) } else { (high, low) }
    }
}

const FIT_SPAN_MAX_STEPS: usize = 64;

/// Upper bound on the spacing of representable values around `value`.
fn ulp_bound(value: f64) -> f64 {
    (value.abs() * f64::EPSILON).max(f64::MIN_POSITIVE)
}
