//! Lazy sampling of the controller's response curve.
//!
//! A [`Curve`] borrows the controller immutably and yields
//! `(process_value, duty_cycle)` points on demand.  Iterating it twice
//! yields the same points; nothing is cached and nothing is written back.

use crate::error::ConfigError;

use super::yap::ControlLaw;

/// Slack on `(end - start) / step`, in ULPs of the quotient.  Keeps an
/// on-grid end point that division left a hair short, without pulling in
/// a point that lies genuinely past `end`.
const GRID_SLACK_ULPS: f64 = 4.0;

/// One sampled point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub process_value: f64,
    pub duty_cycle: f64,
}

/// Restartable view of the response curve over `[start, end]`.
#[derive(Debug, Clone, Copy)]
pub struct Curve<'a> {
    law: &'a ControlLaw,
    start: f64,
    step: f64,
    count: usize,
}

impl<'a> Curve<'a> {
    pub(crate) fn new(
        law: &'a ControlLaw,
        start: f64,
        end: f64,
        step: f64,
    ) -> Result<Self, ConfigError> {
        if !start.is_finite() {
            return Err(ConfigError::NonFinite("start"));
        }
        if !end.is_finite() {
            return Err(ConfigError::NonFinite("end"));
        }
        if !(step.is_finite() && step > 0.0) {
            return Err(ConfigError::InvalidStep(step));
        }

        let count = if end < start {
            0
        } else {
            let steps = (end - start) / step;
            let steps = (steps + steps * GRID_SLACK_ULPS * f64::EPSILON).floor();
            // Also catches an `inf` span from subtracting far-apart bounds.
            if steps >= usize::MAX as f64 {
                return Err(ConfigError::CurveTooLong);
            }
            steps as usize + 1
        };

        Ok(Self {
            law,
            start,
            step,
            count,
        })
    }

    /// Fresh iterator from the first point.
    pub fn iter(&self) -> CurveIter<'a> {
        CurveIter {
            law: self.law,
            start: self.start,
            step: self.step,
            index: 0,
            count: self.count,
        }
    }

    /// Number of points the curve yields.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl<'a> IntoIterator for &Curve<'a> {
    type Item = CurvePoint;
    type IntoIter = CurveIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for Curve<'a> {
    type Item = CurvePoint;
    type IntoIter = CurveIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over [`Curve`] points.
#[derive(Debug, Clone)]
pub struct CurveIter<'a> {
    law: &'a ControlLaw,
    start: f64,
    step: f64,
    index: usize,
    count: usize,
}

impl Iterator for CurveIter<'_> {
    type Item = CurvePoint;

    fn next(&mut self) -> Option<CurvePoint> {
        if self.index >= self.count {
            return None;
        }
        // Computed from the index, not accumulated, so long curves do not drift.
        let process_value = self.start + self.index as f64 * self.step;
        self.index += 1;
        Some(CurvePoint {
            process_value,
            duty_cycle: self.law.evaluate(process_value),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CurveIter<'_> {}
