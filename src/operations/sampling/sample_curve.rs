use crate::error::{OperationError, Result};
use crate::geometry::Curve;
use crate::math::Point3;

/// Default normalized-parameter step between samples.
pub const DEFAULT_SAMPLE_STEP: f64 = 0.01;

/// Upper bound on the number of samples a single call may produce.
const MAX_SAMPLES: f64 = 1_000_000.0;

/// Slack when deciding whether a multiple of the step reaches the end.
const STEP_EPSILON: f64 = 1e-9;

/// Discretizes a bounded curve at a fixed normalized-parameter step.
///
/// Samples are taken at `0, step, 2·step, …` and the curve end is always
/// included; when `1` is not a multiple of the step the last interval is
/// shorter.
pub struct SampleCurve<'a, C: Curve + ?Sized> {
    curve: &'a C,
    step: f64,
}

impl<'a, C: Curve + ?Sized> SampleCurve<'a, C> {
    /// Creates a new `SampleCurve` operation with the default step.
    #[must_use]
    pub fn new(curve: &'a C) -> Self {
        Self {
            curve,
            step: DEFAULT_SAMPLE_STEP,
        }
    }

    /// Sets the normalized-parameter step.
    #[must_use]
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Executes the sampling.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidArgument`] if the step is not
    /// positive and finite (or so small that the sample count explodes),
    /// and a geometry error if the curve is unbounded.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn execute(&self) -> Result<Vec<Point3>> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(OperationError::InvalidArgument(format!(
                "sample step must be positive, got {}",
                self.step
            ))
            .into());
        }
        if 1.0 / self.step > MAX_SAMPLES {
            return Err(OperationError::InvalidArgument(format!(
                "sample step {} yields too many samples",
                self.step
            ))
            .into());
        }

        let count = ((1.0 + STEP_EPSILON) / self.step).floor() as usize;
        let mut params: Vec<f64> = (0..=count).map(|i| i as f64 * self.step).collect();
        if params.last().is_some_and(|&last| last < 1.0 - STEP_EPSILON) {
            params.push(1.0);
        }

        params
            .into_iter()
            .map(|s| self.curve.evaluate_normalized(s.min(1.0)))
            .collect()
    }
}
