mod arc;
mod line;

pub use arc::Arc;
pub use line::Line;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    /// Returns `true` if both ends of the range are finite.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.t_min.is_finite() && self.t_max.is_finite()
    }

    /// Width of the parameter range.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.t_max - self.t_min
    }
}

/// Trait for parametric curves in 3D space.
pub trait Curve {
    /// Evaluates the curve at parameter `t`, returning the 3D point.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is out of range or evaluation fails.
    fn evaluate(&self, t: f64) -> Result<Point3>;

    /// Computes the tangent vector at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is out of range or the tangent is degenerate.
    fn tangent(&self, t: f64) -> Result<Vector3>;

    /// Returns the parameter domain of the curve.
    fn domain(&self) -> CurveDomain;

    /// Returns whether the curve is closed.
    fn is_closed(&self) -> bool;

    /// Evaluates the curve at normalized parameter `s`, where `0` maps to the
    /// start of the domain and `1` to its end.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] for an unbounded curve and
    /// [`GeometryError::ParameterOutOfRange`] if `s` lies outside `[0, 1]`.
    fn evaluate_normalized(&self, s: f64) -> Result<Point3> {
        let domain = self.domain();
        if !domain.is_bounded() {
            return Err(
                GeometryError::Degenerate("cannot normalize an unbounded curve".into()).into(),
            );
        }
        if !(-TOLERANCE..=1.0 + TOLERANCE).contains(&s) {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "normalized parameter",
                value: s,
                min: 0.0,
                max: 1.0,
            }
            .into());
        }
        self.evaluate(domain.t_min + s.clamp(0.0, 1.0) * domain.span())
    }
}

/// A finite curve segment: the edge kind used by profiles and the curve
/// geometry handed to the host.
#[derive(Debug, Clone)]
pub enum BoundedCurve {
    /// A straight segment.
    Line(Line),
    /// A circular arc.
    Arc(Arc),
}

impl BoundedCurve {
    /// Creates a straight segment between two points.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if the points coincide.
    pub fn line(start: Point3, end: Point3) -> Result<Self> {
        Ok(Self::Line(Line::bound(start, end)?))
    }

    /// Creates an arc from `start` to `end` passing through `on_arc`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the points are collinear.
    pub fn arc(start: Point3, end: Point3, on_arc: Point3) -> Result<Self> {
        Ok(Self::Arc(Arc::through_points(start, end, on_arc)?))
    }

    /// First point of the segment.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    pub fn start_point(&self) -> Result<Point3> {
        self.evaluate(self.domain().t_min)
    }

    /// Last point of the segment.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation fails.
    pub fn end_point(&self) -> Result<Point3> {
        self.evaluate(self.domain().t_max)
    }

    /// Arc length of the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Self::Line(line) => line.domain().span(),
            Self::Arc(arc) => arc.radius() * arc.domain().span(),
        }
    }
}

impl Curve for BoundedCurve {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        match self {
            Self::Line(line) => line.evaluate(t),
            Self::Arc(arc) => arc.evaluate(t),
        }
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        match self {
            Self::Line(line) => line.tangent(t),
            Self::Arc(arc) => arc.tangent(t),
        }
    }

    fn domain(&self) -> CurveDomain {
        match self {
            Self::Line(line) => line.domain(),
            Self::Arc(arc) => arc.domain(),
        }
    }

    fn is_closed(&self) -> bool {
        match self {
            Self::Line(line) => line.is_closed(),
            Self::Arc(arc) => arc.is_closed(),
        }
    }
}
