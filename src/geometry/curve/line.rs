use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// A line defined by an origin point and a unit direction vector.
///
/// The parametric form is `P(t) = origin + t * direction`, so `t` is arc
/// length. A line is unbounded unless created with [`Line::bound`], in which
/// case the domain is `[0, |end - start|]`.
#[derive(Debug, Clone)]
pub struct Line {
    origin: Point3,
    direction: Vector3,
    domain: CurveDomain,
}

impl Line {
    /// Creates a new unbounded line from an origin and direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vector is zero-length.
    pub fn new(origin: Point3, direction: Vector3) -> Result<Self> {
        let len = direction.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            origin,
            direction: direction / len,
            domain: CurveDomain::new(f64::NEG_INFINITY, f64::INFINITY),
        })
    }

    /// Creates a bounded segment from `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns an error if the two points coincide.
    pub fn bound(start: Point3, end: Point3) -> Result<Self> {
        let direction = end - start;
        let len = direction.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self {
            origin: start,
            direction: direction / len,
            domain: CurveDomain::new(0.0, len),
        })
    }

    /// Returns the origin point of the line.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the unit direction vector of the line.
    #[must_use]
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }
}

impl Curve for Line {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.origin + self.direction * t)
    }

    fn tangent(&self, _t: f64) -> Result<Vector3> {
        Ok(self.direction)
    }

    fn domain(&self) -> CurveDomain {
        self.domain
    }

    fn is_closed(&self) -> bool {
        false
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bound_line_domain_is_length() {
        let line = Line::bound(Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 4.0, 0.0)).unwrap();
        let domain = line.domain();
        assert_relative_eq!(domain.t_min, 0.0);
        assert_relative_eq!(domain.t_max, 5.0);
        assert_relative_eq!(line.evaluate(5.0).unwrap(), Point3::new(3.0, 4.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn coincident_points_fail() {
        let q = Point3::new(1.0, 1.0, 1.0);
        assert!(Line::bound(q, q).is_err());
    }

    #[test]
    fn unbounded_line_domain() {
        let line = Line::new(Point3::origin(), Vector3::new(0.0, 2.0, 0.0)).unwrap();
        assert!(!line.domain().is_bounded());
        assert_relative_eq!(*line.direction(), Vector3::y());
    }
}
