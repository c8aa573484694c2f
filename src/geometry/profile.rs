use crate::error::{GeometryError, Result, TopologyError};
use crate::math::{newell_normal, Point3, Vector3};
use crate::tessellation::TessellationParams;

use super::curve::{BoundedCurve, Curve};

/// Maximum gap between consecutive segment ends.
const CONNECT_TOLERANCE: f64 = 1e-9;

/// Maximum distance of a discretized profile point from the profile plane.
const PLANARITY_TOLERANCE: f64 = 1e-7;

/// A closed planar loop of line and arc segments.
///
/// Each segment ends where the next begins, and the last segment ends where
/// the first begins.
#[derive(Debug, Clone)]
pub struct Profile {
    segments: Vec<BoundedCurve>,
}

impl Profile {
    /// Creates a profile from connected segments.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::InvalidTopology`] for an empty list or a gap
    /// between consecutive segments, [`TopologyError::WireNotClosed`] if the
    /// loop does not return to its start.
    pub fn new(segments: Vec<BoundedCurve>) -> Result<Self> {
        let Some(first) = segments.first() else {
            return Err(TopologyError::InvalidTopology("profile has no segments".into()).into());
        };
        let first_start = first.start_point()?;

        for pair in segments.windows(2) {
            let gap = (pair[1].start_point()? - pair[0].end_point()?).norm();
            if gap > CONNECT_TOLERANCE {
                return Err(TopologyError::InvalidTopology(format!(
                    "profile segments are {gap:e} apart"
                ))
                .into());
            }
        }

        let last_end = segments[segments.len() - 1].end_point()?;
        if (last_end - first_start).norm() > CONNECT_TOLERANCE {
            return Err(TopologyError::WireNotClosed.into());
        }

        Ok(Self { segments })
    }

    /// Creates a closed polygon through `points`; the closing edge is implied.
    ///
    /// # Errors
    ///
    /// Returns an error for fewer than 3 points or two consecutive
    /// coincident points.
    pub fn polygon(points: &[Point3]) -> Result<Self> {
        if points.len() < 3 {
            return Err(TopologyError::InvalidTopology(
                "polygon profile needs at least 3 points".into(),
            )
            .into());
        }
        let n = points.len();
        let segments = (0..n)
            .map(|i| BoundedCurve::line(points[i], points[(i + 1) % n]))
            .collect::<Result<Vec<_>>>()?;
        Self::new(segments)
    }

    /// The segments of the loop in order.
    #[must_use]
    pub fn segments(&self) -> &[BoundedCurve] {
        &self.segments
    }

    /// Chords the loop into a closed polygon.
    ///
    /// Lines contribute their start point; arcs are split by
    /// [`TessellationParams::arc_segments`]. The closing point is not
    /// repeated.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if fewer than 3 points result
    /// or the points do not lie in one plane.
    #[allow(clippy::cast_precision_loss)]
    pub fn discretize(&self, params: &TessellationParams) -> Result<Vec<Point3>> {
        params.validate()?;

        let mut points = Vec::new();
        for segment in &self.segments {
            match segment {
                BoundedCurve::Line(line) => points.push(line.evaluate(line.domain().t_min)?),
                BoundedCurve::Arc(arc) => {
                    let domain = arc.domain();
                    let count = params.arc_segments(arc.radius(), domain.span());
                    for i in 0..count {
                        let t = domain.t_min + domain.span() * i as f64 / count as f64;
                        points.push(arc.evaluate(t)?);
                    }
                }
            }
        }

        if points.len() < 3 {
            return Err(GeometryError::Degenerate("profile encloses no area".into()).into());
        }
        let normal = plane_normal(&points)?;
        let origin = points[0];
        if points
            .iter()
            .any(|q| (q - origin).dot(&normal).abs() > PLANARITY_TOLERANCE)
        {
            return Err(GeometryError::Degenerate("profile is not planar".into()).into());
        }
        Ok(points)
    }

    /// Unit normal of the loop by its winding.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the loop encloses no area.
    pub fn normal(&self, params: &TessellationParams) -> Result<Vector3> {
        plane_normal(&self.discretize(params)?)
    }
}

fn plane_normal(points: &[Point3]) -> Result<Vector3> {
    newell_normal(points)
        .ok_or_else(|| GeometryError::Degenerate("profile encloses no area".into()).into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn square_polygon() {
        let profile = Profile::polygon(&[
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
        ])
        .unwrap();
        assert_eq!(profile.segments().len(), 4);
        let points = profile.discretize(&TessellationParams::default()).unwrap();
        assert_eq!(points.len(), 4);
        assert_relative_eq!(
            profile.normal(&TessellationParams::default()).unwrap(),
            Vector3::z(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn half_disc_chords_the_arc() {
        let top = p(0.0, 1.0, 0.0);
        let bottom = p(0.0, -1.0, 0.0);
        let profile = Profile::new(vec![
            BoundedCurve::line(bottom, top).unwrap(),
            BoundedCurve::arc(top, bottom, p(1.0, 0.0, 0.0)).unwrap(),
        ])
        .unwrap();
        let params = TessellationParams::default();
        let points = profile.discretize(&params).unwrap();
        assert_eq!(points.len(), 1 + params.arc_segments(1.0, std::f64::consts::PI));
        for q in &points[1..] {
            assert_relative_eq!(q.coords.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn gap_between_segments_is_rejected() {
        let result = Profile::new(vec![
            BoundedCurve::line(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)).unwrap(),
            BoundedCurve::line(p(1.5, 0.0, 0.0), p(0.0, 1.0, 0.0)).unwrap(),
            BoundedCurve::line(p(0.0, 1.0, 0.0), p(0.0, 0.0, 0.0)).unwrap(),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn open_loop_is_rejected() {
        let result = Profile::new(vec![
            BoundedCurve::line(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)).unwrap(),
            BoundedCurve::line(p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0)).unwrap(),
        ]);
        assert!(matches!(
            result,
            Err(crate::error::ShapemarkError::Topology(TopologyError::WireNotClosed))
        ));
    }

    #[test]
    fn empty_profile_is_rejected() {
        assert!(Profile::new(Vec::new()).is_err());
    }

    #[test]
    fn skew_polygon_is_not_planar() {
        let profile = Profile::polygon(&[
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 1.0),
            p(0.0, 1.0, 0.0),
        ])
        .unwrap();
        assert!(profile.discretize(&TessellationParams::default()).is_err());
    }
}
