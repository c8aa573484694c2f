use crate::error::{OperationError, Result};
use crate::geometry::Profile;
use crate::math::{newell_normal, Point3, Vector3, TOLERANCE};
use crate::operations::creation::{MakeShell, MakeSolid};
use crate::tessellation::TessellationParams;
use crate::topology::{SolidId, TopologyStore};

/// Extrudes a closed profile along a direction vector to create a prism.
pub struct Extrude {
    profile: Profile,
    direction: Vector3,
    params: TessellationParams,
}

impl Extrude {
    /// Creates a new `Extrude` operation with default tessellation parameters.
    #[must_use]
    pub fn new(profile: Profile, direction: Vector3) -> Self {
        Self {
            profile,
            direction,
            params: TessellationParams::default(),
        }
    }

    /// Sets the parameters used to chord arc segments.
    #[must_use]
    pub fn with_params(mut self, params: TessellationParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the extrusion, creating the solid in the topology store.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidArgument`] if the direction is
    /// zero-length, [`OperationError::Failed`] if it lies in the profile
    /// plane, and a geometry error if the profile cannot be discretized.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        let length = self.direction.norm();
        if !length.is_finite() || length < TOLERANCE {
            return Err(
                OperationError::InvalidArgument("extrude direction must be non-zero".into()).into(),
            );
        }

        let base = self.profile.discretize(&self.params)?;
        let normal = newell_normal(&base)
            .ok_or_else(|| OperationError::Failed("profile encloses no area".into()))?;
        let alignment = normal.dot(&self.direction);
        if alignment.abs() < TOLERANCE {
            return Err(OperationError::Failed(
                "extrude direction lies in the profile plane".into(),
            )
            .into());
        }

        // Base winds counter-clockwise about the direction, so the bottom
        // cap is the reversed base and the side quads face outward.
        let base: Vec<Point3> = if alignment > 0.0 {
            base
        } else {
            base.into_iter().rev().collect()
        };

        let n = base.len();
        let mut points = base.clone();
        points.extend(base.iter().map(|p| p + self.direction));

        let mut polygons = Vec::with_capacity(n + 2);
        polygons.push((0..n).rev().collect());
        polygons.push((n..2 * n).collect());
        for i in 0..n {
            let j = (i + 1) % n;
            polygons.push(vec![i, j, n + j, n + i]);
        }

        let shell = MakeShell::new(points, polygons).execute(store)?;
        MakeSolid::new(shell).execute(store)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::BoundedCurve;
    use crate::operations::query::{IsValid, Volume};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn unit_square() -> Profile {
        Profile::polygon(&[
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 0.0),
            p(0.0, 1.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn square_prism() {
        let mut store = TopologyStore::new();
        let solid = Extrude::new(unit_square(), Vector3::new(0.0, 0.0, 3.0))
            .execute(&mut store)
            .unwrap();

        assert_eq!(store.solid_faces(solid).unwrap().len(), 6);
        assert_eq!(store.solid_vertices(solid).unwrap().len(), 8);
        assert!(IsValid::new(solid).execute(&store));
        assert_relative_eq!(Volume::new(solid).execute(&store).unwrap(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn reversed_direction_still_faces_outward() {
        let mut store = TopologyStore::new();
        let solid = Extrude::new(unit_square(), Vector3::new(0.0, 0.0, -2.0))
            .execute(&mut store)
            .unwrap();

        assert!(IsValid::new(solid).execute(&store));
        assert_relative_eq!(Volume::new(solid).execute(&store).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn oblique_direction_keeps_volume() {
        let mut store = TopologyStore::new();
        let solid = Extrude::new(unit_square(), Vector3::new(1.0, 1.0, 2.0))
            .execute(&mut store)
            .unwrap();
        assert_relative_eq!(Volume::new(solid).execute(&store).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn half_disc_prism_volume() {
        let top = p(0.0, 1.0, 0.0);
        let bottom = p(0.0, -1.0, 0.0);
        let profile = Profile::new(vec![
            BoundedCurve::line(bottom, top).unwrap(),
            BoundedCurve::arc(top, bottom, p(1.0, 0.0, 0.0)).unwrap(),
        ])
        .unwrap();
        let mut store = TopologyStore::new();
        let solid = Extrude::new(profile, Vector3::z()).execute(&mut store).unwrap();

        let volume = Volume::new(solid).execute(&store).unwrap();
        let expected = std::f64::consts::FRAC_PI_2;
        assert!((volume - expected).abs() < expected * 0.01, "got {volume}");
        assert!(IsValid::new(solid).execute(&store));
    }

    #[test]
    fn zero_direction_fails() {
        let mut store = TopologyStore::new();
        assert!(Extrude::new(unit_square(), Vector3::zeros()).execute(&mut store).is_err());
    }

    #[test]
    fn in_plane_direction_fails() {
        let mut store = TopologyStore::new();
        assert!(Extrude::new(unit_square(), Vector3::x()).execute(&mut store).is_err());
    }
}
