use crate::error::{GeometryError, Result};
use crate::geometry::{BoundedCurve, Profile};
use crate::math::{Point3, Vector3};
use crate::operations::shaping::Revolve;
use crate::tessellation::TessellationParams;
use crate::topology::{SolidId, TopologyStore};

/// Creates a polyhedral sphere by revolving a half disc about its diameter.
///
/// The profile is the diameter from `center - r·Y` to `center + r·Y`, closed
/// by a semicircle through `center + r·X`. It is revolved about the `Y` line
/// through the center.
pub struct MakeSphere {
    center: Point3,
    radius: f64,
    params: TessellationParams,
}

impl MakeSphere {
    /// Creates a new `MakeSphere` operation with default tessellation parameters.
    #[must_use]
    pub fn new(center: Point3, radius: f64) -> Self {
        Self {
            center,
            radius,
            params: TessellationParams::default(),
        }
    }

    /// Sets the parameters that control the facet count.
    #[must_use]
    pub fn with_params(mut self, params: TessellationParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the operation, creating the sphere in the topology store.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] if the radius is not a positive
    /// finite number.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(GeometryError::Degenerate(format!(
                "sphere radius must be positive, got {}",
                self.radius
            ))
            .into());
        }

        let up = Vector3::y() * self.radius;
        let bottom = self.center - up;
        let top = self.center + up;
        let side = self.center + Vector3::x() * self.radius;

        let profile = Profile::new(vec![
            BoundedCurve::line(bottom, top)?,
            BoundedCurve::arc(top, bottom, side)?,
        ])?;
        Revolve::new(profile, self.center, Vector3::y())
            .with_params(self.params)
            .execute(store)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::operations::query::{BoundingBox, Centroid, IsValid, Volume};
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn sphere_volume_approaches_exact() {
        let mut store = TopologyStore::new();
        let solid = MakeSphere::new(Point3::origin(), 2.0).execute(&mut store).unwrap();

        let volume = Volume::new(solid).execute(&store).unwrap();
        let expected = 4.0 / 3.0 * PI * 8.0;
        assert!(
            (volume - expected).abs() < expected * 0.01,
            "expected ~{expected:.3}, got {volume:.3}"
        );
        assert!(IsValid::new(solid).execute(&store));
    }

    #[test]
    fn sphere_is_centered() {
        let mut store = TopologyStore::new();
        let center = Point3::new(3.0, -1.0, 2.0);
        let solid = MakeSphere::new(center, 0.5).execute(&mut store).unwrap();

        assert_relative_eq!(Centroid::new(solid).execute(&store).unwrap(), center, epsilon = 1e-6);
        let aabb = BoundingBox::new(solid).execute(&store).unwrap();
        assert_relative_eq!(aabb.max.y, center.y + 0.5, epsilon = 1e-9);
        assert_relative_eq!(aabb.min.y, center.y - 0.5, epsilon = 1e-9);
    }

    #[test]
    fn coarse_params_give_fewer_faces() {
        let coarse = TessellationParams {
            tolerance: 0.1,
            min_segments: 4,
            max_segments: 8,
        };
        let mut store = TopologyStore::new();
        let fine = MakeSphere::new(Point3::origin(), 1.0).execute(&mut store).unwrap();
        let rough = MakeSphere::new(Point3::origin(), 1.0)
            .with_params(coarse)
            .execute(&mut store)
            .unwrap();
        assert!(store.solid_faces(rough).unwrap().len() < store.solid_faces(fine).unwrap().len());
        assert!(IsValid::new(rough).execute(&store));
    }

    #[test]
    fn non_positive_radius_is_degenerate() {
        let mut store = TopologyStore::new();
        for radius in [0.0, -1.0] {
            let err = MakeSphere::new(Point3::origin(), radius)
                .execute(&mut store)
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::GeometryDegenerate);
        }
    }
}
