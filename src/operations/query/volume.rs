use crate::error::Result;
use crate::math::Point3;
use crate::tessellation::TessellateSolid;
use crate::topology::{SolidId, TopologyStore};

/// Computes the volume of a solid.
///
/// Uses tessellation and the signed tetrahedron method. For each triangle,
/// computes `(1/6) * v0 . (v1 x v2)` and sums over all triangles. Face
/// triangles are wound about the outward face normals, so the sum is positive
/// for a correctly oriented closed solid.
pub struct Volume {
    solid: SolidId,
}

impl Volume {
    /// Creates a new `Volume` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query, returning the volume (absolute value).
    ///
    /// # Errors
    ///
    /// Returns an error if the solid cannot be tessellated.
    pub fn execute(&self, store: &TopologyStore) -> Result<f64> {
        Ok(self.signed(store)?.abs())
    }

    /// Signed volume; negative when the faces point inward.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid cannot be tessellated.
    pub fn signed(&self, store: &TopologyStore) -> Result<f64> {
        let mesh = TessellateSolid::new(self.solid).execute(store)?;
        Ok(mesh.triangles().map(|tri| tetrahedron_volume(&tri)).sum())
    }
}

/// Signed volume of the tetrahedron spanned by a triangle and the origin.
pub(super) fn tetrahedron_volume([a, b, c]: &[Point3; 3]) -> f64 {
    a.coords.dot(&b.coords.cross(&c.coords)) / 6.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::creation::{MakeBox, MakeShell, MakeSolid};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn box_volume() {
        let mut store = TopologyStore::new();
        let solid = MakeBox::new(p(0.0, 0.0, 0.0), 2.0, 3.0, 4.0)
            .execute(&mut store)
            .unwrap();

        let volume = Volume::new(solid).execute(&store).unwrap();
        assert_relative_eq!(volume, 24.0, epsilon = 1e-9);
    }

    #[test]
    fn volume_is_translation_invariant() {
        let mut store = TopologyStore::new();
        let near = MakeBox::cube(p(0.0, 0.0, 0.0), 1.0).execute(&mut store).unwrap();
        let far = MakeBox::cube(p(100.0, -50.0, 7.0), 1.0).execute(&mut store).unwrap();
        assert_relative_eq!(
            Volume::new(near).execute(&store).unwrap(),
            Volume::new(far).execute(&store).unwrap(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn inward_faces_give_negative_signed_volume() {
        let mut store = TopologyStore::new();
        let points = vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, 0.0, 1.0),
        ];
        // Every loop wound clockwise seen from outside.
        let faces = vec![vec![0, 1, 2], vec![0, 3, 1], vec![1, 3, 2], vec![0, 2, 3]];
        let shell = MakeShell::new(points, faces).execute(&mut store).unwrap();
        let solid = MakeSolid::new(shell).execute(&mut store).unwrap();

        let volume = Volume::new(solid);
        assert_relative_eq!(volume.signed(&store).unwrap(), -1.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(volume.execute(&store).unwrap(), 1.0 / 6.0, epsilon = 1e-12);
    }
}
