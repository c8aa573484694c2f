use crate::error::{OperationError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::tessellation::TessellateSolid;
use crate::topology::{SolidId, TopologyStore};

use super::volume::tetrahedron_volume;

/// Computes the center of mass of a solid of uniform density.
pub struct Centroid {
    solid: SolidId,
}

impl Centroid {
    /// Creates a new `Centroid` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::Failed`] if the solid encloses no volume,
    /// or an error if it cannot be tessellated.
    pub fn execute(&self, store: &TopologyStore) -> Result<Point3> {
        let mesh = TessellateSolid::new(self.solid).execute(store)?;

        let mut volume = 0.0;
        let mut moment = Vector3::zeros();
        for tri in mesh.triangles() {
            let v = tetrahedron_volume(&tri);
            volume += v;
            moment += (tri[0].coords + tri[1].coords + tri[2].coords) * (v / 4.0);
        }

        if volume.abs() < TOLERANCE {
            return Err(OperationError::Failed("solid encloses no volume".into()).into());
        }
        Ok(Point3::from(moment / volume))
    }
}
