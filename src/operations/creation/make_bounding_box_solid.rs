use crate::error::{OperationError, Result};
use crate::geometry::{BoundingBoxXyz, Profile};
use crate::math::{Point3, Vector3};
use crate::operations::shaping::Extrude;
use crate::operations::transform::TransformSolid;
use crate::topology::{SolidId, TopologyStore};

/// Creates the solid filling a (possibly transformed) bounding box.
pub struct MakeBoundingBoxSolid {
    bbox: BoundingBoxXyz,
}

impl MakeBoundingBoxSolid {
    /// Creates a new `MakeBoundingBoxSolid` operation.
    #[must_use]
    pub fn new(bbox: &BoundingBoxXyz) -> Self {
        Self { bbox: bbox.clone() }
    }

    /// Executes the operation, creating the solid in the topology store.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidArgument`] if the box is empty or
    /// flat along any axis.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        let extents = self.bbox.extents();
        if extents.iter().any(|e| !e.is_finite() || *e <= 0.0) {
            return Err(OperationError::InvalidArgument(format!(
                "bounding box extents must be positive, got ({}, {}, {})",
                extents.x, extents.y, extents.z
            ))
            .into());
        }

        let min = self.bbox.min;
        let max = self.bbox.max;
        let base = Profile::polygon(&[
            Point3::new(min.x, min.y, min.z),
            Point3::new(max.x, min.y, min.z),
            Point3::new(max.x, max.y, min.z),
            Point3::new(min.x, max.y, min.z),
        ])?;
        let solid = Extrude::new(base, Vector3::new(0.0, 0.0, extents.z)).execute(store)?;
        TransformSolid::new(solid, self.bbox.transform).execute(store)?;
        Ok(solid)
    }
}
