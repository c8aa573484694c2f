use crate::error::Result;
use crate::math::RigidTransform;
use crate::topology::{SolidId, TopologyStore};

/// Moves a solid by a rigid transform, in place.
///
/// Vertex positions and face planes are both updated, so face normals stay
/// outward.
pub struct TransformSolid {
    solid: SolidId,
    transform: RigidTransform,
}

impl TransformSolid {
    /// Creates a new `TransformSolid` operation.
    #[must_use]
    pub fn new(solid: SolidId, transform: RigidTransform) -> Self {
        Self { solid, transform }
    }

    /// Executes the transformation, modifying the solid in-place.
    ///
    /// # Errors
    ///
    /// Returns an error if any topology entity of the solid is missing.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<()> {
        for vid in store.solid_vertices(self.solid)? {
            let vertex = store.vertex_mut(vid)?;
            vertex.point = self.transform * vertex.point;
        }

        let faces = store.solid_faces(self.solid)?.to_vec();
        for face_id in faces {
            let face = store.face_mut(face_id)?;
            face.surface = face.surface.transformed(&self.transform);
        }
        Ok(())
    }
}
