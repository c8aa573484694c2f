use tracing::debug;

use crate::error::Result;
use crate::math::RigidTransform;
use crate::shape::GeometryObject;
use crate::tessellation::Triangle;

use super::{BuildFallback, BuildResult, BuildTarget, TessellatedShapeBuilder, DEFAULT_WELD_TOLERANCE};

/// Rebuilds a triangulated surface as independent geometry.
///
/// Each triangle becomes one facet of a single open connected face set,
/// built for any geometry with a mesh fallback: a closed consistently
/// oriented triangle set yields a solid, an open manifold a sheet, anything
/// else a mesh. Degenerate triangles are skipped.
pub struct ReconstructMesh {
    triangles: Vec<Triangle>,
    transform: Option<RigidTransform>,
    weld_tolerance: f64,
}

impl ReconstructMesh {
    /// Creates a new `ReconstructMesh` operation.
    #[must_use]
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self {
            triangles,
            transform: None,
            weld_tolerance: DEFAULT_WELD_TOLERANCE,
        }
    }

    /// Moves every vertex by `transform` before building.
    #[must_use]
    pub fn with_transform(mut self, transform: RigidTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Sets the vertex weld tolerance.
    #[must_use]
    pub fn with_weld_tolerance(mut self, tolerance: f64) -> Self {
        self.weld_tolerance = tolerance;
        self
    }

    /// Executes the reconstruction, returning the produced geometry objects.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NoGeometry`](crate::error::OperationError::NoGeometry)
    /// if no triangle is usable.
    pub fn execute(&self) -> Result<Vec<GeometryObject>> {
        Ok(self.build()?.objects)
    }

    /// Like [`execute`](Self::execute), also reporting which outcome was reached.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub fn build(&self) -> Result<BuildResult> {
        let mut builder = TessellatedShapeBuilder::new()
            .with_target(BuildTarget::AnyGeometry)
            .with_fallback(BuildFallback::Mesh)
            .with_weld_tolerance(self.weld_tolerance);

        builder.open_connected_face_set(false)?;
        let mut skipped = 0_usize;
        for triangle in &self.triangles {
            let corners = match &self.transform {
                Some(transform) => triangle.iter().map(|q| transform * q).collect(),
                None => triangle.to_vec(),
            };
            if !builder.add_face(corners)? {
                skipped += 1;
            }
        }
        builder.close_connected_face_set()?;

        let result = builder.build()?;
        debug!(
            triangles = self.triangles.len(),
            skipped,
            outcome = ?result.outcome,
            "mesh reconstructed"
        );
        Ok(result)
    }
}
