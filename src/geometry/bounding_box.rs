use crate::math::{Point3, RigidTransform, Vector3};

/// A box given by two corners in its own coordinate system, plus the rigid
/// transform that places that system in world space.
///
/// World-aligned boxes carry the identity transform.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBoxXyz {
    /// Minimum corner in box coordinates.
    pub min: Point3,
    /// Maximum corner in box coordinates.
    pub max: Point3,
    /// Box coordinates to world coordinates.
    pub transform: RigidTransform,
}

impl BoundingBoxXyz {
    /// Creates a world-aligned box.
    #[must_use]
    pub fn new(min: Point3, max: Point3) -> Self {
        Self {
            min,
            max,
            transform: RigidTransform::identity(),
        }
    }

    /// Replaces the placement transform.
    #[must_use]
    pub fn with_transform(mut self, transform: RigidTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Edge lengths along the box axes (negative if `min > max`).
    #[must_use]
    pub fn extents(&self) -> Vector3 {
        self.max - self.min
    }

    /// Center of the box in world coordinates.
    #[must_use]
    pub fn world_center(&self) -> Point3 {
        self.transform * nalgebra::center(&self.min, &self.max)
    }
}
