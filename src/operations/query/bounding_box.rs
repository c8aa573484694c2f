use crate::error::{OperationError, Result};
use crate::math::{Point3, Vector3};
use crate::topology::{SolidId, TopologyStore};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Smallest box containing all `points`, or `None` for an empty set.
    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Self { min: first, max: first }, |acc, q| Self {
            min: acc.min.inf(q),
            max: acc.max.sup(q),
        }))
    }

    /// Edge lengths.
    #[must_use]
    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point3 {
        nalgebra::center(&self.min, &self.max)
    }
}

/// Computes the axis-aligned bounding box of a solid.
pub struct BoundingBox {
    solid: SolidId,
}

impl BoundingBox {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query, returning the AABB of the solid's vertices.
    ///
    /// # Errors
    ///
    /// Returns an error if the solid is missing or has no vertices.
    pub fn execute(&self, store: &TopologyStore) -> Result<Aabb> {
        let points = store
            .solid_vertices(self.solid)?
            .into_iter()
            .map(|vid| store.vertex(vid).map(|v| v.point))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Aabb::from_points(&points)
            .ok_or_else(|| OperationError::NoGeometry("solid has no vertices".into()).into())
    }
}
