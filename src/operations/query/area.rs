use crate::error::Result;
use crate::math::polygon_area;
use crate::topology::{SolidId, TopologyStore};

/// Computes the total surface area of a solid or sheet.
pub struct Area {
    solid: SolidId,
}

impl Area {
    /// Creates a new `Area` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the query, summing the planar face areas.
    ///
    /// # Errors
    ///
    /// Returns an error if a face of the solid is missing.
    pub fn execute(&self, store: &TopologyStore) -> Result<f64> {
        let mut total_area = 0.0;
        for &face_id in store.solid_faces(self.solid)? {
            total_area += polygon_area(&store.face_points(face_id)?);
        }
        Ok(total_area)
    }
}
