use crate::error::{OperationError, Result};
use crate::geometry::Profile;
use crate::math::{Point3, Vector3};
use crate::operations::shaping::Extrude;
use crate::topology::{SolidId, TopologyStore};

/// Creates an axis-aligned box solid centered on a point.
///
/// The base rectangle sits at `center.z - dz / 2` and is extruded along `+Z`
/// by `dz`.
pub struct MakeBox {
    center: Point3,
    dx: f64,
    dy: f64,
    dz: f64,
}

impl MakeBox {
    /// Creates a new `MakeBox` operation.
    #[must_use]
    pub fn new(center: Point3, dx: f64, dy: f64, dz: f64) -> Self {
        Self { center, dx, dy, dz }
    }

    /// Creates a cube with edge length `edge`.
    #[must_use]
    pub fn cube(center: Point3, edge: f64) -> Self {
        Self::new(center, edge, edge, edge)
    }

    /// Executes the operation, creating the box in the topology store.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidArgument`] if any dimension is not a
    /// positive finite number. Dimensions are never clamped.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        for (name, value) in [("dx", self.dx), ("dy", self.dy), ("dz", self.dz)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(OperationError::InvalidArgument(format!(
                    "box dimension {name} must be positive, got {value}"
                ))
                .into());
            }
        }

        let (hx, hy) = (self.dx / 2.0, self.dy / 2.0);
        let z = self.center.z - self.dz / 2.0;
        let (cx, cy) = (self.center.x, self.center.y);
        let base = Profile::polygon(&[
            Point3::new(cx - hx, cy - hy, z),
            Point3::new(cx + hx, cy - hy, z),
            Point3::new(cx + hx, cy + hy, z),
            Point3::new(cx - hx, cy + hy, z),
        ])?;
        Extrude::new(base, Vector3::new(0.0, 0.0, self.dz)).execute(store)
    }
}
