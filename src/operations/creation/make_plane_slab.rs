use crate::error::{OperationError, Result};
use crate::geometry::{Plane, Profile};
use crate::math::{Point3, Vector3};
use crate::operations::shaping::Extrude;
use crate::operations::transform::TransformSolid;
use crate::topology::{SolidId, TopologyStore};

/// Default in-plane extent of a plane slab.
pub const DEFAULT_SLAB_EXTENT: f64 = 10.0;

/// Default thickness of a plane slab.
pub const DEFAULT_SLAB_THICKNESS: f64 = 0.1;

/// Creates a thin box that makes an infinite plane visible.
///
/// A `width × height` rectangle centered on the plane origin in the plane's
/// local XY is extruded along the plane normal by `thickness`.
pub struct MakePlaneSlab {
    plane: Plane,
    width: f64,
    height: f64,
    thickness: f64,
}

impl MakePlaneSlab {
    /// Creates a new `MakePlaneSlab` operation with the default 10 × 10 × 0.1 size.
    #[must_use]
    pub fn new(plane: Plane) -> Self {
        Self {
            plane,
            width: DEFAULT_SLAB_EXTENT,
            height: DEFAULT_SLAB_EXTENT,
            thickness: DEFAULT_SLAB_THICKNESS,
        }
    }

    /// Sets the in-plane size along the plane's X and Y directions.
    #[must_use]
    pub fn with_extents(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the size along the plane normal.
    #[must_use]
    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }

    /// Executes the operation, creating the slab in the topology store.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidArgument`] if a size is not a
    /// positive finite number, and a geometry error if the plane basis is
    /// not orthonormal.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("thickness", self.thickness),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(OperationError::InvalidArgument(format!(
                    "plane slab {name} must be positive, got {value}"
                ))
                .into());
            }
        }
        let placement = self.plane.frame()?.to_isometry();

        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        let base = Profile::polygon(&[
            Point3::new(-hw, -hh, 0.0),
            Point3::new(hw, -hh, 0.0),
            Point3::new(hw, hh, 0.0),
            Point3::new(-hw, hh, 0.0),
        ])?;
        let solid = Extrude::new(base, Vector3::new(0.0, 0.0, self.thickness)).execute(store)?;
        TransformSolid::new(solid, placement).execute(store)?;
        Ok(solid)
    }
}
