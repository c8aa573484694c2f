use nalgebra::{Matrix3, Rotation3, Translation3, UnitQuaternion};

use crate::error::{GeometryError, Result};

use super::{Point3, RigidTransform, Vector3, TOLERANCE};

/// Allowed deviation from orthonormality for a frame basis.
const BASIS_TOLERANCE: f64 = 1e-9;

/// A right-handed orthonormal coordinate frame.
///
/// Maps local coordinates `(x, y, z)` to `origin + x * basis_x + y * basis_y + z * basis_z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    origin: Point3,
    basis_x: Vector3,
    basis_y: Vector3,
    basis_z: Vector3,
}

impl Frame {
    /// Creates a frame from an origin and three basis vectors.
    ///
    /// The vectors are normalized; they must then be mutually perpendicular
    /// and form a right-handed system.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] for a zero-length basis vector and
    /// [`GeometryError::Degenerate`] if the basis is not orthonormal or is
    /// left-handed.
    pub fn new(origin: Point3, basis_x: Vector3, basis_y: Vector3, basis_z: Vector3) -> Result<Self> {
        let basis_x = unit(basis_x)?;
        let basis_y = unit(basis_y)?;
        let basis_z = unit(basis_z)?;

        if basis_x.dot(&basis_y).abs() > BASIS_TOLERANCE
            || basis_y.dot(&basis_z).abs() > BASIS_TOLERANCE
            || basis_z.dot(&basis_x).abs() > BASIS_TOLERANCE
        {
            return Err(GeometryError::Degenerate("frame basis is not orthogonal".into()).into());
        }
        if basis_x.cross(&basis_y).dot(&basis_z) < 0.0 {
            return Err(GeometryError::Degenerate("frame basis is left-handed".into()).into());
        }

        Ok(Self {
            origin,
            basis_x,
            basis_y,
            basis_z,
        })
    }

    /// The world frame: origin at zero, standard axes.
    #[must_use]
    pub fn world() -> Self {
        Self {
            origin: Point3::origin(),
            basis_x: Vector3::x(),
            basis_y: Vector3::y(),
            basis_z: Vector3::z(),
        }
    }

    /// Returns `true` if the arguments would produce a valid frame.
    #[must_use]
    pub fn can_define_geometry(
        origin: Point3,
        basis_x: Vector3,
        basis_y: Vector3,
        basis_z: Vector3,
    ) -> bool {
        Self::new(origin, basis_x, basis_y, basis_z).is_ok()
    }

    /// Returns the frame origin.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the unit X axis.
    #[must_use]
    pub fn basis_x(&self) -> &Vector3 {
        &self.basis_x
    }

    /// Returns the unit Y axis.
    #[must_use]
    pub fn basis_y(&self) -> &Vector3 {
        &self.basis_y
    }

    /// Returns the unit Z axis.
    #[must_use]
    pub fn basis_z(&self) -> &Vector3 {
        &self.basis_z
    }

    /// The rigid transform taking frame-local coordinates to world space.
    #[must_use]
    pub fn to_isometry(&self) -> RigidTransform {
        let rotation = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[
            self.basis_x,
            self.basis_y,
            self.basis_z,
        ]));
        RigidTransform::from_parts(
            Translation3::from(self.origin.coords),
            UnitQuaternion::from_rotation_matrix(&rotation),
        )
    }
}

fn unit(v: Vector3) -> Result<Vector3> {
    let len = v.norm();
    if len < TOLERANCE {
        return Err(GeometryError::ZeroVector.into());
    }
    Ok(v / len)
}
