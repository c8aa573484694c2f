use crate::error::{GeometryError, Result};
use crate::math::{Frame, Point3, RigidTransform, Vector3, TOLERANCE};

/// An infinite plane in 3D space.
///
/// Defined by an origin point and two orthogonal unit directions
/// (`x_dir`, `y_dir`). The normal is `x_dir × y_dir`.
///
/// Parametric form: `P(u, v) = origin + u * x_dir + v * y_dir`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    origin: Point3,
    x_dir: Vector3,
    y_dir: Vector3,
    normal: Vector3,
}

impl Plane {
    /// Creates a new plane from an origin and two in-plane directions.
    ///
    /// `y_dir` is re-orthogonalized against `x_dir`, so the two only need to
    /// be non-parallel.
    ///
    /// # Errors
    ///
    /// Returns an error if the direction vectors are zero-length
    /// or parallel (degenerate plane).
    pub fn new(origin: Point3, x_dir: Vector3, y_dir: Vector3) -> Result<Self> {
        let x_len = x_dir.norm();
        if x_len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        if y_dir.norm() < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let x_dir = x_dir / x_len;

        let normal = x_dir.cross(&y_dir);
        let normal_len = normal.norm();
        if normal_len < TOLERANCE {
            return Err(
                GeometryError::Degenerate("plane directions are parallel".into()).into(),
            );
        }
        let normal = normal / normal_len;
        let y_dir = normal.cross(&x_dir);

        Ok(Self {
            origin,
            x_dir,
            y_dir,
            normal,
        })
    }

    /// Creates a plane from an origin and a normal vector.
    ///
    /// The in-plane directions are computed automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vector is zero-length.
    pub fn from_normal(origin: Point3, normal: Vector3) -> Result<Self> {
        let len = normal.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let normal = normal / len;

        // Choose a reference vector not parallel to the normal
        let reference = if normal.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };

        let x_dir = normal.cross(&reference).normalize();
        let y_dir = normal.cross(&x_dir);

        Ok(Self {
            origin,
            x_dir,
            y_dir,
            normal,
        })
    }

    /// Returns the origin point of the plane.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Returns the in-plane X direction.
    #[must_use]
    pub fn x_dir(&self) -> &Vector3 {
        &self.x_dir
    }

    /// Returns the in-plane Y direction.
    #[must_use]
    pub fn y_dir(&self) -> &Vector3 {
        &self.y_dir
    }

    /// Returns the unit normal of the plane.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Evaluates the plane at local coordinates `(u, v)`.
    #[must_use]
    pub fn point_at(&self, u: f64, v: f64) -> Point3 {
        self.origin + self.x_dir * u + self.y_dir * v
    }

    /// Projects a point into the plane's local `(u, v)` coordinates.
    #[must_use]
    pub fn project(&self, point: &Point3) -> (f64, f64) {
        let d = point - self.origin;
        (d.dot(&self.x_dir), d.dot(&self.y_dir))
    }

    /// Signed distance of a point from the plane along the normal.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3) -> f64 {
        (point - self.origin).dot(&self.normal)
    }

    /// The local frame `(origin, x_dir, y_dir, normal)` of this plane.
    ///
    /// # Errors
    ///
    /// Returns an error if the basis has drifted from orthonormal.
    pub fn frame(&self) -> Result<Frame> {
        Frame::new(self.origin, self.x_dir, self.y_dir, self.normal)
    }

    /// Returns this plane moved by a rigid transform.
    #[must_use]
    pub fn transformed(&self, transform: &RigidTransform) -> Self {
        Self {
            origin: transform * self.origin,
            x_dir: transform.rotation * self.x_dir,
            y_dir: transform.rotation * self.y_dir,
            normal: transform.rotation * self.normal,
        }
    }
}
