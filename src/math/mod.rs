pub mod frame;

pub use frame::Frame;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Rotation plus translation; no scale or shear.
pub type RigidTransform = nalgebra::Isometry3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Newell vector of a closed polygon.
///
/// Its direction is the polygon normal (right-hand rule over the vertex
/// order) and its length is twice the enclosed area.
#[must_use]
pub fn newell_vector(points: &[Point3]) -> Vector3 {
    let n = points.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let curr = &points[i];
        let next = &points[(i + 1) % n];
        normal.x += (curr.y - next.y) * (curr.z + next.z);
        normal.y += (curr.z - next.z) * (curr.x + next.x);
        normal.z += (curr.x - next.x) * (curr.y + next.y);
    }
    normal
}

/// Unit normal of a closed polygon, or `None` when the polygon has no area.
#[must_use]
pub fn newell_normal(points: &[Point3]) -> Option<Vector3> {
    let normal = newell_vector(points);
    let len = normal.norm();
    (len > TOLERANCE).then(|| normal / len)
}

/// Area of a closed planar polygon.
#[must_use]
pub fn polygon_area(points: &[Point3]) -> f64 {
    newell_vector(points).norm() * 0.5
}
