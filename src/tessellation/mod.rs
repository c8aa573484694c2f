mod tessellate_face;
mod tessellate_solid;

pub use tessellate_face::TessellateFace;
pub use tessellate_solid::TessellateSolid;

use crate::error::{Result, TessellationError};
use crate::math::{Point3, RigidTransform, Vector3, TOLERANCE};

/// A single triangle given by its three corner positions.
pub type Triangle = [Point3; 3];

/// Parameters controlling tessellation quality.
///
/// Curved profile edges and revolutions are split so that no chord deviates
/// from the true curve by more than `tolerance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TessellationParams {
    /// Maximum allowed deviation from the true geometry.
    pub tolerance: f64,
    /// Minimum number of segments for curves.
    pub min_segments: usize,
    /// Maximum number of segments for curves.
    pub max_segments: usize,
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self {
            tolerance: 0.001,
            min_segments: 8,
            max_segments: 256,
        }
    }
}

impl TessellationParams {
    /// Checks that the parameters describe a usable tessellation.
    ///
    /// # Errors
    ///
    /// Returns [`TessellationError::InvalidParameters`] for a non-positive
    /// tolerance, fewer than 3 minimum segments or `max < min`.
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(TessellationError::InvalidParameters(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            ))
            .into());
        }
        if self.min_segments < 3 {
            return Err(TessellationError::InvalidParameters(
                "at least 3 segments are required".into(),
            )
            .into());
        }
        if self.max_segments < self.min_segments {
            return Err(TessellationError::InvalidParameters(format!(
                "max_segments {} is below min_segments {}",
                self.max_segments, self.min_segments
            ))
            .into());
        }
        Ok(())
    }

    /// Number of chords needed to approximate an arc of `radius` sweeping
    /// `sweep` radians.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn arc_segments(&self, radius: f64, sweep: f64) -> usize {
        if radius > self.tolerance {
            let half_angle = (1.0 - self.tolerance / radius).acos();
            let computed = (sweep.abs() / (2.0 * half_angle)).ceil() as usize;
            computed.clamp(self.min_segments, self.max_segments)
        } else {
            self.min_segments
        }
    }
}

/// A triangle mesh approximation of a surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Vertex normals.
    pub normals: Vec<Vector3>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Builds an unwelded mesh, one flat-shaded triangle per input.
    ///
    /// Triangles without area are kept; their normal is zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_triangles(triangles: &[Triangle]) -> Self {
        let mut mesh = Self::default();
        mesh.vertices.reserve(triangles.len() * 3);
        mesh.normals.reserve(triangles.len() * 3);
        mesh.indices.reserve(triangles.len());

        for tri in triangles {
            let normal = triangle_normal(tri).unwrap_or_else(Vector3::zeros);
            let base = mesh.vertices.len() as u32;
            for corner in tri {
                mesh.vertices.push(*corner);
                mesh.normals.push(normal);
            }
            mesh.indices.push([base, base + 1, base + 2]);
        }
        mesh
    }

    /// Appends another mesh, offsetting its indices.
    #[allow(clippy::cast_possible_truncation)]
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(
            other
                .indices
                .iter()
                .map(|[a, b, c]| [a + offset, b + offset, c + offset]),
        );
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Iterates over the triangles as corner positions.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.iter().map(|tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }

    /// Total surface area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| (b - a).cross(&(c - a)).norm() * 0.5)
            .sum()
    }

    /// Returns this mesh moved by a rigid transform.
    #[must_use]
    pub fn transformed(&self, transform: &RigidTransform) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| transform * v).collect(),
            normals: self.normals.iter().map(|n| transform.rotation * n).collect(),
            indices: self.indices.clone(),
        }
    }
}

/// Unit normal of a triangle, or `None` when it has no area.
#[must_use]
pub fn triangle_normal([a, b, c]: &Triangle) -> Option<Vector3> {
    let cross = (b - a).cross(&(c - a));
    let len = cross.norm();
    (len > TOLERANCE).then(|| cross / len)
}
