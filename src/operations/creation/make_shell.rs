use std::collections::HashMap;

use crate::error::{OperationError, Result};
use crate::geometry::surface::Plane;
use crate::math::{newell_normal, Point3, TOLERANCE};
use crate::topology::{
    EdgeData, EdgeId, FaceData, OrientedEdge, ShellData, ShellId, TopologyStore, VertexData,
    VertexId, WireData,
};

/// Sews indexed polygons into a shell with shared vertices and edges.
///
/// Every polygon is a loop of indices into `points`, wound counter-clockwise
/// around its outward normal. Two polygons that traverse the same pair of
/// indices share one edge. The shell is marked closed when every edge is
/// used by exactly two polygon loops.
pub struct MakeShell {
    points: Vec<Point3>,
    polygons: Vec<Vec<usize>>,
}

impl MakeShell {
    /// Creates a new `MakeShell` operation.
    #[must_use]
    pub fn new(points: Vec<Point3>, polygons: Vec<Vec<usize>>) -> Self {
        Self { points, polygons }
    }

    /// Executes the operation, creating the shell in the topology store.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidArgument`] for an empty polygon list,
    /// an out-of-range index or a polygon with fewer than 3 corners, and
    /// [`OperationError::Failed`] for a polygon without area.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<ShellId> {
        if self.polygons.is_empty() {
            return Err(OperationError::InvalidArgument("shell needs at least one face".into()).into());
        }
        for polygon in &self.polygons {
            if polygon.len() < 3 {
                return Err(OperationError::InvalidArgument(
                    "face loop needs at least 3 corners".into(),
                )
                .into());
            }
            if let Some(&bad) = polygon.iter().find(|&&i| i >= self.points.len()) {
                return Err(OperationError::InvalidArgument(format!(
                    "face corner index {bad} out of range ({} points)",
                    self.points.len()
                ))
                .into());
            }
        }

        let vertices: Vec<VertexId> = self
            .points
            .iter()
            .map(|p| store.add_vertex(VertexData::new(*p)))
            .collect();

        let mut edges: HashMap<(usize, usize), (EdgeId, usize)> = HashMap::new();
        let mut usage: HashMap<EdgeId, usize> = HashMap::new();
        let mut faces = Vec::with_capacity(self.polygons.len());

        for polygon in &self.polygons {
            let corners: Vec<Point3> = polygon.iter().map(|&i| self.points[i]).collect();
            let surface = polygon_plane(&corners)?;

            let n = polygon.len();
            let mut wire_edges = Vec::with_capacity(n);
            for k in 0..n {
                let a = polygon[k];
                let b = polygon[(k + 1) % n];
                let key = (a.min(b), a.max(b));
                let (edge_id, start) = *edges.entry(key).or_insert_with(|| {
                    let id = store.add_edge(EdgeData {
                        start: vertices[a],
                        end: vertices[b],
                    });
                    (id, a)
                });
                *usage.entry(edge_id).or_insert(0) += 1;
                wire_edges.push(OrientedEdge::new(edge_id, start == a));
            }

            let wire = store.add_wire(WireData {
                edges: wire_edges,
                is_closed: true,
            });
            faces.push(store.add_face(FaceData {
                surface,
                outer_wire: wire,
            }));
        }

        let is_closed = usage.values().all(|&count| count == 2);
        Ok(store.add_shell(ShellData { faces, is_closed }))
    }
}

/// Plane through a polygon, oriented by its winding.
fn polygon_plane(corners: &[Point3]) -> Result<Plane> {
    let normal = newell_normal(corners)
        .ok_or_else(|| OperationError::Failed("face polygon has no area".into()))?;
    let origin = corners[0];
    let x_dir = corners
        .iter()
        .skip(1)
        .map(|c| c - origin)
        .find(|d| d.norm() > TOLERANCE)
        .ok_or_else(|| OperationError::Failed("face polygon has no extent".into()))?;
    let x_dir = x_dir - normal * x_dir.dot(&normal);
    Plane::new(origin, x_dir, normal.cross(&x_dir))
}
