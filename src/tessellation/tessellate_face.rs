use std::collections::{HashMap, HashSet, VecDeque};

use spade::handles::{FixedFaceHandle, InnerTag};
use spade::{
    ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation,
};

use crate::error::{Result, TessellationError};
use crate::math::{Point3, Vector3};
use crate::topology::{FaceId, TopologyStore};

use super::TriangleMesh;

/// Tessellates a planar face into a triangle mesh.
///
/// Triangles are wound counter-clockwise around the face's outward normal.
/// Only boundary vertices are used, so faces that share an edge produce
/// matching triangle edges.
pub struct TessellateFace {
    face: FaceId,
}

impl TessellateFace {
    /// Creates a new `TessellateFace` operation.
    #[must_use]
    pub fn new(face: FaceId) -> Self {
        Self { face }
    }

    /// Executes the tessellation, returning a triangle mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if the face is missing or its boundary cannot be
    /// triangulated.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self, store: &TopologyStore) -> Result<TriangleMesh> {
        let face = store.face(self.face)?;
        let plane = &face.surface;
        let normal = *plane.normal();
        let points = store.face_points(self.face)?;

        if points.len() < 3 {
            return Err(
                TessellationError::Failed("face boundary needs at least 3 points".into()).into(),
            );
        }

        let mut mesh = TriangleMesh::default();
        if points.len() == 3 {
            for q in &points {
                mesh.vertices.push(*q);
                mesh.normals.push(normal);
            }
            mesh.indices.push(oriented([0, 1, 2], &mesh.vertices, &normal));
            return Ok(mesh);
        }

        let boundary: Vec<SpadePoint2<f64>> = points
            .iter()
            .map(|q| {
                let (u, v) = plane.project(q);
                SpadePoint2::new(u, v)
            })
            .collect();

        let mut cdt = ConstrainedDelaunayTriangulation::<SpadePoint2<f64>>::new();
        insert_constraint_loop(&mut cdt, &boundary)?;
        let interior_faces = classify_interior_faces(&cdt);

        let mut vertex_map: HashMap<usize, u32> = HashMap::new();
        for face_handle in cdt.inner_faces() {
            if !interior_faces.contains(&face_handle.fix().index()) {
                continue;
            }

            let mut tri = [0u32; 3];
            for (slot, vh) in face_handle.vertices().iter().enumerate() {
                let idx = vh.fix().index();
                tri[slot] = *vertex_map.entry(idx).or_insert_with(|| {
                    let pos = vh.position();
                    mesh.vertices.push(plane.point_at(pos.x, pos.y));
                    mesh.normals.push(normal);
                    (mesh.vertices.len() - 1) as u32
                });
            }
            mesh.indices.push(oriented(tri, &mesh.vertices, &normal));
        }

        Ok(mesh)
    }
}

/// Flips a triangle if its winding disagrees with `normal`.
fn oriented(tri: [u32; 3], vertices: &[Point3], normal: &Vector3) -> [u32; 3] {
    let a = vertices[tri[0] as usize];
    let b = vertices[tri[1] as usize];
    let c = vertices[tri[2] as usize];
    if (b - a).cross(&(c - a)).dot(normal) < 0.0 {
        [tri[0], tri[2], tri[1]]
    } else {
        tri
    }
}

fn insert_constraint_loop(
    cdt: &mut ConstrainedDelaunayTriangulation<SpadePoint2<f64>>,
    points: &[SpadePoint2<f64>],
) -> Result<()> {
    let mut handles = Vec::with_capacity(points.len());
    for &pt in points {
        let h = cdt
            .insert(pt)
            .map_err(|e: InsertionError| TessellationError::Failed(format!("CDT insert: {e}")))?;
        handles.push(h);
    }

    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from != to {
            cdt.add_constraint(from, to);
        }
    }

    Ok(())
}

/// Marks the triangles inside the constraint loop by flood-filling from the
/// outer face and counting constraint crossings.
fn classify_interior_faces(
    cdt: &ConstrainedDelaunayTriangulation<SpadePoint2<f64>>,
) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();

    for edge in cdt.directed_edges() {
        if edge.face().fix() == outer_fix {
            if let Some(inner) = edge.rev().face().as_inner() {
                let idx = inner.fix().index();
                if depth_map.contains_key(&idx) {
                    continue;
                }
                let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
                depth_map.insert(idx, depth);
                if depth % 2 == 1 {
                    interior.insert(idx);
                }
                queue.push_back((inner.fix(), depth));
            }
        }
    }

    while let Some((face_fix, depth)) = queue.pop_front() {
        let face = cdt.face(face_fix);
        for edge in face.adjacent_edges() {
            if let Some(neighbor) = edge.rev().face().as_inner() {
                let n_idx = neighbor.fix().index();
                if depth_map.contains_key(&n_idx) {
                    continue;
                }
                let new_depth = if cdt.is_constraint_edge(edge.as_undirected().fix()) {
                    depth + 1
                } else {
                    depth
                };
                depth_map.insert(n_idx, new_depth);
                if new_depth % 2 == 1 {
                    interior.insert(n_idx);
                }
                queue.push_back((neighbor.fix(), new_depth));
            }
        }
    }

    interior
}
