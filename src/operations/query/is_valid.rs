use std::collections::HashMap;

use crate::error::Result;
use crate::math::{newell_normal, newell_vector, TOLERANCE};
use crate::topology::{EdgeId, SolidId, TopologyStore};

/// Allowed distance of a face vertex from its face plane.
const PLANE_TOLERANCE: f64 = 1e-7;

/// Validates the topological and geometric consistency of a solid.
///
/// A valid solid has a closed shell in which every edge is used by exactly
/// two face loops in opposite directions, every face loop is connected and
/// lies on its plane with the winding about the plane normal, and the
/// enclosed volume is positive.
pub struct IsValid {
    solid: SolidId,
}

impl IsValid {
    /// Creates a new `IsValid` query.
    #[must_use]
    pub fn new(solid: SolidId) -> Self {
        Self { solid }
    }

    /// Executes the validation, returning `true` if the solid is valid.
    #[must_use]
    pub fn execute(&self, store: &TopologyStore) -> bool {
        self.check(store).unwrap_or(false)
    }

    fn check(&self, store: &TopologyStore) -> Result<bool> {
        let shell = store.shell(store.solid(self.solid)?.outer_shell)?;
        if !shell.is_closed || shell.faces.is_empty() {
            return Ok(false);
        }

        let mut uses: HashMap<EdgeId, Vec<bool>> = HashMap::new();
        let mut volume = 0.0;

        for &face_id in &shell.faces {
            let face = store.face(face_id)?;
            let wire = store.wire(face.outer_wire)?;
            if !wire.is_closed || wire.edges.len() < 3 {
                return Ok(false);
            }

            // Consecutive edges must share their joining vertex.
            let n = wire.edges.len();
            for k in 0..n {
                let this = wire.edges[k];
                let next = wire.edges[(k + 1) % n];
                let this_edge = store.edge(this.edge)?;
                let next_edge = store.edge(next.edge)?;
                let this_end = if this.forward { this_edge.end } else { this_edge.start };
                let next_start = if next.forward { next_edge.start } else { next_edge.end };
                if this_end != next_start {
                    return Ok(false);
                }
                uses.entry(this.edge).or_default().push(this.forward);
            }

            let points = store.wire_points(face.outer_wire)?;
            let plane = &face.surface;
            if points
                .iter()
                .any(|q| plane.signed_distance(q).abs() > PLANE_TOLERANCE)
            {
                return Ok(false);
            }
            match newell_normal(&points) {
                Some(normal) if normal.dot(plane.normal()) > 0.0 => {}
                _ => return Ok(false),
            }
            volume += points[0].coords.dot(&newell_vector(&points)) / 6.0;
        }

        let manifold = uses
            .values()
            .all(|dirs| dirs.len() == 2 && dirs[0] != dirs[1]);
        Ok(manifold && volume > TOLERANCE)
    }
}
