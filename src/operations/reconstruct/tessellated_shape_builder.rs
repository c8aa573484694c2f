use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::error::{OperationError, Result};
use crate::math::{newell_normal, newell_vector, polygon_area, Point3, TOLERANCE};
use crate::operations::creation::{MakeShell, MakeSolid};
use crate::shape::{GeometryObject, Shape};
use crate::tessellation::TriangleMesh;

/// Default distance under which two facet corners become one vertex.
pub const DEFAULT_WELD_TOLERANCE: f64 = 1e-6;

/// Allowed distance of a facet corner from the facet plane.
const PLANARITY_TOLERANCE: f64 = 1e-6;

/// What the builder tries to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTarget {
    /// Closed solids only.
    Solid,
    /// Closed solids or open sheets.
    AnyGeometry,
    /// Plain meshes, without attempting a shell.
    Mesh,
}

/// What happens when the target cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildFallback {
    /// Emit the facets as a mesh.
    Mesh,
    /// Fail the build.
    Abort,
}

/// The kind of geometry a build produced, from strongest to weakest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BuildOutcome {
    /// Every face set formed a closed solid.
    Solid,
    /// At least one face set formed an open sheet, none fell back.
    Sheet,
    /// At least one face set fell back to a mesh.
    Mesh,
}

/// Geometry produced by [`TessellatedShapeBuilder::build`].
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// The weakest outcome over all face sets.
    pub outcome: BuildOutcome,
    /// One object per non-empty face set.
    pub objects: Vec<GeometryObject>,
}

#[derive(Debug)]
struct FaceSet {
    is_solid: bool,
    faces: Vec<Vec<Point3>>,
}

/// Assembles planar facets into solids, sheets or meshes.
///
/// Facets are collected into connected face sets bracketed by
/// [`open_connected_face_set`](Self::open_connected_face_set) and
/// [`close_connected_face_set`](Self::close_connected_face_set). On
/// [`build`](Self::build) corners closer than the weld tolerance are merged,
/// and every set becomes one geometry object: a solid when it is a closed
/// consistently oriented manifold, a sheet when it is an open manifold (and
/// the set was not opened as a solid), otherwise the fallback.
#[derive(Debug)]
pub struct TessellatedShapeBuilder {
    target: BuildTarget,
    fallback: BuildFallback,
    weld_tolerance: f64,
    open: Option<FaceSet>,
    closed: Vec<FaceSet>,
}

impl Default for TessellatedShapeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TessellatedShapeBuilder {
    /// Creates a builder targeting any geometry with a mesh fallback.
    #[must_use]
    pub fn new() -> Self {
        Self {
            target: BuildTarget::AnyGeometry,
            fallback: BuildFallback::Mesh,
            weld_tolerance: DEFAULT_WELD_TOLERANCE,
            open: None,
            closed: Vec::new(),
        }
    }

    /// Sets the build target.
    #[must_use]
    pub fn with_target(mut self, target: BuildTarget) -> Self {
        self.target = target;
        self
    }

    /// Sets the fallback.
    #[must_use]
    pub fn with_fallback(mut self, fallback: BuildFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Sets the vertex weld tolerance.
    #[must_use]
    pub fn with_weld_tolerance(mut self, tolerance: f64) -> Self {
        self.weld_tolerance = tolerance;
        self
    }

    /// Starts a new connected face set.
    ///
    /// With `is_solid` the set must close up into a solid; an open result
    /// takes the fallback.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::Failed`] if a face set is already open.
    pub fn open_connected_face_set(&mut self, is_solid: bool) -> Result<()> {
        if self.open.is_some() {
            return Err(OperationError::Failed("a connected face set is already open".into()).into());
        }
        self.open = Some(FaceSet {
            is_solid,
            faces: Vec::new(),
        });
        Ok(())
    }

    /// Returns `true` if `face` has at least 3 distinct corners, encloses
    /// area and is planar.
    #[must_use]
    pub fn does_face_have_enough_loops_and_vertices(&self, face: &[Point3]) -> bool {
        let corners = distinct_corners(face, self.weld_tolerance);
        if corners.len() < 3 || polygon_area(&corners) <= TOLERANCE {
            return false;
        }
        let Some(normal) = newell_normal(&corners) else {
            return false;
        };
        let origin = corners[0];
        corners
            .iter()
            .all(|q| (q - origin).dot(&normal).abs() <= PLANARITY_TOLERANCE)
    }

    /// Adds a facet to the open face set, given as its boundary corners in
    /// counter-clockwise order about the outward normal.
    ///
    /// Returns `false` and skips the facet if it fails
    /// [`does_face_have_enough_loops_and_vertices`](Self::does_face_have_enough_loops_and_vertices).
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::Failed`] if no face set is open.
    pub fn add_face(&mut self, face: Vec<Point3>) -> Result<bool> {
        let valid = self.does_face_have_enough_loops_and_vertices(&face);
        let Some(set) = self.open.as_mut() else {
            return Err(OperationError::Failed("no connected face set is open".into()).into());
        };
        if !valid {
            debug!(corners = face.len(), "skipping degenerate facet");
            return Ok(false);
        }
        set.faces.push(face);
        Ok(true)
    }

    /// Finishes the open face set.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::Failed`] if no face set is open.
    pub fn close_connected_face_set(&mut self) -> Result<()> {
        let set = self
            .open
            .take()
            .ok_or_else(|| OperationError::Failed("no connected face set is open".into()))?;
        self.closed.push(set);
        Ok(())
    }

    /// Builds the collected face sets.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidArgument`] for a non-positive weld
    /// tolerance, [`OperationError::Failed`] if a face set is still open or
    /// a set misses the target with [`BuildFallback::Abort`], and
    /// [`OperationError::NoGeometry`] if no facet survived.
    pub fn build(self) -> Result<BuildResult> {
        if !self.weld_tolerance.is_finite() || self.weld_tolerance <= 0.0 {
            return Err(OperationError::InvalidArgument(format!(
                "weld tolerance must be positive, got {}",
                self.weld_tolerance
            ))
            .into());
        }
        if self.open.is_some() {
            return Err(OperationError::Failed("a connected face set is still open".into()).into());
        }

        let mut outcome = BuildOutcome::Solid;
        let mut objects = Vec::new();
        for set in &self.closed {
            if let Some((set_outcome, object)) = self.build_set(set)? {
                outcome = outcome.max(set_outcome);
                objects.push(object);
            }
        }

        if objects.is_empty() {
            return Err(OperationError::NoGeometry("no valid facets to build from".into()).into());
        }
        debug!(?outcome, objects = objects.len(), "tessellated shape built");
        Ok(BuildResult { outcome, objects })
    }

    fn build_set(&self, set: &FaceSet) -> Result<Option<(BuildOutcome, GeometryObject)>> {
        let (points, mut polygons) = weld(&set.faces, self.weld_tolerance);
        if polygons.is_empty() {
            return Ok(None);
        }
        if self.target == BuildTarget::Mesh {
            return Ok(Some((BuildOutcome::Mesh, mesh_from(&points, &polygons).into())));
        }

        let reason = match classify(&polygons) {
            Some(true) => {
                if signed_volume(&points, &polygons) < 0.0 {
                    for polygon in &mut polygons {
                        polygon.reverse();
                    }
                }
                match make_shape(&points, &polygons) {
                    Ok(shape) => return Ok(Some((BuildOutcome::Solid, shape.into()))),
                    Err(err) => format!("closed facets do not form a solid: {err}"),
                }
            }
            Some(false) if set.is_solid || self.target == BuildTarget::Solid => {
                "facets do not close up into a solid".to_string()
            }
            Some(false) => match make_shape(&points, &polygons) {
                Ok(shape) => return Ok(Some((BuildOutcome::Sheet, shape.into()))),
                Err(err) => format!("open facets do not form a sheet: {err}"),
            },
            None => "facets are not an oriented manifold".to_string(),
        };

        match self.fallback {
            BuildFallback::Mesh => {
                warn!(%reason, facets = polygons.len(), "falling back to mesh");
                Ok(Some((BuildOutcome::Mesh, mesh_from(&points, &polygons).into())))
            }
            BuildFallback::Abort => Err(OperationError::Failed(reason).into()),
        }
    }
}

/// Corners with consecutive near-duplicates (including last/first) removed.
fn distinct_corners(face: &[Point3], tolerance: f64) -> Vec<Point3> {
    let mut corners: Vec<Point3> = Vec::with_capacity(face.len());
    for q in face {
        if corners.last().is_none_or(|last| (q - last).norm() > tolerance) {
            corners.push(*q);
        }
    }
    while corners.len() > 1
        && corners
            .first()
            .zip(corners.last())
            .is_some_and(|(first, last)| (first - last).norm() <= tolerance)
    {
        corners.pop();
    }
    corners
}

type GridKey = (i64, i64, i64);

#[allow(clippy::cast_possible_truncation)]
fn grid_key(q: &Point3, cell: f64) -> GridKey {
    (
        (q.x / cell).floor() as i64,
        (q.y / cell).floor() as i64,
        (q.z / cell).floor() as i64,
    )
}

/// Merges corners within `tolerance` and returns indexed polygons.
///
/// Polygons left with fewer than 3 distinct vertices are dropped.
fn weld(faces: &[Vec<Point3>], tolerance: f64) -> (Vec<Point3>, Vec<Vec<usize>>) {
    let mut points: Vec<Point3> = Vec::new();
    let mut grid: HashMap<GridKey, Vec<usize>> = HashMap::new();
    let mut polygons = Vec::with_capacity(faces.len());

    for face in faces {
        let mut polygon: Vec<usize> = Vec::with_capacity(face.len());
        for q in face {
            let key = grid_key(q, tolerance);
            let existing = neighbours(key)
                .filter_map(|k| grid.get(&k))
                .flatten()
                .copied()
                .find(|&i| (points[i] - q).norm() <= tolerance);
            let index = existing.unwrap_or_else(|| {
                points.push(*q);
                grid.entry(key).or_default().push(points.len() - 1);
                points.len() - 1
            });
            if polygon.last() != Some(&index) {
                polygon.push(index);
            }
        }
        while polygon.len() > 1 && polygon.first() == polygon.last() {
            polygon.pop();
        }

        let unique: HashSet<usize> = polygon.iter().copied().collect();
        if unique.len() < 3 || unique.len() != polygon.len() {
            debug!(corners = face.len(), "dropping facet collapsed by welding");
            continue;
        }
        polygons.push(polygon);
    }
    (points, polygons)
}

/// The 27 cells around `key`.
///
/// Keys saturate for coordinates far beyond the weld tolerance, so the
/// offsets wrap; a wrapped cell only adds distance checks.
fn neighbours((x, y, z): GridKey) -> impl Iterator<Item = GridKey> {
    (-1..=1).flat_map(move |dx: i64| {
        (-1..=1).flat_map(move |dy: i64| {
            (-1..=1).map(move |dz: i64| {
                (x.wrapping_add(dx), y.wrapping_add(dy), z.wrapping_add(dz))
            })
        })
    })
}

/// `None` unless every edge is used at most twice and in opposite
/// directions; otherwise whether every edge is used exactly twice.
fn classify(polygons: &[Vec<usize>]) -> Option<bool> {
    let mut directed = HashSet::new();
    let mut uses: HashMap<(usize, usize), usize> = HashMap::new();
    for polygon in polygons {
        let n = polygon.len();
        for k in 0..n {
            let (a, b) = (polygon[k], polygon[(k + 1) % n]);
            if !directed.insert((a, b)) {
                return None;
            }
            let count = uses.entry((a.min(b), a.max(b))).or_insert(0);
            *count += 1;
            if *count > 2 {
                return None;
            }
        }
    }
    Some(uses.values().all(|&count| count == 2))
}

fn signed_volume(points: &[Point3], polygons: &[Vec<usize>]) -> f64 {
    polygons
        .iter()
        .map(|polygon| {
            let corners: Vec<Point3> = polygon.iter().map(|&i| points[i]).collect();
            corners[0].coords.dot(&newell_vector(&corners)) / 6.0
        })
        .sum()
}

fn make_shape(points: &[Point3], polygons: &[Vec<usize>]) -> Result<Shape> {
    Shape::build(|store| {
        let shell = MakeShell::new(points.to_vec(), polygons.to_vec()).execute(store)?;
        MakeSolid::new(shell).execute(store)
    })
}

/// Fan-triangulates the polygons into an unwelded mesh.
fn mesh_from(points: &[Point3], polygons: &[Vec<usize>]) -> TriangleMesh {
    let triangles: Vec<_> = polygons
        .iter()
        .flat_map(|polygon| {
            (1..polygon.len() - 1)
                .map(move |k| [points[polygon[0]], points[polygon[k]], points[polygon[k + 1]]])
        })
        .collect();
    TriangleMesh::from_triangles(&triangles)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn tetra_facets() -> Vec<Vec<Point3>> {
        let v = [
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 1.0, 0.0),
            p(0.0, 0.0, 1.0),
        ];
        [[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]]
            .iter()
            .map(|f| f.iter().map(|&i| v[i]).collect())
            .collect()
    }

    fn build_with(builder: TessellatedShapeBuilder, facets: Vec<Vec<Point3>>) -> Result<BuildResult> {
        let mut builder = builder;
        builder.open_connected_face_set(false)?;
        for facet in facets {
            builder.add_face(facet)?;
        }
        builder.close_connected_face_set()?;
        builder.build()
    }

    // ── Outcomes ────────────────────────────────────────────

    #[test]
    fn closed_facets_form_a_solid() {
        let result = build_with(TessellatedShapeBuilder::new(), tetra_facets()).unwrap();
        assert_eq!(result.outcome, BuildOutcome::Solid);
        let shape = result.objects[0].as_solid().unwrap();
        assert!(shape.is_valid());
        assert_relative_eq!(shape.volume().unwrap(), 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn inside_out_facets_are_reoriented() {
        let facets = tetra_facets()
            .into_iter()
            .map(|f| f.into_iter().rev().collect())
            .collect();
        let result = build_with(TessellatedShapeBuilder::new(), facets).unwrap();
        assert_eq!(result.outcome, BuildOutcome::Solid);
        assert!(result.objects[0].as_solid().unwrap().is_valid());
    }

    #[test]
    fn open_facets_form_a_sheet() {
        let facets = vec![
            vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0)],
            vec![p(0.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0)],
        ];
        let result = build_with(TessellatedShapeBuilder::new(), facets).unwrap();
        assert_eq!(result.outcome, BuildOutcome::Sheet);
        let sheet = result.objects[0].as_solid().unwrap();
        assert!(!sheet.is_closed());
        assert_relative_eq!(sheet.area().unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn non_manifold_facets_fall_back_to_mesh() {
        // Three fins sharing the edge (0,0,0)-(1,0,0).
        let facets = vec![
            vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.5, 1.0, 0.0)],
            vec![p(1.0, 0.0, 0.0), p(0.0, 0.0, 0.0), p(0.5, 0.0, 1.0)],
            vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.5, -1.0, 0.5)],
        ];
        let result = build_with(TessellatedShapeBuilder::new(), facets).unwrap();
        assert_eq!(result.outcome, BuildOutcome::Mesh);
        assert_eq!(result.objects[0].as_mesh().unwrap().triangle_count(), 3);
    }

    #[test]
    fn abort_fallback_fails_the_build() {
        let facets = vec![vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)]];
        let builder = TessellatedShapeBuilder::new()
            .with_target(BuildTarget::Solid)
            .with_fallback(BuildFallback::Abort);
        assert!(build_with(builder, facets).is_err());
    }

    #[test]
    fn solid_target_rejects_sheets() {
        let facets = vec![vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)]];
        let builder = TessellatedShapeBuilder::new().with_target(BuildTarget::Solid);
        let result = build_with(builder, facets).unwrap();
        assert_eq!(result.outcome, BuildOutcome::Mesh);
    }

    #[test]
    fn mesh_target_skips_shell_building() {
        let builder = TessellatedShapeBuilder::new().with_target(BuildTarget::Mesh);
        let result = build_with(builder, tetra_facets()).unwrap();
        assert_eq!(result.outcome, BuildOutcome::Mesh);
        assert_eq!(result.objects[0].as_mesh().unwrap().triangle_count(), 4);
    }

    #[test]
    fn near_duplicate_corners_are_welded() {
        let mut facets = tetra_facets();
        facets[3][1] += crate::math::Vector3::new(1e-8, -1e-8, 0.0);
        let result = build_with(TessellatedShapeBuilder::new(), facets).unwrap();
        assert_eq!(result.outcome, BuildOutcome::Solid);
    }

    #[test]
    fn each_face_set_yields_one_object() {
        let mut builder = TessellatedShapeBuilder::new();
        for offset in [0.0, 5.0] {
            builder.open_connected_face_set(true).unwrap();
            for facet in tetra_facets() {
                let moved = facet.into_iter().map(|q| q + crate::math::Vector3::x() * offset).collect();
                assert!(builder.add_face(moved).unwrap());
            }
            builder.close_connected_face_set().unwrap();
        }
        let result = builder.build().unwrap();
        assert_eq!(result.objects.len(), 2);
        assert_eq!(result.outcome, BuildOutcome::Solid);
    }

    // ── Facet validity ──────────────────────────────────────

    #[test]
    fn degenerate_facets_are_skipped() {
        let mut builder = TessellatedShapeBuilder::new();
        builder.open_connected_face_set(false).unwrap();
        let collinear = vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)];
        let repeated = vec![p(0.0, 0.0, 0.0), p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)];
        let skew = vec![
            p(0.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(1.0, 1.0, 1.0),
            p(0.0, 1.0, 0.0),
        ];
        assert!(!builder.add_face(collinear).unwrap());
        assert!(!builder.add_face(repeated).unwrap());
        assert!(!builder.add_face(skew).unwrap());
        builder.close_connected_face_set().unwrap();

        let err = builder.build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoGeometry);
    }

    #[test]
    fn protocol_misuse_is_reported() {
        let mut builder = TessellatedShapeBuilder::new();
        assert!(builder.add_face(tetra_facets().remove(0)).is_err());
        assert!(builder.close_connected_face_set().is_err());
        builder.open_connected_face_set(false).unwrap();
        assert!(builder.open_connected_face_set(false).is_err());
        assert!(builder.build().is_err());
    }

    #[test]
    fn far_coordinates_with_tiny_tolerance_still_weld() {
        let far = 1e5;
        let facets = vec![
            vec![p(far, 0.0, 0.0), p(far + 1.0, 0.0, 0.0), p(far, 1.0, 0.0)],
            vec![p(far + 1.0, 0.0, 0.0), p(far + 1.0, 1.0, 0.0), p(far, 1.0, 0.0)],
        ];
        let builder = TessellatedShapeBuilder::new().with_weld_tolerance(1e-15);
        let result = build_with(builder, facets).unwrap();
        assert_eq!(result.outcome, BuildOutcome::Sheet);
        assert_relative_eq!(result.objects[0].as_solid().unwrap().area().unwrap(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn saturated_grid_keys_do_not_overflow() {
        let edge = (i64::MAX, i64::MIN, 0);
        let cells: Vec<_> = neighbours(edge).collect();
        assert_eq!(cells.len(), 27);
        assert!(cells.contains(&edge));
        assert_eq!(grid_key(&p(1e300, -1e300, 0.0), 1e-15), (i64::MAX, i64::MIN, 0));
    }

    #[test]
    fn non_positive_weld_tolerance_is_rejected() {
        let builder = TessellatedShapeBuilder::new().with_weld_tolerance(0.0);
        let err = build_with(builder, tetra_facets()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
