use std::f64::consts::TAU;

use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::Profile;
use crate::math::{newell_normal, Point3, Vector3, TOLERANCE};
use crate::operations::creation::{MakeShell, MakeSolid};
use crate::tessellation::TessellationParams;
use crate::topology::{SolidId, TopologyStore};

/// Distance from the axis below which a profile point is treated as on it.
const ON_AXIS_TOLERANCE: f64 = 1e-9;

/// Allowed deviation of the axis from the profile plane.
const COPLANAR_TOLERANCE: f64 = 1e-7;

/// Revolves a closed profile 360 degrees around an axis to create a
/// polyhedral solid of revolution.
///
/// The profile must lie in a plane containing the axis and stay on one side
/// of it; profile points on the axis collapse the adjoining side quads into
/// triangles. The angular segment count follows the chord rule of the
/// tessellation parameters at the largest radius.
pub struct Revolve {
    profile: Profile,
    axis_origin: Point3,
    axis_dir: Vector3,
    params: TessellationParams,
}

impl Revolve {
    /// Creates a new `Revolve` operation with default tessellation parameters.
    #[must_use]
    pub fn new(profile: Profile, axis_origin: Point3, axis_dir: Vector3) -> Self {
        Self {
            profile,
            axis_origin,
            axis_dir,
            params: TessellationParams::default(),
        }
    }

    /// Sets the parameters used for arc chords and angular segments.
    #[must_use]
    pub fn with_params(mut self, params: TessellationParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the revolution, creating a solid in the topology store.
    ///
    /// Nothing is added to the store when validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidArgument`] for a zero-length axis and
    /// [`GeometryError::Degenerate`] if the profile plane does not contain
    /// the axis, the profile crosses the axis or every profile point lies on
    /// the axis.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        let axis_len = self.axis_dir.norm();
        if !axis_len.is_finite() || axis_len < TOLERANCE {
            return Err(OperationError::InvalidArgument(
                "revolve axis direction must be non-zero".into(),
            )
            .into());
        }
        let axis = self.axis_dir / axis_len;

        let profile_points = self.profile.discretize(&self.params)?;
        let normal = newell_normal(&profile_points)
            .ok_or_else(|| GeometryError::Degenerate("profile encloses no area".into()))?;
        if normal.dot(&axis).abs() > COPLANAR_TOLERANCE
            || (self.axis_origin - profile_points[0]).dot(&normal).abs() > COPLANAR_TOLERANCE
        {
            return Err(GeometryError::Degenerate(
                "profile plane does not contain the revolution axis".into(),
            )
            .into());
        }

        let mut infos: Vec<VertexInfo> = profile_points
            .iter()
            .map(|p| VertexInfo::new(p, &self.axis_origin, &axis))
            .collect();
        let ref_dir = compute_ref_dir(&infos)?;

        for info in &mut infos {
            info.radius = info.radial.dot(&ref_dir);
            if info.radius < -ON_AXIS_TOLERANCE {
                return Err(GeometryError::Degenerate(
                    "profile crosses the revolution axis".into(),
                )
                .into());
            }
        }

        // Side quads face outward when the profile runs counter-clockwise in
        // (radius, height) coordinates.
        if signed_area(&infos) < 0.0 {
            infos.reverse();
        }

        let max_radius = infos.iter().map(|i| i.radius).fold(0.0, f64::max);
        let segments = self.params.arc_segments(max_radius, TAU);
        let binormal = axis.cross(&ref_dir);

        // Ring of revolved copies per profile point; on-axis points get one.
        let mut points = Vec::new();
        let mut ring_start = Vec::with_capacity(infos.len());
        for info in &infos {
            ring_start.push(points.len());
            if info.on_axis() {
                points.push(info.axis_foot);
            } else {
                points.extend((0..segments).map(|k| {
                    let theta = angle(k, segments);
                    let radial = ref_dir * theta.cos() + binormal * theta.sin();
                    info.axis_foot + radial * info.radius
                }));
            }
        }
        let index = |i: usize, k: usize| {
            if infos[i].on_axis() {
                ring_start[i]
            } else {
                ring_start[i] + k % segments
            }
        };

        let n = infos.len();
        let mut polygons = Vec::with_capacity(n * segments);
        for i in 0..n {
            let j = (i + 1) % n;
            match (infos[i].on_axis(), infos[j].on_axis()) {
                (true, true) => {}
                (true, false) => {
                    for k in 0..segments {
                        polygons.push(vec![index(i, k), index(j, k + 1), index(j, k)]);
                    }
                }
                (false, true) => {
                    for k in 0..segments {
                        polygons.push(vec![index(i, k), index(i, k + 1), index(j, k)]);
                    }
                }
                (false, false) => {
                    for k in 0..segments {
                        polygons.push(vec![
                            index(i, k),
                            index(i, k + 1),
                            index(j, k + 1),
                            index(j, k),
                        ]);
                    }
                }
            }
        }

        let shell = MakeShell::new(points, polygons).execute(store)?;
        MakeSolid::new(shell).execute(store)
    }
}

/// Per-vertex geometric information relative to the revolution axis.
struct VertexInfo {
    /// Offset from the axis, perpendicular to it.
    radial: Vector3,
    /// Signed distance from the axis along the reference direction.
    radius: f64,
    /// Height (signed projection onto the axis).
    height: f64,
    /// Foot of perpendicular on the axis.
    axis_foot: Point3,
}

impl VertexInfo {
    fn new(point: &Point3, axis_origin: &Point3, axis: &Vector3) -> Self {
        let height = (point - axis_origin).dot(axis);
        let axis_foot = axis_origin + axis * height;
        let radial = point - axis_foot;
        Self {
            radial,
            radius: radial.norm(),
            height,
            axis_foot,
        }
    }

    fn on_axis(&self) -> bool {
        self.radius.abs() < ON_AXIS_TOLERANCE
    }
}

/// Unit radial direction of the first off-axis profile point.
fn compute_ref_dir(infos: &[VertexInfo]) -> Result<Vector3> {
    infos
        .iter()
        .find(|info| !info.on_axis())
        .map(|info| info.radial / info.radius)
        .ok_or_else(|| {
            GeometryError::Degenerate("all profile points lie on the revolution axis".into()).into()
        })
}

/// Shoelace area of the profile in (radius, height) coordinates.
fn signed_area(infos: &[VertexInfo]) -> f64 {
    let n = infos.len();
    (0..n)
        .map(|i| {
            let a = &infos[i];
            let b = &infos[(i + 1) % n];
            a.radius * b.height - b.radius * a.height
        })
        .sum::<f64>()
        * 0.5
}

#[allow(clippy::cast_precision_loss)]
fn angle(k: usize, segments: usize) -> f64 {
    TAU * k as f64 / segments as f64
}
