//! The visualization facade.
//!
//! [`Highlighter`] turns requests such as "show this bounding box" into
//! solids, tags them and hands them to a [`HostDocument`]. Element-creating
//! calls must run inside an open mutation (see [`with_mutation`]);
//! [`Highlighter::on_view_3d`] and [`Highlighter::clear_all`] open their own.

pub mod commands;
mod host;
mod memory;
mod session;
mod tag;

pub use host::{
    ColorOverrideFilter, ElementId, FilterId, HostDocument, HostFace, HostObject, HostObjectKind,
    Instance, InstanceGeometry, Rgb, ViewId,
};
pub use memory::{MemoryDocument, VisualElement, START_VIEW_NAME};
pub use session::Session;
pub use tag::{existing_tags, next_tag, purge, PurgeReport, ViewDisposition};

use tracing::{debug, info, warn};

use crate::config::HighlightConfig;
use crate::error::{HostError, OperationError, Result};
use crate::geometry::{BoundedCurve, BoundingBoxXyz, Plane};
use crate::math::{Point3, RigidTransform, Vector3, TOLERANCE};
use crate::operations::creation::{MakeBoundingBoxSolid, MakeBox, MakePlaneSlab, MakeSphere};
use crate::operations::reconstruct::ReconstructMesh;
use crate::operations::sampling::SampleCurve;
use crate::shape::{GeometryObject, Shape};
use crate::tessellation::Triangle;

/// Label of the mutation that creates the default view.
pub const GENERATE_VIEW_LABEL: &str = "DSF_Generate View";

/// Label of the purge mutation.
pub const CLEAR_ALL_LABEL: &str = "DSF_ClearAll";

/// Runs `body` inside a mutation labelled `label`, committing on success and
/// rolling back on failure.
///
/// # Errors
///
/// Returns the error of `body`, or the host error if the scope cannot be
/// opened or committed.
pub fn with_mutation<D, T, F>(doc: &mut D, label: &str, body: F) -> Result<T>
where
    D: HostDocument + ?Sized,
    F: FnOnce(&mut D) -> Result<T>,
{
    doc.begin_mutation(label)?;
    match body(doc) {
        Ok(value) => {
            doc.commit()?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = doc.rollback() {
                warn!(label, error = %rollback_err, "rollback failed");
            }
            debug!(label, error = %err, "mutation rolled back");
            Err(err)
        }
    }
}

/// Creates tagged debug geometry in a host document.
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    config: HighlightConfig,
    session: Session,
}

impl Highlighter {
    /// Creates a highlighter with an empty session.
    ///
    /// # Errors
    ///
    /// Returns the validation error of `config`.
    pub fn new(config: HighlightConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            session: Session::default(),
        })
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// The cached default view and filter.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Persists `objects` as one visual element carrying the next free tag.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NoGeometry`] for an empty list and host
    /// errors (for instance when no mutation is open).
    pub fn geometry<D: HostDocument + ?Sized>(
        &self,
        doc: &mut D,
        objects: Vec<GeometryObject>,
    ) -> Result<ElementId> {
        if objects.is_empty() {
            return Err(OperationError::NoGeometry("nothing to highlight".into()).into());
        }
        let tag = next_tag(&self.config.tag_prefix, &existing_tags(doc));
        let id = doc.create_visual_element(objects)?;
        doc.set_tag(id, &tag)?;
        info!(%id, %tag, "visual element created");
        Ok(id)
    }

    /// Highlights an axis-aligned box centered on `center`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidArgument`] for a non-positive size.
    pub fn rectangular_prism<D: HostDocument + ?Sized>(
        &self,
        doc: &mut D,
        center: Point3,
        width: f64,
        depth: f64,
        height: f64,
    ) -> Result<ElementId> {
        let prism = Shape::build(|store| MakeBox::new(center, width, depth, height).execute(store))?;
        self.geometry(doc, vec![prism.into()])
    }

    /// Highlights an axis-aligned cube centered on `center`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidArgument`] for a non-positive edge.
    pub fn cube<D: HostDocument + ?Sized>(
        &self,
        doc: &mut D,
        center: Point3,
        edge: f64,
    ) -> Result<ElementId> {
        let cube = Shape::build(|store| MakeBox::cube(center, edge).execute(store))?;
        self.geometry(doc, vec![cube.into()])
    }

    /// Highlights a sphere.
    ///
    /// # Errors
    ///
    /// Returns a degenerate-geometry error for a non-positive radius.
    pub fn sphere<D: HostDocument + ?Sized>(
        &self,
        doc: &mut D,
        center: Point3,
        radius: f64,
    ) -> Result<ElementId> {
        let sphere = self.sphere_shape(center, radius)?;
        self.geometry(doc, vec![sphere.into()])
    }

    /// Marks a point with a sphere of the configured point radius.
    ///
    /// # Errors
    ///
    /// See [`sphere`](Self::sphere).
    pub fn point<D: HostDocument + ?Sized>(&self, doc: &mut D, point: Point3) -> Result<ElementId> {
        self.sphere(doc, point, self.config.point_radius)
    }

    /// Marks a point with a sphere of `radius`.
    ///
    /// # Errors
    ///
    /// See [`sphere`](Self::sphere).
    pub fn point_with_radius<D: HostDocument + ?Sized>(
        &self,
        doc: &mut D,
        point: Point3,
        radius: f64,
    ) -> Result<ElementId> {
        self.sphere(doc, point, radius)
    }

    /// Highlights a triangulated face, moved by `transform` when given.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NoGeometry`] when no triangle is usable.
    pub fn face<D: HostDocument + ?Sized>(
        &self,
        doc: &mut D,
        triangles: &[Triangle],
        transform: Option<&RigidTransform>,
    ) -> Result<ElementId> {
        let mut reconstruct =
            ReconstructMesh::new(triangles.to_vec()).with_weld_tolerance(self.config.weld_tolerance);
        if let Some(transform) = transform {
            reconstruct = reconstruct.with_transform(*transform);
        }
        let objects = reconstruct.execute()?;
        self.geometry(doc, objects)
    }

    /// Highlights a plane as a thin slab of the configured default size.
    ///
    /// # Errors
    ///
    /// See [`plane_with_size`](Self::plane_with_size).
    pub fn plane<D: HostDocument + ?Sized>(&self, doc: &mut D, plane: &Plane) -> Result<ElementId> {
        self.plane_with_size(doc, plane, self.config.plane_width, self.config.plane_height)
    }

    /// Highlights a plane as a `width` × `height` slab centered on its origin.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidArgument`] for a non-positive size.
    pub fn plane_with_size<D: HostDocument + ?Sized>(
        &self,
        doc: &mut D,
        plane: &Plane,
        width: f64,
        height: f64,
    ) -> Result<ElementId> {
        let slab = Shape::build(|store| {
            MakePlaneSlab::new(plane.clone())
                .with_extents(width, height)
                .with_thickness(self.config.plane_thickness)
                .execute(store)
        })?;
        self.geometry(doc, vec![slab.into()])
    }

    /// Draws `direction` from `origin`, stretched by the configured vector
    /// scale: sample markers along the line, the line itself, then a point
    /// marker at the origin.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidArgument`] for a zero direction.
    pub fn vector<D: HostDocument + ?Sized>(
        &self,
        doc: &mut D,
        origin: Point3,
        direction: Vector3,
    ) -> Result<Vec<ElementId>> {
        let length = direction.norm();
        if !length.is_finite() || length < TOLERANCE {
            return Err(OperationError::InvalidArgument(
                "vector direction must be non-zero".into(),
            )
            .into());
        }
        let line = BoundedCurve::line(origin, origin + direction * self.config.vector_scale)?;
        let mut ids = self.curve_by_points(doc, &line)?;
        ids.push(self.point(doc, origin)?);
        Ok(ids)
    }

    /// Marks `curve` at the configured sample step, then adds the curve.
    ///
    /// # Errors
    ///
    /// See [`curve_by_points_with_step`](Self::curve_by_points_with_step).
    pub fn curve_by_points<D: HostDocument + ?Sized>(
        &self,
        doc: &mut D,
        curve: &BoundedCurve,
    ) -> Result<Vec<ElementId>> {
        self.curve_by_points_with_step(doc, curve, self.config.sample_step)
    }

    /// One marker sphere per sample of `curve` at `step`, then the curve
    /// itself as a last element.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidArgument`] for a bad step.
    pub fn curve_by_points_with_step<D: HostDocument + ?Sized>(
        &self,
        doc: &mut D,
        curve: &BoundedCurve,
        step: f64,
    ) -> Result<Vec<ElementId>> {
        let samples = SampleCurve::new(curve).with_step(step).execute()?;
        let marker = self.sphere_shape(Point3::origin(), self.config.marker_radius)?;

        let mut ids = Vec::with_capacity(samples.len() + 1);
        for sample in &samples {
            let placed = marker.transformed(&RigidTransform::translation(sample.x, sample.y, sample.z))?;
            ids.push(self.geometry(doc, vec![placed.into()])?);
        }
        ids.push(self.geometry(doc, vec![curve.clone().into()])?);
        Ok(ids)
    }

    /// Highlights a bounding box. A missing box is reported to the user.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NoGeometry`] for `None` and
    /// [`OperationError::InvalidArgument`] for an empty box.
    pub fn bounding_box<D: HostDocument + ?Sized>(
        &self,
        doc: &mut D,
        bbox: Option<&BoundingBoxXyz>,
    ) -> Result<ElementId> {
        let Some(bbox) = bbox else {
            doc.notify_user("Element doesn't have a bounding box");
            return Err(OperationError::NoGeometry("element has no bounding box".into()).into());
        };
        let solid = Shape::build(|store| MakeBoundingBoxSolid::new(bbox).execute(store))?;
        self.geometry(doc, vec![solid.into()])
    }

    /// Removes every visual element and the default view in one mutation.
    ///
    /// When the default view is displayed it is kept and the user is told
    /// why; the element removal still commits.
    ///
    /// # Errors
    ///
    /// Propagates host failures; nothing is removed then.
    pub fn clear_all<D: HostDocument + ?Sized>(&mut self, doc: &mut D) -> Result<PurgeReport> {
        let session = &mut self.session;
        let report = with_mutation(doc, CLEAR_ALL_LABEL, |doc| purge(doc, session))?;
        if report.view == ViewDisposition::RetainedActive {
            doc.notify_user(&HostError::ActiveViewConflict.to_string());
        }
        Ok(report)
    }

    /// Shows the default view, creating it with its color override filter on
    /// first use or adopting an existing view of the reserved name.
    ///
    /// Must be called outside a mutation.
    ///
    /// # Errors
    ///
    /// Propagates host failures; a failed creation is rolled back.
    pub fn on_view_3d<D: HostDocument + ?Sized>(&mut self, doc: &mut D) -> Result<ViewId> {
        let cached = self
            .session
            .default_view()
            .filter(|view| doc.is_view_valid(*view));

        let view = if let Some(view) = cached {
            view
        } else if let Some(existing) = doc.find_view(&self.config.view_name) {
            debug!(view = %existing, name = %self.config.view_name, "adopting existing default view");
            self.session.remember(existing, None);
            existing
        } else {
            let filter = self.color_override_filter();
            let name = &self.config.view_name;
            let (view, filter_id) = with_mutation(doc, GENERATE_VIEW_LABEL, |doc| {
                let view = doc.create_view(name)?;
                let filter_id = doc.add_color_override_filter(view, &filter)?;
                Ok((view, filter_id))
            })?;
            info!(%view, filter = %filter_id, %name, "default view created");
            self.session.remember(view, Some(filter_id));
            view
        };

        if doc.active_view() != Some(view) {
            doc.activate_view(view)?;
        }
        Ok(view)
    }

    /// The filter giving tagged elements their look.
    #[must_use]
    pub fn color_override_filter(&self) -> ColorOverrideFilter {
        ColorOverrideFilter {
            name: self.config.filter_name.clone(),
            tag_prefix: self.config.tag_prefix.clone(),
            transparency: self.config.transparency,
            fill_color: self.config.fill_color,
        }
    }

    fn sphere_shape(&self, center: Point3, radius: f64) -> Result<Shape> {
        Shape::build(|store| {
            MakeSphere::new(center, radius)
                .with_params(self.config.tessellation)
                .execute(store)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use approx::assert_relative_eq;
    use std::collections::HashSet;
    use std::f64::consts::PI;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn solid_of(doc: &MemoryDocument, id: ElementId) -> &Shape {
        doc.element(id).unwrap().geometry[0].as_solid().unwrap()
    }

    // ── Element creation ────────────────────────────────────

    #[test]
    fn creation_needs_an_open_mutation() {
        let mut doc = MemoryDocument::new();
        let err = Highlighter::default()
            .cube(&mut doc, Point3::origin(), 1.0)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Host);
    }

    #[test]
    fn primitives_are_tagged_in_order() {
        let highlighter = Highlighter::default();
        let mut doc = MemoryDocument::new();
        let ids = with_mutation(&mut doc, "primitives", |doc| {
            Ok(vec![
                highlighter.rectangular_prism(doc, p(0.0, 0.0, 0.0), 2.0, 3.0, 4.0)?,
                highlighter.cube(doc, p(5.0, 0.0, 0.0), 1.0)?,
                highlighter.sphere(doc, p(0.0, 5.0, 0.0), 1.0)?,
            ])
        })
        .unwrap();

        let tags: Vec<_> = ids.iter().map(|id| doc.element_tag(*id).unwrap()).collect();
        assert_eq!(tags, ["DSF0", "DSF1", "DSF2"]);
        assert_relative_eq!(solid_of(&doc, ids[0]).volume().unwrap(), 24.0, epsilon = 1e-9);
        let sphere = solid_of(&doc, ids[2]);
        assert!(sphere.is_valid());
        let ratio = sphere.volume().unwrap() / (4.0 / 3.0 * PI);
        assert!(ratio > 0.95 && ratio <= 1.0, "ratio {ratio}");
    }

    #[test]
    fn failed_request_rolls_back_the_batch() {
        let highlighter = Highlighter::default();
        let mut doc = MemoryDocument::new();
        let result = with_mutation(&mut doc, "batch", |doc| {
            highlighter.cube(doc, Point3::origin(), 1.0)?;
            highlighter.sphere(doc, Point3::origin(), 0.0)
        });
        assert_eq!(result.unwrap_err().kind(), ErrorKind::GeometryDegenerate);
        assert_eq!(doc.visual_element_count(), 0);
        assert!(!doc.is_mutation_open());
    }

    #[test]
    fn empty_geometry_is_refused() {
        let mut doc = MemoryDocument::new();
        let err = with_mutation(&mut doc, "empty", |doc| {
            Highlighter::default().geometry(doc, Vec::new())
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoGeometry);
    }

    #[test]
    fn plane_slab_is_thin_along_the_normal() {
        let plane = Plane::from_normal(p(1.0, 2.0, 3.0), Vector3::z()).unwrap();
        let mut doc = MemoryDocument::new();
        let id = with_mutation(&mut doc, "plane", |doc| Highlighter::default().plane(doc, &plane))
            .unwrap();
        let slab = solid_of(&doc, id);
        assert_relative_eq!(slab.volume().unwrap(), 10.0, epsilon = 1e-9);
        let size = slab.aabb().unwrap().size();
        assert_relative_eq!(size.z, 0.1, epsilon = 1e-9);
    }

    #[test]
    fn face_is_moved_by_the_transform() {
        let triangles = [
            [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0)],
            [p(0.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0)],
        ];
        let shift = RigidTransform::translation(0.0, 0.0, 7.0);
        let mut doc = MemoryDocument::new();
        let id = with_mutation(&mut doc, "face", |doc| {
            Highlighter::default().face(doc, &triangles, Some(&shift))
        })
        .unwrap();
        let sheet = solid_of(&doc, id);
        assert!(!sheet.is_closed());
        assert_relative_eq!(sheet.aabb().unwrap().min.z, 7.0, epsilon = 1e-12);
    }

    #[test]
    fn missing_bounding_box_is_reported() {
        let mut doc = MemoryDocument::new();
        let err = with_mutation(&mut doc, "bbox", |doc| {
            Highlighter::default().bounding_box(doc, None)
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoGeometry);
        assert_eq!(doc.messages().len(), 1);
    }

    // ── Vectors and curves ──────────────────────────────────

    #[test]
    fn vector_elements_are_distinctly_tagged() {
        let config = HighlightConfig::default().with_sample_step(0.25);
        let highlighter = Highlighter::new(config).unwrap();
        let mut doc = MemoryDocument::new();
        let ids = with_mutation(&mut doc, "vector", |doc| {
            highlighter.vector(doc, p(1.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0))
        })
        .unwrap();

        // five markers, the line, the origin point
        assert_eq!(ids.len(), 7);
        let tags: HashSet<_> = ids.iter().map(|id| doc.element_tag(*id).unwrap()).collect();
        assert_eq!(tags.len(), 7);

        let line = doc.element(ids[5]).unwrap().geometry[0].as_curve().unwrap();
        assert_relative_eq!(line.end_point().unwrap(), p(1.0, 0.0, 2.0), epsilon = 1e-12);
        let last_marker = solid_of(&doc, ids[4]);
        assert_relative_eq!(last_marker.centroid().unwrap(), p(1.0, 0.0, 2.0), epsilon = 1e-6);
        let origin = solid_of(&doc, ids[6]);
        assert_relative_eq!(origin.aabb().unwrap().size().y, 0.6, epsilon = 1e-9);
        assert_relative_eq!(origin.centroid().unwrap(), p(1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn default_vector_has_one_hundred_one_markers() {
        let mut doc = MemoryDocument::new();
        let ids = with_mutation(&mut doc, "vector", |doc| {
            Highlighter::default().vector(doc, Point3::origin(), Vector3::x())
        })
        .unwrap();
        assert_eq!(ids.len(), 103);
    }

    #[test]
    fn zero_vector_is_invalid() {
        let mut doc = MemoryDocument::new();
        let err = with_mutation(&mut doc, "vector", |doc| {
            Highlighter::default().vector(doc, Point3::origin(), Vector3::zeros())
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(doc.visual_element_count(), 0);
    }

    // ── Default view ────────────────────────────────────────

    #[test]
    fn default_view_is_created_once() {
        let mut highlighter = Highlighter::default();
        let mut doc = MemoryDocument::new();
        let first = highlighter.on_view_3d(&mut doc).unwrap();
        let second = highlighter.on_view_3d(&mut doc).unwrap();

        assert_eq!(first, second);
        assert_eq!(doc.active_view(), Some(first));
        assert_eq!(doc.view_names(), [START_VIEW_NAME, "DSF View"]);
        assert_eq!(doc.committed_labels(), [GENERATE_VIEW_LABEL]);
        let filters = doc.filters_of(first);
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].fill_color, Rgb::new(0, 128, 128));
        assert!(highlighter.session().default_filter().is_some());
    }

    #[test]
    fn existing_view_is_adopted() {
        let mut doc = MemoryDocument::new();
        let existing = with_mutation(&mut doc, "user view", |doc| doc.create_view("DSF View")).unwrap();

        let mut highlighter = Highlighter::default();
        assert_eq!(highlighter.on_view_3d(&mut doc).unwrap(), existing);
        assert_eq!(highlighter.session().default_view(), Some(existing));
        assert_eq!(doc.view_names().len(), 2);
    }

    #[test]
    fn clear_all_keeps_the_displayed_view() {
        let mut highlighter = Highlighter::default();
        let mut doc = MemoryDocument::new();
        with_mutation(&mut doc, "cube", |doc| highlighter.cube(doc, Point3::origin(), 1.0)).unwrap();
        let view = highlighter.on_view_3d(&mut doc).unwrap();

        let report = highlighter.clear_all(&mut doc).unwrap();
        assert_eq!(report.view, ViewDisposition::RetainedActive);
        assert_eq!(doc.visual_element_count(), 0);
        assert!(doc.is_view_valid(view));
        assert_eq!(
            doc.messages().last().map(String::as_str),
            Some("this view can't be deleted while it is opened; open another view and try again")
        );
    }

    #[test]
    fn clear_all_deletes_a_hidden_view() {
        let mut highlighter = Highlighter::default();
        let mut doc = MemoryDocument::new();
        let start = doc.active_view().unwrap();
        let view = highlighter.on_view_3d(&mut doc).unwrap();
        doc.activate_view(start).unwrap();

        let report = highlighter.clear_all(&mut doc).unwrap();
        assert_eq!(report.view, ViewDisposition::Deleted);
        assert!(!doc.is_view_valid(view));
        assert_eq!(highlighter.session(), &Session::default());

        // a later request recreates it
        let again = highlighter.on_view_3d(&mut doc).unwrap();
        assert_ne!(again, view);
    }
}
