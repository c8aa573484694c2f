//! The host document seam: what the highlighter needs from the CAD
//! application it draws into.

use std::fmt;

use crate::error::Result;
use crate::geometry::BoundingBoxXyz;
use crate::math::{Point3, RigidTransform, Vector3};
use crate::shape::GeometryObject;
use crate::tessellation::Triangle;

macro_rules! host_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

host_id!(
    /// Handle of a document element (visual or foreign).
    ElementId,
    "element"
);
host_id!(
    /// Handle of a view.
    ViewId,
    "view"
);
host_id!(
    /// Handle of a view filter.
    FilterId,
    "filter"
);

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Graphic override applied by a view to every element whose tag contains
/// `tag_prefix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorOverrideFilter {
    pub name: String,
    pub tag_prefix: String,
    /// Surface transparency in percent.
    pub transparency: u8,
    /// Solid surface fill.
    pub fill_color: Rgb,
}

/// A face of host geometry, as the host triangulates it.
#[derive(Debug, Clone, Default)]
pub struct HostFace {
    pub triangles: Vec<Triangle>,
}

impl HostFace {
    /// Wraps a triangulation.
    #[must_use]
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// Surface area of the triangulation.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|[a, b, c]| (b - a).cross(&(c - a)).norm() * 0.5)
            .sum()
    }
}

/// Geometry of an instance in its own coordinates, plus the transform
/// placing it in the document.
#[derive(Debug, Clone)]
pub struct InstanceGeometry {
    pub faces: Vec<HostFace>,
    pub transform: RigidTransform,
}

/// A placed family instance.
#[derive(Debug, Clone)]
pub struct Instance {
    pub bounding_box: Option<BoundingBoxXyz>,
    /// Insertion point; `None` for curve-driven instances.
    pub location: Option<Point3>,
    /// Facing orientation.
    pub facing: Vector3,
    pub geometry: Option<InstanceGeometry>,
}

impl Instance {
    /// A point-located instance without bounding box or geometry.
    #[must_use]
    pub fn at(location: Point3, facing: Vector3) -> Self {
        Self {
            bounding_box: None,
            location: Some(location),
            facing,
            geometry: None,
        }
    }

    /// Sets the bounding box.
    #[must_use]
    pub fn with_bounding_box(mut self, bounding_box: BoundingBoxXyz) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    /// Sets the instance geometry.
    #[must_use]
    pub fn with_geometry(mut self, geometry: InstanceGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }
}

/// What a selected document object is.
#[derive(Debug, Clone)]
pub enum HostObjectKind {
    Instance(Instance),
    Level { elevation: f64 },
    /// Anything the highlighter has no use for.
    Other,
}

/// A document object as returned by the selection.
#[derive(Debug, Clone)]
pub struct HostObject {
    pub id: ElementId,
    pub kind: HostObjectKind,
}

/// The CAD document the highlighter writes into.
///
/// Every mutating call must happen between [`begin_mutation`] and
/// [`commit`] (or [`rollback`]); scopes do not nest. Reads, selection and
/// view activation happen outside a scope.
///
/// [`begin_mutation`]: HostDocument::begin_mutation
/// [`commit`]: HostDocument::commit
/// [`rollback`]: HostDocument::rollback
pub trait HostDocument {
    /// Opens a named mutation scope.
    ///
    /// # Errors
    ///
    /// Fails if a scope is already open.
    fn begin_mutation(&mut self, label: &str) -> Result<()>;

    /// Keeps every change made since [`begin_mutation`](Self::begin_mutation).
    ///
    /// # Errors
    ///
    /// Fails if no scope is open.
    fn commit(&mut self) -> Result<()>;

    /// Discards every change made since [`begin_mutation`](Self::begin_mutation).
    ///
    /// # Errors
    ///
    /// Fails if no scope is open.
    fn rollback(&mut self) -> Result<()>;

    /// Persists a visual element built from `geometry`.
    ///
    /// # Errors
    ///
    /// Fails outside a scope or if the host rejects the geometry.
    fn create_visual_element(&mut self, geometry: Vec<GeometryObject>) -> Result<ElementId>;

    /// Sets the tag of a visual element.
    ///
    /// # Errors
    ///
    /// Fails outside a scope or for an unknown element.
    fn set_tag(&mut self, id: ElementId, tag: &str) -> Result<()>;

    /// Every visual element, tagged yet or not.
    fn tagged_elements(&self) -> Vec<ElementId>;

    /// Tag of a visual element.
    fn element_tag(&self, id: ElementId) -> Option<String>;

    /// Deletes a visual element.
    ///
    /// # Errors
    ///
    /// Fails outside a scope or for an unknown element.
    fn delete(&mut self, id: ElementId) -> Result<()>;

    /// Looks up a 3D view by name.
    fn find_view(&self, name: &str) -> Option<ViewId>;

    /// Creates a 3D view.
    ///
    /// # Errors
    ///
    /// Fails outside a scope or if the name is taken.
    fn create_view(&mut self, name: &str) -> Result<ViewId>;

    /// The view currently displayed.
    fn active_view(&self) -> Option<ViewId>;

    /// Displays `id`.
    ///
    /// # Errors
    ///
    /// Fails for an unknown view or while a scope is open.
    fn activate_view(&mut self, id: ViewId) -> Result<()>;

    /// Deletes a view.
    ///
    /// # Errors
    ///
    /// Fails outside a scope, for an unknown view and with
    /// [`HostError::ActiveViewConflict`](crate::error::HostError::ActiveViewConflict)
    /// for the displayed view.
    fn delete_view(&mut self, id: ViewId) -> Result<()>;

    /// Whether `id` still names a view.
    fn is_view_valid(&self, id: ViewId) -> bool;

    /// Attaches a color override filter to a view, reusing a document filter
    /// of the same name when there is one.
    ///
    /// # Errors
    ///
    /// Fails outside a scope or for an unknown view.
    fn add_color_override_filter(
        &mut self,
        view: ViewId,
        filter: &ColorOverrideFilter,
    ) -> Result<FilterId>;

    /// Currently selected objects.
    fn selection(&self) -> Vec<HostObject>;

    /// Replaces the selection.
    ///
    /// # Errors
    ///
    /// Fails if an id names nothing.
    fn set_selection(&mut self, ids: &[ElementId]) -> Result<()>;

    /// Shows a message to the user.
    fn notify_user(&mut self, message: &str);
}
