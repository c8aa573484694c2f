use crate::error::Result;
use crate::geometry::BoundedCurve;
use crate::math::{Point3, RigidTransform};
use crate::operations::query::{Aabb, Area, BoundingBox, Centroid, IsValid, Volume};
use crate::operations::transform::TransformSolid;
use crate::tessellation::{TessellateSolid, TriangleMesh};
use crate::topology::{SolidId, TopologyStore};

/// A self-contained solid or sheet body: its own topology store plus the
/// root solid in it.
#[derive(Debug, Clone)]
pub struct Shape {
    store: TopologyStore,
    solid: SolidId,
}

impl Shape {
    /// Runs `construct` against a fresh store and wraps the solid it returns.
    ///
    /// # Errors
    ///
    /// Propagates the error of `construct`; nothing outlives a failure.
    pub fn build(construct: impl FnOnce(&mut TopologyStore) -> Result<SolidId>) -> Result<Self> {
        let mut store = TopologyStore::new();
        let solid = construct(&mut store)?;
        Ok(Self { store, solid })
    }

    /// A copy of this body moved by `transform`.
    ///
    /// # Errors
    ///
    /// Returns an error if the body's topology is incomplete.
    pub fn transformed(&self, transform: &RigidTransform) -> Result<Self> {
        let mut moved = self.clone();
        TransformSolid::new(moved.solid, *transform).execute(&mut moved.store)?;
        Ok(moved)
    }

    /// The store holding the body's topology.
    #[must_use]
    pub fn store(&self) -> &TopologyStore {
        &self.store
    }

    /// The root solid.
    #[must_use]
    pub fn solid(&self) -> SolidId {
        self.solid
    }

    /// `true` when the outer shell is closed, `false` for a sheet.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.store
            .solid(self.solid)
            .and_then(|s| self.store.shell(s.outer_shell))
            .is_ok_and(|shell| shell.is_closed)
    }

    /// Number of faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.store.solid_faces(self.solid).map_or(0, <[_]>::len)
    }

    /// Enclosed volume.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be tessellated.
    pub fn volume(&self) -> Result<f64> {
        Volume::new(self.solid).execute(&self.store)
    }

    /// Center of mass.
    ///
    /// # Errors
    ///
    /// Returns an error if the body encloses no volume.
    pub fn centroid(&self) -> Result<Point3> {
        Centroid::new(self.solid).execute(&self.store)
    }

    /// Axis-aligned bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if the body has no vertices.
    pub fn aabb(&self) -> Result<Aabb> {
        BoundingBox::new(self.solid).execute(&self.store)
    }

    /// Total face area.
    ///
    /// # Errors
    ///
    /// Returns an error if a face is missing.
    pub fn area(&self) -> Result<f64> {
        Area::new(self.solid).execute(&self.store)
    }

    /// Watertight, consistently oriented and enclosing positive volume.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        IsValid::new(self.solid).execute(&self.store)
    }

    /// Triangulates every face.
    ///
    /// # Errors
    ///
    /// Returns an error if a face cannot be triangulated.
    pub fn tessellate(&self) -> Result<TriangleMesh> {
        TessellateSolid::new(self.solid).execute(&self.store)
    }
}

/// One piece of geometry a visual element is built from.
#[derive(Debug, Clone)]
pub enum GeometryObject {
    /// A solid or sheet body.
    Solid(Shape),
    /// Loose triangles.
    Mesh(TriangleMesh),
    /// A bounded curve.
    Curve(BoundedCurve),
}

impl GeometryObject {
    /// The body, if this is one.
    #[must_use]
    pub fn as_solid(&self) -> Option<&Shape> {
        match self {
            Self::Solid(shape) => Some(shape),
            _ => None,
        }
    }

    /// The mesh, if this is one.
    #[must_use]
    pub fn as_mesh(&self) -> Option<&TriangleMesh> {
        match self {
            Self::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// The curve, if this is one.
    #[must_use]
    pub fn as_curve(&self) -> Option<&BoundedCurve> {
        match self {
            Self::Curve(curve) => Some(curve),
            _ => None,
        }
    }
}

impl From<Shape> for GeometryObject {
    fn from(shape: Shape) -> Self {
        Self::Solid(shape)
    }
}

impl From<TriangleMesh> for GeometryObject {
    fn from(mesh: TriangleMesh) -> Self {
        Self::Mesh(mesh)
    }
}

impl From<BoundedCurve> for GeometryObject {
    fn from(curve: BoundedCurve) -> Self {
        Self::Curve(curve)
    }
}
