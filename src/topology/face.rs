use crate::geometry::surface::Plane;

use super::wire::WireId;

slotmap::new_key_type! {
    /// Unique identifier for a face in the topology store.
    pub struct FaceId;
}

/// Data associated with a topological face.
///
/// A face is a planar polygon bounded by one closed wire. The wire runs
/// counter-clockwise around the plane normal, and the plane normal points
/// out of the enclosed volume.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// The plane the face lies in, oriented outward.
    pub surface: Plane,
    /// The boundary wire.
    pub outer_wire: WireId,
}
