pub mod bounding_box;
pub mod curve;
pub mod profile;
pub mod surface;

pub use bounding_box::BoundingBoxXyz;
pub use curve::{Arc, BoundedCurve, Curve, CurveDomain, Line};
pub use profile::Profile;
pub use surface::Plane;
