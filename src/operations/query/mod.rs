mod area;
mod bounding_box;
mod centroid;
mod is_valid;
mod volume;

pub use area::Area;
pub use bounding_box::{Aabb, BoundingBox};
pub use centroid::Centroid;
pub use is_valid::IsValid;
pub use volume::Volume;
