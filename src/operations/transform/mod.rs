mod transform_solid;

pub use transform_solid::TransformSolid;
