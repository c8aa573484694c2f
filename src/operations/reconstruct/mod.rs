mod reconstruct_mesh;
mod tessellated_shape_builder;

pub use reconstruct_mesh::ReconstructMesh;
pub use tessellated_shape_builder::{
    BuildFallback, BuildOutcome, BuildResult, BuildTarget, TessellatedShapeBuilder,
    DEFAULT_WELD_TOLERANCE,
};
