mod make_bounding_box_solid;
mod make_box;
mod make_plane_slab;
mod make_shell;
mod make_solid;
mod make_sphere;

pub use make_bounding_box_solid::MakeBoundingBoxSolid;
pub use make_box::MakeBox;
pub use make_plane_slab::{MakePlaneSlab, DEFAULT_SLAB_EXTENT, DEFAULT_SLAB_THICKNESS};
pub use make_shell::MakeShell;
pub use make_solid::MakeSolid;
pub use make_sphere::MakeSphere;
