mod tessellate_face;
mod tessellate_solid;

pub use tessellate_face::{points_per_face, TessellateFace};
pub use tessellate_solid::TessellateSolid;
