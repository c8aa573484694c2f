pub mod creation;
pub mod query;
pub mod reconstruct;
pub mod sampling;
pub mod shaping;
pub mod transform;
