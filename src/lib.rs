//! Debug geometry for CAD host documents.
//!
//! `shapemark` builds small polyhedral solids (boxes, spheres, plane slabs,
//! bounding boxes, curve markers and reconstructed faces), tags each one as
//! it is added to a host document, and removes them all again on request.
//! The host is reached through the [`HostDocument`] trait; an in-memory
//! implementation ships as [`MemoryDocument`].

pub mod config;
pub mod error;
pub mod geometry;
pub mod highlight;
pub mod math;
pub mod operations;
pub mod shape;
pub mod tessellation;
pub mod topology;

pub use config::HighlightConfig;
pub use error::{ErrorKind, Result, ShapemarkError};
pub use highlight::commands::{CommandStatus, DemoCommand};
pub use highlight::{with_mutation, HostDocument, Highlighter, MemoryDocument};
pub use shape::{GeometryObject, Shape};
