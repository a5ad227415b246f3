//! Glint Core - mesh geometry for CPU ray tracing.
//!
//! This crate provides:
//!
//! - **Intersection records**: [`Hit`]
//! - **Triangle meshes**: [`Mesh`] with placement transforms
//! - **Acceleration**: median-split [`BvhNode`] build and traversal
//! - **Loading**: an OBJ subset loader behind the [`Io`] byte-reader trait

pub mod bvh;
pub mod hit;
pub mod mesh;
pub mod obj;

// Re-export commonly used types
pub use bvh::BvhNode;
pub use hit::Hit;
pub use mesh::{Mesh, Shading};
pub use obj::{load_mesh, DiskIo, Io, LoadError, LoadResult};
