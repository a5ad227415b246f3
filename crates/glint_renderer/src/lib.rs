//! Glint Renderer - interactive CPU ray tracing.
//!
//! A real-time software raytracer: a scene of spheres, planes and
//! BVH-accelerated triangle meshes, shaded with Lambert or Cook-Torrance
//! materials and drawn with primary rays over a row-banded worker pool.
//!
//! The host supplies three small surfaces: a [`PixelTarget`] to write into,
//! an [`InputState`] for the checkerboard phase, and (for mesh loading) an
//! [`Io`] byte reader.

mod color;
mod material;
mod render;
mod shape;
mod world;

pub use color::{palette, Color, Rgba8};
pub use material::{
    BsdfMaterial, BsdfMode, GiMode, LambertMaterial, Material, SolidMaterial,
};
pub use render::{FrameBuffer, FrameCounter, InputState, PixelTarget};
pub use shape::{Plane, Shape, Sphere};
pub use world::{ObjectRef, PointLight, World};

/// Re-export the geometry layer callers need to build scenes.
pub use glint_core::{load_mesh, DiskIo, Hit, Io, LoadError, LoadResult, Mesh, Shading};

/// Re-export the math types appearing in the public API.
pub use glint_math::{deg, rad, Angle};
