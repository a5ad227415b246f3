//! Triangle mesh with placement transform and BVH-accelerated intersection.

use glint_math::{Angle, Mat4, Vec3};

use crate::{BvhNode, Hit};

/// Normal mode selected by the OBJ `s` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    #[default]
    Flat,
    Smooth,
}

/// A triangle mesh placed in the world by translation, per-axis rotation
/// and uniform scale.
///
/// The face list is reordered in place when the BVH is built; afterwards
/// the stored order is authoritative and the tree addresses faces by
/// position. Mutating `vertices` or `faces` after [`Mesh::compute_bvh`]
/// requires a rebuild.
#[derive(Debug)]
pub struct Mesh {
    pub position: Vec3,
    pub scale: f32,
    pub pitch: Angle,
    pub yaw: Angle,
    pub roll: Angle,

    pub vertices: Vec<Vec3>,
    pub faces: Vec<[usize; 3]>,
    pub shading: Shading,

    bvh: Option<Box<BvhNode>>,
}

impl Default for Mesh {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: 1.0,
            pitch: Angle::ZERO,
            yaw: Angle::ZERO,
            roll: Angle::ZERO,
            vertices: Vec::new(),
            faces: Vec::new(),
            shading: Shading::Flat,
            bvh: None,
        }
    }
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)build the acceleration structure. A mesh without faces has no
    /// tree and never intersects.
    pub fn compute_bvh(&mut self) {
        if self.faces.is_empty() {
            self.bvh = None;
            return;
        }

        self.bvh = Some(BvhNode::build(&self.vertices, &mut self.faces, 0));
    }

    pub fn bvh(&self) -> Option<&BvhNode> {
        self.bvh.as_deref()
    }

    /// Placement matrix: scale, then pitch/yaw/roll, then translate.
    pub fn local_to_world(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_z(self.roll.radians())
            * Mat4::from_rotation_y(self.yaw.radians())
            * Mat4::from_rotation_x(self.pitch.radians())
            * Mat4::from_scale(Vec3::splat(self.scale))
    }

    pub fn world_to_local(&self) -> Mat4 {
        self.local_to_world().inverse()
    }

    /// Nearest triangle hit for a world-space ray, or `None`.
    ///
    /// The ray is taken to local space, traced against the BVH, and the hit
    /// mapped back. Transforming the normal by the same matrix is only
    /// valid because placement is rigid plus uniform scale.
    pub fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<Hit> {
        let bvh = self.bvh.as_deref()?;

        let world_to_local = self.world_to_local();
        let local_origin = world_to_local.transform_point3(origin);
        let local_direction = world_to_local.transform_vector3(direction).normalize();
        let local_direction_inv = local_direction.recip();

        let mut best_distance = f32::MAX;
        let mut best_hit = None;
        bvh.intersect(
            &self.vertices,
            &self.faces,
            local_origin,
            local_direction,
            local_direction_inv,
            &mut best_distance,
            &mut best_hit,
        );

        let mut hit = best_hit?;

        let local_to_world = self.local_to_world();
        hit.origin = local_to_world.transform_point3(hit.origin);
        hit.normal = local_to_world.transform_vector3(hit.normal).normalize();
        hit.distance = (hit.origin - origin).length();

        Some(hit)
    }
}
