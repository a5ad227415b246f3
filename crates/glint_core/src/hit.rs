use glint_math::Vec3;

/// Record of a successful ray-object intersection.
#[derive(Debug, Clone, Copy)]
pub struct Hit {
    /// Hit point in world space.
    pub origin: Vec3,
    /// Unit-length surface normal at the hit point.
    pub normal: Vec3,
    /// Distance along the ray, in ray-parameter units. Callers supply
    /// unit-length directions, which makes this a world-space distance and
    /// keeps it comparable across primitive kinds.
    pub distance: f32,
    /// Index into the owning world's material table.
    pub material_index: usize,
}
