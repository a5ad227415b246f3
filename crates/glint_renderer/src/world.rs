//! The scene store: objects, deduplicated materials, lights and camera.

use glint_core::Hit;
use glint_math::{deg, Angle, Mat3, Vec3};

use crate::color::{palette, Color};
use crate::material::{BsdfMode, GiMode, Material};
use crate::shape::Shape;

/// A point light with no falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Color,
}

/// Handle to an object added to a world.
///
/// Index-based, so it stays valid as the object list grows; objects are
/// never removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRef {
    index: usize,
}

/// Owns the scene and exposes the two core operations: `cast_ray` and
/// `draw` (the latter lives in the render module).
pub struct World {
    /// Shapes paired with their material index.
    objects: Vec<(Shape, usize)>,
    /// Materials; indices are stable for the lifetime of the world.
    materials: Vec<Material>,
    lights: Vec<PointLight>,

    camera_position: Vec3,
    camera_pitch: Angle,
    camera_yaw: Angle,
    camera_roll: Angle,

    background_color: Color,

    fov: Angle,
    checkerboard: bool,
    shadows: bool,
    bsdf_mode: BsdfMode,
    gi_mode: GiMode,
}

impl Default for World {
    fn default() -> Self {
        Self {
            objects: Vec::new(),
            // Index 0 is the fallback solid red; `add` dedupes against it
            // like any other entry.
            materials: vec![Material::solid(palette::RED)],
            lights: Vec::new(),
            camera_position: Vec3::ZERO,
            camera_pitch: Angle::ZERO,
            camera_yaw: Angle::ZERO,
            camera_roll: Angle::ZERO,
            background_color: palette::BLACK,
            fov: deg(80.0),
            checkerboard: true,
            shadows: true,
            bsdf_mode: BsdfMode::default(),
            gi_mode: GiMode::default(),
        }
    }
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape with a material. Structurally equal materials share one
    /// table entry; the returned handle survives later additions.
    pub fn add(&mut self, shape: impl Into<Shape>, material: impl Into<Material>) -> ObjectRef {
        let material = material.into();
        let material_index = match self
            .materials
            .iter()
            .position(|existing| *existing == material)
        {
            Some(index) => index,
            None => {
                self.materials.push(material);
                self.materials.len() - 1
            }
        };

        self.objects.push((shape.into(), material_index));
        ObjectRef {
            index: self.objects.len() - 1,
        }
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    pub fn shape(&self, object: ObjectRef) -> &Shape {
        &self.objects[object.index].0
    }

    pub fn shape_mut(&mut self, object: ObjectRef) -> &mut Shape {
        &mut self.objects[object.index].0
    }

    pub fn objects(&self) -> &[(Shape, usize)] {
        &self.objects
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn material(&self, index: usize) -> &Material {
        &self.materials[index]
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    /// Translate the camera in its yaw frame, so +Z is always "forward".
    pub fn move_camera(&mut self, delta: Vec3) {
        self.camera_position += Mat3::from_rotation_y(self.camera_yaw.radians()) * delta;
    }

    pub fn rotate_pitch(&mut self, angle: Angle) {
        self.camera_pitch += angle;
    }

    pub fn rotate_yaw(&mut self, angle: Angle) {
        self.camera_yaw += angle;
    }

    pub fn rotate_roll(&mut self, angle: Angle) {
        self.camera_roll += angle;
    }

    pub fn camera_position(&self) -> Vec3 {
        self.camera_position
    }

    pub fn camera_pitch(&self) -> Angle {
        self.camera_pitch
    }

    pub fn camera_yaw(&self) -> Angle {
        self.camera_yaw
    }

    pub fn camera_roll(&self) -> Angle {
        self.camera_roll
    }

    /// Camera orientation for primary rays: pitch applied first, then yaw.
    /// Roll is tracked but not part of the ray basis.
    pub fn rotation_matrix(&self) -> Mat3 {
        Mat3::from_rotation_y(self.camera_yaw.radians())
            * Mat3::from_rotation_x(self.camera_pitch.radians())
    }

    pub fn view_direction(&self) -> Vec3 {
        self.rotation_matrix() * Vec3::Z
    }

    pub fn set_fov(&mut self, angle: Angle) {
        self.fov = angle;
    }

    pub fn fov(&self) -> Angle {
        self.fov
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.background_color = color;
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    pub fn set_checkerboard(&mut self, value: bool) {
        self.checkerboard = value;
    }

    pub fn checkerboard(&self) -> bool {
        self.checkerboard
    }

    pub fn set_shadows(&mut self, value: bool) {
        self.shadows = value;
    }

    pub fn shadows(&self) -> bool {
        self.shadows
    }

    pub fn set_bsdf_mode(&mut self, mode: BsdfMode) {
        self.bsdf_mode = mode;
    }

    pub fn bsdf_mode(&self) -> BsdfMode {
        self.bsdf_mode
    }

    pub fn cycle_bsdf_mode(&mut self) {
        self.bsdf_mode = self.bsdf_mode.next();
    }

    pub fn set_gi_mode(&mut self, mode: GiMode) {
        self.gi_mode = mode;
    }

    pub fn gi_mode(&self) -> GiMode {
        self.gi_mode
    }

    pub fn cycle_gi_mode(&mut self) {
        self.gi_mode = self.gi_mode.next();
    }

    /// Nearest intersection across every object, or `None` when the ray
    /// escapes. `direction` must be unit-length so distances compare
    /// across primitive kinds.
    pub fn cast_ray(&self, origin: Vec3, direction: Vec3) -> Option<Hit> {
        let mut best_hit: Option<Hit> = None;

        for (shape, material_index) in &self.objects {
            if let Some(mut hit) = shape.intersect(origin, direction) {
                if best_hit
                    .as_ref()
                    .map_or(true, |best| hit.distance < best.distance)
                {
                    hit.material_index = *material_index;
                    best_hit = Some(hit);
                }
            }
        }

        best_hit
    }
}
