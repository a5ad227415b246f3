//! Parallel tile renderer: primary rays over row bands, with optional
//! checkerboard interlacing.

use std::sync::atomic::{AtomicU32, Ordering};

use glint_math::Vec3;
use rayon::prelude::*;

use crate::color::Rgba8;
use crate::world::World;

/// Writable 2D pixel surface supplied by the host.
///
/// Concurrent `set` calls on distinct pixels must be safe; out-of-range
/// writes are silently dropped.
pub trait PixelTarget: Sync {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    fn set(&self, x: i32, y: i32, rgba: Rgba8);
}

/// Per-frame input snapshot. Only the frame counter is consumed, to drive
/// the checkerboard phase.
pub trait InputState: Sync {
    fn counter(&self) -> u32;
}

/// Trivial input snapshot for hosts that just track a frame number.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameCounter(pub u32);

impl InputState for FrameCounter {
    fn counter(&self) -> u32 {
        self.0
    }
}

/// An RGBA buffer with atomic pixels, satisfying the concurrent
/// disjoint-write contract of [`PixelTarget`].
pub struct FrameBuffer {
    width: i32,
    height: i32,
    pixels: Vec<AtomicU32>,
}

impl FrameBuffer {
    pub fn new(width: i32, height: i32) -> Self {
        let size = (width.max(0) as usize) * (height.max(0) as usize);
        Self {
            width,
            height,
            pixels: (0..size).map(|_| AtomicU32::new(0)).collect(),
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Rgba8> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        let bits = self.pixels[(y * self.width + x) as usize].load(Ordering::Relaxed);
        Some(Rgba8::from_bits(bits))
    }

    /// Row-major RGBA bytes, for blitting or encoding.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|pixel| {
                let rgba = Rgba8::from_bits(pixel.load(Ordering::Relaxed));
                [rgba.r, rgba.g, rgba.b, rgba.a]
            })
            .collect()
    }
}

impl PixelTarget for FrameBuffer {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn set(&self, x: i32, y: i32, rgba: Rgba8) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        self.pixels[(y * self.width + x) as usize].store(rgba.to_bits(), Ordering::Relaxed);
    }
}

impl World {
    /// Render one frame of primary rays into `target`.
    ///
    /// Rows are split into `ceil(h / T)`-high bands, one per worker, so
    /// bands write disjoint rows and need no synchronization beyond `set`.
    /// With checkerboarding on, pixels whose parity matches the frame
    /// counter are skipped and the target keeps last frame's values there;
    /// rays that escape the scene write nothing at all.
    pub fn draw(&self, input: &dyn InputState, target: &dyn PixelTarget) {
        let width = target.width();
        let height = target.height();
        if width <= 0 || height <= 0 {
            return;
        }

        let aspect = width as f32 / height as f32;
        let half_fov_tan = (self.fov().radians() / 2.0).tan();
        let rotation = self.rotation_matrix();
        let camera_position = self.camera_position();
        let checkerboard = self.checkerboard();
        let counter = input.counter();

        let workers = rayon::current_num_threads().max(1) as i32;
        let rows_per_band = (height + workers - 1) / workers;

        (0..workers).into_par_iter().for_each(|band| {
            let y_start = band * rows_per_band;
            let y_end = (y_start + rows_per_band).min(height);

            for y in y_start..y_end {
                for x in 0..width {
                    if checkerboard && (x as u32 + y as u32).wrapping_add(counter) % 2 == 0 {
                        continue;
                    }

                    let ndc_x = (2.0 * (x as f32 + 0.5) / width as f32 - 1.0) * aspect;
                    let ndc_y = 1.0 - 2.0 * (y as f32 + 0.5) / height as f32;

                    let forward =
                        Vec3::new(ndc_x * half_fov_tan, ndc_y * half_fov_tan, 1.0).normalize();
                    let direction = rotation * forward;

                    if let Some(hit) = self.cast_ray(camera_position, direction) {
                        let color = self.material(hit.material_index).shade(&hit, self, 0);
                        target.set(x, y, color.to_rgba8());
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{palette, Color};
    use crate::material::Material;
    use crate::shape::{Plane, Sphere};
    use glint_math::deg;
    use std::sync::atomic::AtomicBool;

    /// Records which pixels were written, for coverage assertions.
    struct RecordingTarget {
        width: i32,
        height: i32,
        written: Vec<AtomicBool>,
    }

    impl RecordingTarget {
        fn new(width: i32, height: i32) -> Self {
            Self {
                width,
                height,
                written: (0..width * height).map(|_| AtomicBool::new(false)).collect(),
            }
        }

        fn was_written(&self, x: i32, y: i32) -> bool {
            self.written[(y * self.width + x) as usize].load(Ordering::Relaxed)
        }

        fn write_count(&self) -> usize {
            self.written
                .iter()
                .filter(|flag| flag.load(Ordering::Relaxed))
                .count()
        }
    }

    impl PixelTarget for RecordingTarget {
        fn width(&self) -> i32 {
            self.width
        }

        fn height(&self) -> i32 {
            self.height
        }

        fn set(&self, x: i32, y: i32, _rgba: Rgba8) {
            self.written[(y * self.width + x) as usize].store(true, Ordering::Relaxed);
        }
    }

    /// A wall in front of the camera so every primary ray hits.
    fn wall_world() -> World {
        let mut world = World::new();
        world.add(
            Plane {
                point: Vec3::new(0.0, 0.0, 2.0),
                normal: -Vec3::Z,
            },
            Material::solid(palette::GRAY),
        );
        world
    }

    #[test]
    fn test_empty_scene_writes_nothing() {
        let world = World::new();
        let target = RecordingTarget::new(4, 4);

        world.draw(&FrameCounter(0), &target);
        assert_eq!(target.write_count(), 0);
    }

    #[test]
    fn test_center_pixel_hits_centered_sphere() {
        let mut world = World::new();
        world.set_checkerboard(false);
        world.set_fov(deg(90.0));
        world.add(
            Sphere {
                center: Vec3::new(0.0, 0.0, 5.0),
                radius: 1.0,
            },
            Material::solid(Color::rgb(1.0, 0.0, 0.0)),
        );

        let target = FrameBuffer::new(100, 100);
        world.draw(&FrameCounter(0), &target);

        assert_eq!(
            target.get(50, 50).unwrap(),
            Rgba8 { r: 255, g: 0, b: 0, a: 255 }
        );
        // Corner rays miss the sphere and leave their pixels untouched.
        assert_eq!(target.get(0, 0).unwrap(), Rgba8::default());
        assert_eq!(target.get(99, 99).unwrap(), Rgba8::default());
    }

    #[test]
    fn test_checkerboard_covers_every_pixel_across_two_frames() {
        let mut world = wall_world();
        world.set_checkerboard(true);

        let even = RecordingTarget::new(8, 8);
        let odd = RecordingTarget::new(8, 8);
        world.draw(&FrameCounter(0), &even);
        world.draw(&FrameCounter(1), &odd);

        for y in 0..8 {
            for x in 0..8 {
                let frames = even.was_written(x, y) as u32 + odd.was_written(x, y) as u32;
                assert_eq!(frames, 1, "pixel ({x}, {y}) written in {frames} frames");
            }
        }
    }

    #[test]
    fn test_checkerboard_off_writes_everything() {
        let mut world = wall_world();
        world.set_checkerboard(false);

        let target = RecordingTarget::new(8, 8);
        world.draw(&FrameCounter(0), &target);
        assert_eq!(target.write_count(), 64);
    }

    #[test]
    fn test_out_of_range_set_is_dropped() {
        let target = FrameBuffer::new(2, 2);
        target.set(-1, 0, Rgba8 { r: 9, g: 9, b: 9, a: 9 });
        target.set(0, 7, Rgba8 { r: 9, g: 9, b: 9, a: 9 });
        assert!(target.get(-1, 0).is_none());
        assert_eq!(target.get(0, 0).unwrap(), Rgba8::default());
    }

    #[test]
    fn test_band_partition_covers_all_rows() {
        // Heights that do not divide evenly across workers still cover
        // every row exactly once.
        let mut world = wall_world();
        world.set_checkerboard(false);

        for height in [1, 3, 7, 13] {
            let target = RecordingTarget::new(3, height);
            world.draw(&FrameCounter(0), &target);
            assert_eq!(target.write_count(), (3 * height) as usize);
        }
    }
}
