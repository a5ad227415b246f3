//! Analytic primitives and the closed shape set the world stores.

use glint_core::{Hit, Mesh};
use glint_math::Vec3;

/// A sphere defined by center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

/// An infinite plane through `point` with unit-length `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

/// The closed set of shapes a world can hold.
#[derive(Debug)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Mesh(Mesh),
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}

impl From<Plane> for Shape {
    fn from(plane: Plane) -> Self {
        Shape::Plane(plane)
    }
}

impl From<Mesh> for Shape {
    fn from(mesh: Mesh) -> Self {
        Shape::Mesh(mesh)
    }
}

impl Sphere {
    /// Smallest positive root of the ray-sphere quadratic.
    ///
    /// `direction` is used as-is, so the returned distance is in
    /// ray-parameter units; callers pass unit directions to keep it
    /// comparable with the other primitives.
    pub fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<Hit> {
        let l = origin - self.center;
        let a = direction.dot(direction);
        let b = 2.0 * direction.dot(l);
        let c = l.dot(l) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_discriminant = discriminant.sqrt();
        let t0 = (-b - sqrt_discriminant) / (2.0 * a);
        let t1 = (-b + sqrt_discriminant) / (2.0 * a);

        let distance = if t0 > 0.0 {
            t0
        } else if t1 > 0.0 {
            t1
        } else {
            return None;
        };

        let point = origin + direction * distance;
        Some(Hit {
            origin: point,
            normal: (point - self.center).normalize(),
            distance,
            material_index: 0,
        })
    }
}

impl Plane {
    pub fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<Hit> {
        let denominator = direction.dot(self.normal);
        if denominator.abs() < 1e-6 {
            return None;
        }

        let distance = (self.point - origin).dot(self.normal) / denominator;
        if distance <= 0.0 {
            return None;
        }

        Some(Hit {
            origin: origin + direction * distance,
            normal: self.normal.normalize(),
            distance,
            material_index: 0,
        })
    }
}

impl Shape {
    /// Dispatch to the primitive's intersector. The hit's material index is
    /// left at zero; the world fills it in.
    pub fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<Hit> {
        match self {
            Shape::Sphere(sphere) => sphere.intersect(origin, direction),
            Shape::Plane(plane) => plane.intersect(origin, direction),
            Shape::Mesh(mesh) => mesh.intersect(origin, direction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_hit_from_outside() {
        let sphere = Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
        };

        let hit = sphere.intersect(Vec3::new(0.0, 0.0, -5.0), Vec3::Z).unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-5);
        assert!((hit.normal - -Vec3::Z).length() < 1e-5);
        assert!((hit.origin - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_sphere_hit_from_inside_uses_far_root() {
        let sphere = Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
        };

        let hit = sphere.intersect(Vec3::ZERO, Vec3::Z).unwrap();
        assert!((hit.distance - 1.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_behind_ray_misses() {
        let sphere = Sphere {
            center: Vec3::new(0.0, 0.0, -5.0),
            radius: 1.0,
        };

        assert!(sphere.intersect(Vec3::ZERO, Vec3::Z).is_none());
    }

    #[test]
    fn test_plane_hit() {
        let plane = Plane {
            point: Vec3::new(0.0, -2.0, 0.0),
            normal: Vec3::Y,
        };

        let hit = plane.intersect(Vec3::ZERO, -Vec3::Y).unwrap();
        assert!((hit.distance - 2.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_parallel_ray_misses_plane() {
        let plane = Plane {
            point: Vec3::new(0.0, -2.0, 0.0),
            normal: Vec3::Y,
        };

        assert!(plane.intersect(Vec3::ZERO, Vec3::X).is_none());
    }
}
