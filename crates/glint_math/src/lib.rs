// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod angle;
pub use angle::{deg, rad, Angle};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_mat3_rotation_composition() {
        // Pitch then yaw: a forward vector pitched 90 degrees up lands on +Y
        // regardless of the yaw applied afterwards.
        let rotation = Mat3::from_rotation_y(deg(45.0).radians())
            * Mat3::from_rotation_x(deg(-90.0).radians());
        let rotated = rotation * Vec3::Z;
        assert!((rotated - Vec3::Y).length() < 1e-6);
    }
}
