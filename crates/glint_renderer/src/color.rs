//! Linear floating-point color with a lossy 8-bit conversion.

use glint_math::Vec3;

/// A linear RGB color.
///
/// Stored and composited in linear space; the byte conversion is a plain
/// scale-and-clamp with no gamma step. Equality is exact per component,
/// which is what material deduplication compares with.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// An 8-bit RGBA pixel as written to the target.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Lossy conversion to bytes: each channel is scaled by 255, clamped
    /// and rounded independently. Alpha is always opaque.
    pub fn to_rgba8(self) -> Rgba8 {
        Rgba8 {
            r: (self.r * 255.0).clamp(0.0, 255.0).round() as u8,
            g: (self.g * 255.0).clamp(0.0, 255.0).round() as u8,
            b: (self.b * 255.0).clamp(0.0, 255.0).round() as u8,
            a: 255,
        }
    }
}

impl From<Vec3> for Color {
    fn from(vector: Vec3) -> Self {
        Self {
            r: vector.x,
            g: vector.y,
            b: vector.z,
        }
    }
}

impl From<Color> for Vec3 {
    fn from(color: Color) -> Self {
        Vec3::new(color.r, color.g, color.b)
    }
}

impl Rgba8 {
    pub const fn to_bits(self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }

    pub const fn from_bits(bits: u32) -> Self {
        let [r, g, b, a] = bits.to_le_bytes();
        Self { r, g, b, a }
    }
}

/// The palette entries the default material and demo scene use (PICO-8
/// values, converted to linear floats).
pub mod palette {
    use super::Color;

    /// Alpha lives in [`super::Rgba8`], not here, so clear and black share
    /// one RGB value.
    pub const CLEAR: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 77.0 / 255.0);
    pub const GRAY: Color = Color::rgb(194.0 / 255.0, 195.0 / 255.0, 199.0 / 255.0);
    pub const DARK_GRAY: Color = Color::rgb(95.0 / 255.0, 87.0 / 255.0, 79.0 / 255.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_conversion_rounds() {
        let rgba = Color::rgb(0.5, 0.0, 1.0).to_rgba8();
        assert_eq!(rgba, Rgba8 { r: 128, g: 0, b: 255, a: 255 });
    }

    #[test]
    fn test_byte_conversion_clamps() {
        let rgba = Color::rgb(2.0, -1.0, 0.25).to_rgba8();
        assert_eq!(rgba.r, 255);
        assert_eq!(rgba.g, 0);
        assert_eq!(rgba.b, 64);
    }

    #[test]
    fn test_equality_is_exact() {
        assert_eq!(Color::rgb(0.1, 0.2, 0.3), Color::rgb(0.1, 0.2, 0.3));
        assert_ne!(Color::rgb(0.1, 0.2, 0.3), Color::rgb(0.1, 0.2, 0.3 + 1e-7));
    }

    #[test]
    fn test_bits_round_trip() {
        let rgba = Rgba8 { r: 1, g: 2, b: 3, a: 4 };
        assert_eq!(Rgba8::from_bits(rgba.to_bits()), rgba);
    }

    #[test]
    fn test_vec3_round_trip() {
        let color = Color::rgb(0.25, 0.5, 0.75);
        assert_eq!(Color::from(Vec3::from(color)), color);
    }
}
