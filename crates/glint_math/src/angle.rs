//! Angle type keeping radians and degrees from mixing at call sites.

use std::f32::consts::PI;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// An angle stored in radians.
///
/// Conversions happen only at the [`deg`]/[`rad`] constructors; everything
/// downstream works with the raw radian value.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
pub struct Angle {
    radians: f32,
}

impl Angle {
    pub const ZERO: Angle = Angle { radians: 0.0 };

    pub const fn from_radians(radians: f32) -> Self {
        Self { radians }
    }

    pub fn from_degrees(degrees: f32) -> Self {
        Self {
            radians: degrees * PI / 180.0,
        }
    }

    pub const fn radians(self) -> f32 {
        self.radians
    }

    pub fn degrees(self) -> f32 {
        self.radians * 180.0 / PI
    }

    pub fn sin(self) -> f32 {
        self.radians.sin()
    }

    pub fn cos(self) -> f32 {
        self.radians.cos()
    }

    pub fn tan(self) -> f32 {
        self.radians.tan()
    }
}

/// Shorthand constructor for an angle given in degrees.
pub fn deg(degrees: f32) -> Angle {
    Angle::from_degrees(degrees)
}

/// Shorthand constructor for an angle given in radians.
pub fn rad(radians: f32) -> Angle {
    Angle::from_radians(radians)
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, other: Angle) -> Angle {
        Angle::from_radians(self.radians + other.radians)
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, other: Angle) -> Angle {
        Angle::from_radians(self.radians - other.radians)
    }
}

impl Mul<f32> for Angle {
    type Output = Angle;

    fn mul(self, scale: f32) -> Angle {
        Angle::from_radians(self.radians * scale)
    }
}

impl Neg for Angle {
    type Output = Angle;

    fn neg(self) -> Angle {
        Angle::from_radians(-self.radians)
    }
}

impl AddAssign for Angle {
    fn add_assign(&mut self, other: Angle) {
        self.radians += other.radians;
    }
}

impl SubAssign for Angle {
    fn sub_assign(&mut self, other: Angle) {
        self.radians -= other.radians;
    }
}
