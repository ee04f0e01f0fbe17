// SPDX-License-Identifier: Apache-2.0
//! 2D vector over the Q32.32 scalar.

use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use crate::fx::Fx;

/// 2D vector with fixed-point components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    /// X component.
    pub x: Fx,
    /// Y component.
    pub y: Fx,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self {
        x: Fx::ZERO,
        y: Fx::ZERO,
    };
    /// Unit X vector.
    pub const UNIT_X: Self = Self {
        x: Fx::ONE,
        y: Fx::ZERO,
    };
    /// Unit Y vector.
    pub const UNIT_Y: Self = Self {
        x: Fx::ZERO,
        y: Fx::ONE,
    };

    /// Constructs a vector from components.
    #[must_use]
    pub const fn new(x: Fx, y: Fx) -> Self {
        Self { x, y }
    }

    /// Constructs a vector from integer components.
    #[must_use]
    pub const fn from_int(x: i64, y: i64) -> Self {
        Self {
            x: Fx::from_int(x),
            y: Fx::from_int(y),
        }
    }

    /// Dot product.
    #[must_use]
    pub fn dot(self, rhs: Self) -> Fx {
        self.x * rhs.x + self.y * rhs.y
    }

    /// 2D cross product: the z-component of the 3D cross of both vectors
    /// embedded in the XY plane (`x1*y2 - y1*x2`).
    #[must_use]
    pub fn cross(self, rhs: Self) -> Fx {
        self.x * rhs.y - self.y * rhs.x
    }

    /// Squared length; avoids the square root.
    #[must_use]
    pub fn length_squared(self) -> Fx {
        self.dot(self)
    }

    /// Length (magnitude).
    #[must_use]
    pub fn length(self) -> Fx {
        self.length_squared().sqrt()
    }

    /// Squared distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> Fx {
        (other - self).length_squared()
    }

    /// Distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> Fx {
        (other - self).length()
    }

    /// Unit-length copy; the zero vector normalizes to zero.
    #[must_use]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len.is_zero() {
            Self::ZERO
        } else {
            self / len
        }
    }

    /// Perpendicular vector, 90 degrees counter-clockwise: `(-y, x)`.
    #[must_use]
    pub fn perp(self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    /// Rotates by `angle` radians counter-clockwise about the origin.
    #[must_use]
    pub fn rotate(self, angle: Fx) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Returns `true` if both components are exactly zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<Fx> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: Fx) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<Fx> for Vec2 {
    type Output = Self;

    fn div(self, rhs: Fx) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_and_cross() {
        let a = Vec2::from_int(1, 2);
        let b = Vec2::from_int(3, 4);
        assert_eq!(a.dot(b), Fx::from_int(11));
        assert_eq!(a.cross(b), Fx::from_int(-2));
    }

    #[test]
    fn perp_is_ccw_quarter_turn() {
        let v = Vec2::from_int(3, 1);
        let p = v.perp();
        assert_eq!(p, Vec2::from_int(-1, 3));
        assert_eq!(v.dot(p), Fx::ZERO);
        assert!(v.cross(p) > Fx::ZERO);
    }

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
    }

    #[test]
    fn normalize_has_unit_length() {
        let v = Vec2::from_int(3, 4).normalize();
        let len = v.length().to_f32();
        assert!((len - 1.0).abs() < 1e-6, "length {len}");
    }

    #[test]
    fn rotate_half_pi_maps_x_to_y() {
        let v = Vec2::UNIT_X.rotate(Fx::FRAC_PI_2);
        assert!((v.x.to_f32()).abs() < 1e-5);
        assert!((v.y.to_f32() - 1.0).abs() < 1e-5);
    }
}
