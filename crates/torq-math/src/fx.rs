// SPDX-License-Identifier: Apache-2.0
//! Deterministic Q32.32 fixed-point scalar.
//!
//! The representation is an `i64` storing an integer scaled by `2^32`:
//! `real_value = raw / 2^32`.
//!
//! # Determinism contract
//!
//! - All arithmetic is performed in integer space with saturating overflow.
//! - Multiplication and division round to nearest, ties to even.
//! - `sin_cos` and `sqrt` are evaluated with integer algorithms only; no
//!   platform transcendentals are ever called.
//! - `f32` conversions are boundary-only helpers with a fixed rounding policy.

use core::fmt;
use core::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

/// Number of fractional bits in the Q32.32 encoding.
const FRAC_BITS: u32 = 32;

/// Raw value of `1.0`.
const ONE_RAW: i64 = 1_i64 << FRAC_BITS;

/// Raw value of `pi`, rounded to nearest at the Q32.32 boundary.
const PI_RAW: i64 = 13_493_037_705;

/// Raw value of `tau` (`2*pi`).
const TAU_RAW: i64 = 26_986_075_409;

/// Raw value of `pi/2`.
const FRAC_PI_2_RAW: i64 = 6_746_518_852;

/// Q32.32 fixed-point scalar.
///
/// Ordering and equality compare raw storage, so `Fx` is a total order with
/// no NaN-style hazards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fx(i64);

impl Fx {
    /// The additive identity.
    pub const ZERO: Self = Self(0);
    /// The multiplicative identity.
    pub const ONE: Self = Self(ONE_RAW);
    /// Two.
    pub const TWO: Self = Self(ONE_RAW << 1);
    /// One half.
    pub const HALF: Self = Self(ONE_RAW >> 1);
    /// Archimedes' constant.
    pub const PI: Self = Self(PI_RAW);
    /// The full circle constant (`2*pi`).
    pub const TAU: Self = Self(TAU_RAW);
    /// `pi/2`.
    pub const FRAC_PI_2: Self = Self(FRAC_PI_2_RAW);
    /// Largest representable value.
    pub const MAX: Self = Self(i64::MAX);
    /// Smallest representable value.
    pub const MIN: Self = Self(i64::MIN);

    /// Constructs from a raw Q32.32 integer. Exact; no scaling or rounding.
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw Q32.32 storage value.
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Constructs from an integer, saturating at the Q32.32 range.
    #[must_use]
    pub const fn from_int(n: i64) -> Self {
        Self(n.saturating_mul(ONE_RAW))
    }

    /// Constructs the exact rational `num/den`, rounded to nearest at the
    /// Q32.32 boundary.
    ///
    /// The preferred way to write non-integer literals in simulation code
    /// (`Fx::from_ratio(-981, 100)` for `-9.81`), keeping floats out of the
    /// deterministic core.
    #[must_use]
    pub fn from_ratio(num: i64, den: i64) -> Self {
        Self(div_raw(
            num.saturating_mul(ONE_RAW),
            den.saturating_mul(ONE_RAW),
        ))
    }

    /// Returns `true` if the value is exactly zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the value is strictly negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Absolute value, saturating at `Fx::MAX` for `Fx::MIN`.
    #[must_use]
    pub const fn abs(self) -> Self {
        if self.0 == i64::MIN {
            Self(i64::MAX)
        } else {
            Self(self.0.abs())
        }
    }

    /// Returns `-1`, `0`, or `1` according to the sign of the value.
    #[must_use]
    pub const fn signum(self) -> Self {
        Self(self.0.signum() * ONE_RAW)
    }

    /// Smaller of two values.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    /// Larger of two values.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        if self.0 >= other.0 {
            self
        } else {
            other
        }
    }

    /// Clamps into `[lo, hi]`. If `lo > hi` the result is `lo` (total, never
    /// panics).
    #[must_use]
    pub fn clamp(self, lo: Self, hi: Self) -> Self {
        self.max(lo).min(hi)
    }

    /// Largest integer less than or equal to the value, as an `i64`.
    ///
    /// Exact for the entire Q32.32 range: an arithmetic shift of the raw
    /// storage floors toward negative infinity.
    #[must_use]
    pub const fn floor_to_i64(self) -> i64 {
        self.0 >> FRAC_BITS
    }

    /// Square root, rounded down at the Q32.32 boundary.
    ///
    /// Negative inputs return zero; the function is total by policy, matching
    /// the rest of the deterministic core.
    #[must_use]
    pub fn sqrt(self) -> Self {
        if self.0 <= 0 {
            return Self::ZERO;
        }
        // sqrt(raw / 2^32) * 2^32 == isqrt(raw << 32) exactly.
        let widened = u128::from(self.0.unsigned_abs()) << FRAC_BITS;
        let root = isqrt_u128(widened);
        Self(i64::try_from(root).unwrap_or(i64::MAX))
    }

    /// Deterministic sine and cosine of `self` in radians.
    ///
    /// Range-reduces to a quadrant of `[0, tau)` on raw storage (exact), then
    /// evaluates a fixed-point polynomial on the quarter wave. `sin(-x)` is
    /// the exact negation of `sin(x)` and `cos(-x)` equals `cos(x)`, bit for
    /// bit.
    #[must_use]
    pub fn sin_cos(self) -> (Self, Self) {
        // Reduce |angle| so negative inputs share the positive path exactly.
        let sign_sin = self.0 < 0;
        let r = (self.0.unsigned_abs() % (TAU_RAW as u64)) as i64;

        // Quadrant split by comparison; avoids any rounding hazard at the
        // upper edge of a division-based split.
        let (quadrant, a) = if r < FRAC_PI_2_RAW {
            (0_u8, r)
        } else if r < PI_RAW {
            (1_u8, r - FRAC_PI_2_RAW)
        } else if r < PI_RAW + FRAC_PI_2_RAW {
            (2_u8, r - PI_RAW)
        } else {
            (3_u8, r - (PI_RAW + FRAC_PI_2_RAW))
        };

        let s = sin_quarter(Self(a));
        let c = sin_quarter(Self(FRAC_PI_2_RAW - a));

        let (mut s, c) = match quadrant {
            0 => (s, c),
            1 => (c, -s),
            2 => (-s, -c),
            // quadrant 3
            _ => (-c, s),
        };

        if sign_sin {
            s = -s;
        }
        (s, c)
    }

    /// Deterministic sine of `self` in radians.
    #[must_use]
    pub fn sin(self) -> Self {
        self.sin_cos().0
    }

    /// Deterministic cosine of `self` in radians.
    #[must_use]
    pub fn cos(self) -> Self {
        self.sin_cos().1
    }

    /// Converts from `f32` at the deterministic boundary.
    ///
    /// Policy: `NaN` maps to zero, infinities saturate, finite values round
    /// to nearest (ties away from zero) at the Q32.32 boundary. The scaling
    /// multiply is a power of two and therefore exact in `f64`.
    #[must_use]
    pub fn from_f32(value: f32) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        if value.is_infinite() {
            return if value.is_sign_positive() {
                Self::MAX
            } else {
                Self::MIN
            };
        }
        let scaled = f64::from(value) * (ONE_RAW as f64);
        // `as` saturates at the i64 range.
        Self(scaled.round() as i64)
    }

    /// Converts to `f32` for interop and diagnostics.
    ///
    /// Goes through `f64` (exact for every raw value) and lets the final
    /// narrowing round to nearest even, which is platform-stable.
    #[must_use]
    pub fn to_f32(self) -> f32 {
        ((self.0 as f64) / (ONE_RAW as f64)) as f32
    }
}

/// Integer square root of a `u128`, rounded down.
fn isqrt_u128(n: u128) -> u128 {
    if n == 0 {
        return 0;
    }
    // Newton's method from a power-of-two overestimate; monotonically
    // decreasing, so the first non-improving step is the floor root.
    let shift = (128 - n.leading_zeros()).div_ceil(2);
    let mut x = 1_u128 << shift;
    loop {
        let y = (x + n / x) >> 1;
        if y >= x {
            return x;
        }
        x = y;
    }
}

/// Quarter-wave sine for `a` in `[0, pi/2]`, via a nested odd polynomial.
///
/// `sin x = x(1 - s/6(1 - s/20(1 - s/42(1 - s/72(1 - s/110)))))` with
/// `s = x^2`, accurate to well below one Q32.32 ulp-per-term of drift across
/// the quarter wave. The endpoints are pinned: `sin 0 == 0` and
/// `sin(pi/2) == 1` bit-exactly, so the identity rotation is the identity
/// and quadrant folds land on exact `0`/`+-1` at the axes.
fn sin_quarter(a: Fx) -> Fx {
    if a.0 <= 0 {
        return Fx::ZERO;
    }
    if a.0 >= FRAC_PI_2_RAW {
        return Fx::ONE;
    }
    let s = a * a;
    let mut p = Fx::ONE - s / Fx::from_int(110);
    p = Fx::ONE - (s * p) / Fx::from_int(72);
    p = Fx::ONE - (s * p) / Fx::from_int(42);
    p = Fx::ONE - (s * p) / Fx::from_int(20);
    p = Fx::ONE - (s * p) / Fx::from_int(6);
    // Clamp the tiny polynomial overshoot so the quarter wave stays in [0, 1].
    (a * p).clamp(Fx::ZERO, Fx::ONE)
}

fn saturate_i128(value: i128) -> i64 {
    i64::try_from(value).unwrap_or_else(|_| {
        if value.is_negative() {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}

/// Multiplies two raw Q32.32 values, rounding to nearest, ties to even.
fn mul_raw(a: i64, b: i64) -> i64 {
    let prod = i128::from(a) * i128::from(b);
    let abs: u128 = prod.unsigned_abs();
    let q = abs >> FRAC_BITS;
    let r = abs & ((1_u128 << FRAC_BITS) - 1);
    let half = 1_u128 << (FRAC_BITS - 1);

    let mut rounded = q;
    if r > half || (r == half && (q & 1) == 1) {
        rounded = rounded.saturating_add(1);
    }

    let rounded_i128 = i128::try_from(rounded).unwrap_or(i128::MAX);
    let signed = if prod.is_negative() {
        -rounded_i128
    } else {
        rounded_i128
    };
    saturate_i128(signed)
}

/// Divides two raw Q32.32 values, rounding to nearest, ties to even.
///
/// Division by zero follows the deterministic policy `0/0 -> 0` and
/// `x/0 -> saturated` with the sign of `x`.
fn div_raw(a: i64, b: i64) -> i64 {
    if b == 0 {
        if a == 0 {
            return 0;
        }
        return if a.is_negative() { i64::MIN } else { i64::MAX };
    }

    let num = i128::from(a) << FRAC_BITS;
    let den = i128::from(b);

    let abs_num: u128 = num.unsigned_abs();
    let abs_den: u128 = den.unsigned_abs();

    let q = abs_num / abs_den;
    let r = abs_num % abs_den;

    let mut rounded = q;
    let twice_r = r.saturating_mul(2);
    if twice_r > abs_den || (twice_r == abs_den && (q & 1) == 1) {
        rounded = rounded.saturating_add(1);
    }

    let rounded_i128 = i128::try_from(rounded).unwrap_or(i128::MAX);
    let signed = if (a < 0) ^ (b < 0) {
        -rounded_i128
    } else {
        rounded_i128
    };
    saturate_i128(signed)
}

impl Add for Fx {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Fx {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Mul for Fx {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(mul_raw(self.0, rhs.0))
    }
}

impl Div for Fx {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self(div_raw(self.0, rhs.0))
    }
}

impl Neg for Fx {
    type Output = Self;

    fn neg(self) -> Self {
        if self.0 == i64::MIN {
            Self(i64::MAX)
        } else {
            Self(-self.0)
        }
    }
}

impl AddAssign for Fx {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fx {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fx {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl fmt::Display for Fx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(v: f32) -> Fx {
        Fx::from_f32(v)
    }

    #[test]
    fn integer_round_trip_is_exact() {
        for n in [-5_i64, -1, 0, 1, 2, 1000] {
            assert_eq!(Fx::from_int(n).raw(), n << 32);
        }
    }

    #[test]
    fn ratio_matches_division() {
        assert_eq!(Fx::from_ratio(1, 2), Fx::HALF);
        assert_eq!(Fx::from_ratio(-981, 100), Fx::from_int(-981) / Fx::from_int(100));
    }

    #[test]
    fn mul_rounds_ties_to_even() {
        // 0.5 * 0.5 = 0.25, exact.
        assert_eq!(Fx::HALF * Fx::HALF, Fx::from_ratio(1, 4));
    }

    #[test]
    fn div_by_zero_is_total() {
        assert_eq!(Fx::ZERO / Fx::ZERO, Fx::ZERO);
        assert_eq!(Fx::ONE / Fx::ZERO, Fx::MAX);
        assert_eq!(-Fx::ONE / Fx::ZERO, Fx::MIN);
    }

    #[test]
    fn sqrt_of_perfect_squares() {
        assert_eq!(Fx::from_int(4).sqrt(), Fx::TWO);
        assert_eq!(Fx::from_int(9).sqrt(), Fx::from_int(3));
        assert_eq!(Fx::ZERO.sqrt(), Fx::ZERO);
        assert_eq!(Fx::from_int(-1).sqrt(), Fx::ZERO);
    }

    #[test]
    fn sqrt_matches_float_closely() {
        for v in [0.25_f32, 0.5, 2.0, 10.0, 123.456, 10000.0] {
            let got = fx(v).sqrt().to_f32();
            assert!((got - v.sqrt()).abs() < 1e-4, "sqrt({v}) = {got}");
        }
    }

    #[test]
    fn sin_cos_matches_float_closely() {
        for i in -64_i32..=64 {
            let angle = (i as f32) * 0.1;
            let (s, c) = fx(angle).sin_cos();
            assert!((s.to_f32() - angle.sin()).abs() < 1e-5, "sin({angle})");
            assert!((c.to_f32() - angle.cos()).abs() < 1e-5, "cos({angle})");
        }
    }

    #[test]
    fn sin_is_odd_cos_is_even_bitwise() {
        for i in 1_i32..=50 {
            let angle = fx((i as f32) * 0.13);
            let (sp, cp) = angle.sin_cos();
            let (sn, cn) = (-angle).sin_cos();
            assert_eq!(sn.raw(), (-sp).raw());
            assert_eq!(cn.raw(), cp.raw());
        }
    }

    #[test]
    fn quarter_wave_endpoints_are_exact() {
        assert_eq!(Fx::ZERO.sin(), Fx::ZERO);
        assert_eq!(Fx::FRAC_PI_2.sin(), Fx::ONE);
    }

    #[test]
    fn axis_angles_are_exact() {
        assert_eq!(Fx::ZERO.sin_cos(), (Fx::ZERO, Fx::ONE));
        assert_eq!(Fx::FRAC_PI_2.sin_cos(), (Fx::ONE, Fx::ZERO));
        assert_eq!(Fx::PI.sin_cos(), (Fx::ZERO, -Fx::ONE));
        assert_eq!((-Fx::FRAC_PI_2).sin_cos(), (-Fx::ONE, Fx::ZERO));
    }

    #[test]
    fn boundary_conversions_follow_policy() {
        assert_eq!(Fx::from_f32(f32::NAN), Fx::ZERO);
        assert_eq!(Fx::from_f32(f32::INFINITY), Fx::MAX);
        assert_eq!(Fx::from_f32(f32::NEG_INFINITY), Fx::MIN);
        assert_eq!(Fx::from_f32(1.5), Fx::ONE + Fx::HALF);
    }
}
