// SPDX-License-Identifier: Apache-2.0

#![allow(missing_docs)]

use proptest::prelude::*;
use torq_math::{Fx, Vec2};

#[test]
fn constants_and_raw_encoding() {
    assert_eq!(Fx::ZERO.raw(), 0);
    assert_eq!(Fx::ONE.raw(), 1_i64 << 32);
    assert_eq!(Fx::HALF.raw(), 1_i64 << 31);
    assert_eq!(Fx::TWO.raw(), 1_i64 << 33);
}

#[test]
fn basic_arithmetic_is_exact_on_dyadics() {
    let a = Fx::from_f32(1.5);
    let b = Fx::from_f32(2.0);
    assert_eq!((a + b).to_f32(), 3.5);
    assert_eq!((b - a).to_f32(), 0.5);
    assert_eq!((a * b).to_f32(), 3.0);
    assert_eq!((Fx::from_f32(3.0) / b).to_f32(), 1.5);
}

// Raw range generous enough to exercise sign/rounding paths without
// saturating products: |value| < 2^30.
fn small_fx() -> impl Strategy<Value = Fx> {
    ((-(1_i64 << 62))..(1_i64 << 62)).prop_map(Fx::from_raw)
}

fn tiny_fx() -> impl Strategy<Value = Fx> {
    ((-(1_i64 << 46))..(1_i64 << 46)).prop_map(Fx::from_raw)
}

proptest! {
    #[test]
    fn add_commutes(a in small_fx(), b in small_fx()) {
        prop_assert_eq!(a + b, b + a);
    }

    #[test]
    fn mul_commutes(a in tiny_fx(), b in tiny_fx()) {
        prop_assert_eq!(a * b, b * a);
    }

    #[test]
    fn neg_is_involutive(a in small_fx()) {
        prop_assert_eq!(-(-a), a);
    }

    #[test]
    fn sub_is_add_neg(a in small_fx(), b in small_fx()) {
        prop_assert_eq!(a - b, a + (-b));
    }

    #[test]
    fn mul_by_one_is_identity(a in small_fx()) {
        prop_assert_eq!(a * Fx::ONE, a);
    }

    #[test]
    fn sqrt_is_monotone(a in tiny_fx(), b in tiny_fx()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(lo.sqrt() <= hi.sqrt());
    }

    #[test]
    fn sqrt_squares_back(a in (0_i64..(1_i64 << 46)).prop_map(Fx::from_raw)) {
        // floor rounding: sqrt(a)^2 <= a within one rounding step.
        let r = a.sqrt();
        prop_assert!(r * r <= a + Fx::from_raw(2));
    }

    #[test]
    fn sin_cos_stay_on_unit_circle(raw in -(1_i64 << 36)..(1_i64 << 36)) {
        let (s, c) = Fx::from_raw(raw).sin_cos();
        let mag = (s * s + c * c).to_f32();
        prop_assert!((mag - 1.0).abs() < 1e-4, "s^2+c^2 = {mag}");
    }

    #[test]
    fn normalize_is_unit(
        x in ((1_i64 << 28)..(1_i64 << 46)).prop_map(Fx::from_raw),
        y in ((1_i64 << 28)..(1_i64 << 46)).prop_map(Fx::from_raw),
        flip_x in any::<bool>(),
        flip_y in any::<bool>(),
    ) {
        let v = Vec2::new(if flip_x { -x } else { x }, if flip_y { -y } else { y });
        let len = v.normalize().length().to_f32();
        prop_assert!((len - 1.0).abs() < 1e-3, "len {len}");
    }
}
