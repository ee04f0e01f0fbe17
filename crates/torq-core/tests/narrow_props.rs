// SPDX-License-Identifier: Apache-2.0
//! Property tests over the narrow phase.
#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

use proptest::prelude::*;
use torq_core::{narrow, Body};
use torq_math::{Fx, Vec2};

fn coord() -> impl Strategy<Value = Fx> {
    // Positions within +-8 world units at quarter-unit steps.
    (-32i64..=32).prop_map(|q| Fx::from_ratio(q, 4))
}

fn radius() -> impl Strategy<Value = Fx> {
    (1i64..=8).prop_map(|q| Fx::from_ratio(q, 2))
}

fn circle(x: Fx, y: Fx, r: Fx) -> Body {
    Body::circle(r, Vec2::new(x, y), Fx::ONE, false, Fx::ZERO).unwrap()
}

fn rect(x: Fx, y: Fx, w: Fx, h: Fx) -> Body {
    Body::rect(w, h, Vec2::new(x, y), Fx::ONE, false, Fx::ZERO).unwrap()
}

proptest! {
    #[test]
    fn circle_collision_is_antisymmetric(
        ax in coord(), ay in coord(), ar in radius(),
        bx in coord(), by in coord(), br in radius(),
    ) {
        let mut a = circle(ax, ay, ar);
        let mut b = circle(bx, by, br);
        let forward = narrow::collide(&mut a, &mut b);
        let backward = narrow::collide(&mut b, &mut a);
        match (forward, backward) {
            (None, None) => {}
            (Some(f), Some(r)) => {
                prop_assert_eq!(f.depth, r.depth);
                prop_assert_eq!(f.normal, -r.normal);
            }
            _ => prop_assert!(false, "one direction collided, the other did not"),
        }
    }

    #[test]
    fn reported_depth_is_positive_with_unit_normal(
        ax in coord(), ay in coord(), ar in radius(),
        bx in coord(), by in coord(),
        bw in radius(), bh in radius(),
    ) {
        let mut a = circle(ax, ay, ar);
        let mut b = rect(bx, by, bw, bh);
        if let Some(c) = narrow::collide(&mut a, &mut b) {
            prop_assert!(c.depth > Fx::ZERO);
            let len = c.normal.length().to_f32();
            prop_assert!((len - 1.0).abs() < 1e-3, "normal length {}", len);
        }
    }

    #[test]
    fn contact_points_sit_on_a_body_surface(
        ax in coord(), ay in coord(), aw in radius(), ah in radius(),
        bx in coord(), by in coord(), bw in radius(), bh in radius(),
    ) {
        let mut a = rect(ax, ay, aw, ah);
        let mut b = rect(bx, by, bw, bh);
        if narrow::collide(&mut a, &mut b).is_none() {
            return Ok(());
        }
        let (c1, c2, n) = narrow::find_contact_points(&mut a, &mut b);
        prop_assert!(n >= 1);
        // Each point is the closest point on one body's edge, so it must lie
        // within that body's bounds exactly.
        let inside = |p: Vec2, body: &mut Body| {
            let bounds = body.aabb();
            p.x >= bounds.min().x
                && p.x <= bounds.max().x
                && p.y >= bounds.min().y
                && p.y <= bounds.max().y
        };
        for p in [c1, c2].into_iter().take(usize::from(n)) {
            prop_assert!(inside(p, &mut a) || inside(p, &mut b));
        }
    }
}
