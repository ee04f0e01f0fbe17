// SPDX-License-Identifier: Apache-2.0
//! End-to-end solver scenarios.
#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

use torq_core::{Body, CombineRule, World, WorldDef};
use torq_math::{Fx, Vec2};

fn frame() -> Fx {
    Fx::from_ratio(1, 60)
}

fn zero_gravity() -> WorldDef {
    WorldDef {
        gravity: Vec2::ZERO,
        ..WorldDef::default()
    }
}

#[test]
fn circle_dropped_on_floor_bounces() {
    let mut w = World::new(WorldDef::default());
    let floor = w.add_body(
        Body::rect(
            Fx::from_int(10),
            Fx::from_int(2),
            Vec2::from_int(0, -1),
            Fx::ONE,
            true,
            Fx::HALF,
        )
        .unwrap(),
    );
    let ball = w.add_body(
        Body::circle(Fx::ONE, Vec2::from_int(0, 10), Fx::ONE, false, Fx::HALF).unwrap(),
    );

    // Single sub-step per frame so the reported contact list lines up with
    // the frame where the impact happens.
    let mut bounced = false;
    for _ in 0..600 {
        let v_before = w.body(ball).unwrap().linear_velocity().y;
        w.step(frame(), 1);
        if w.contacts().is_empty() {
            continue;
        }
        assert_eq!(w.contacts().len(), 1, "exactly one contact pair");
        let m = w.contacts()[0];
        assert_eq!(m.a, floor);
        assert_eq!(m.b, ball);
        assert!(m.normal.y > Fx::ZERO, "normal points from floor to ball");
        assert!(m.normal.x.abs() < Fx::from_ratio(1, 100));
        let v_after = w.body(ball).unwrap().linear_velocity().y;
        assert!(v_before < Fx::ZERO, "ball was falling at impact");
        assert!(v_after > v_before, "impulse pushed the ball upward");
        bounced = true;
        break;
    }
    assert!(bounced, "ball never reached the floor");

    // The ball never tunnels through the floor's top face.
    assert!(w.body(ball).unwrap().position().y > Fx::ZERO);
}

#[test]
fn static_bodies_never_move() {
    let mut w = World::new(WorldDef::default());
    let wall = w.add_body(
        Body::rect(
            Fx::from_int(2),
            Fx::from_int(10),
            Vec2::from_int(3, 0),
            Fx::ONE,
            true,
            Fx::ZERO,
        )
        .unwrap(),
    );
    let ball =
        w.add_body(Body::circle(Fx::ONE, Vec2::from_int(0, 0), Fx::ONE, false, Fx::HALF).unwrap());
    w.body_mut(ball)
        .unwrap()
        .set_linear_velocity(Vec2::from_int(20, 0));
    w.body_mut(ball).unwrap().set_gravity_enabled(false);

    for _ in 0..120 {
        w.step(frame(), 4);
    }
    let wall = w.body(wall).unwrap();
    assert_eq!(wall.position(), Vec2::from_int(3, 0));
    assert_eq!(wall.linear_velocity(), Vec2::ZERO);
    assert_eq!(wall.angular_velocity(), Fx::ZERO);
}

#[test]
fn elastic_head_on_collision_preserves_relative_speed() {
    let def = WorldDef {
        restitution_rule: CombineRule::Average,
        ..zero_gravity()
    };
    let mut w = World::new(def);
    let a =
        w.add_body(Body::circle(Fx::ONE, Vec2::from_int(-3, 0), Fx::ONE, false, Fx::ONE).unwrap());
    let b =
        w.add_body(Body::circle(Fx::ONE, Vec2::from_int(3, 0), Fx::ONE, false, Fx::ONE).unwrap());
    w.body_mut(a).unwrap().set_linear_velocity(Vec2::from_int(2, 0));
    w.body_mut(b)
        .unwrap()
        .set_linear_velocity(Vec2::from_int(-2, 0));

    for _ in 0..300 {
        w.step(frame(), 1);
        if !w.contacts().is_empty() {
            break;
        }
    }
    assert!(!w.contacts().is_empty(), "circles never met");

    let va = w.body(a).unwrap().linear_velocity().x;
    let vb = w.body(b).unwrap().linear_velocity().x;
    let rel = (vb - va).to_f32();
    assert!(
        (rel.abs() - 4.0).abs() < 1e-2,
        "relative speed {rel} should stay near 4"
    );
    assert!(va < Fx::ZERO, "left circle reversed");
    assert!(vb > Fx::ZERO, "right circle reversed");
}

#[test]
fn separation_resolves_initial_overlap() {
    let mut w = World::new(zero_gravity());
    let a =
        w.add_body(Body::circle(Fx::ONE, Vec2::from_int(0, 0), Fx::ONE, false, Fx::ZERO).unwrap());
    let b = w.add_body(
        Body::circle(
            Fx::ONE,
            Vec2::new(Fx::ONE + Fx::HALF, Fx::ZERO),
            Fx::ONE,
            false,
            Fx::ZERO,
        )
        .unwrap(),
    );

    w.step(frame(), 1);

    let pa = w.body(a).unwrap().position();
    let pb = w.body(b).unwrap().position();
    let gap = (pa.distance(pb) - Fx::TWO).to_f32();
    assert!(gap.abs() < 1e-4, "post-separation distance off by {gap}");
}

#[test]
fn inert_bodies_do_not_pair() {
    let mut w = World::new(zero_gravity());
    let a =
        w.add_body(Body::circle(Fx::ONE, Vec2::from_int(0, 0), Fx::ONE, false, Fx::ZERO).unwrap());
    let b =
        w.add_body(Body::circle(Fx::ONE, Vec2::from_int(1, 0), Fx::ONE, false, Fx::ZERO).unwrap());
    w.body_mut(a).unwrap().set_resolve_collision(false);

    w.step(frame(), 1);
    assert!(w.contacts().is_empty());
    assert_eq!(w.body(a).unwrap().position(), Vec2::from_int(0, 0));
    assert_eq!(w.body(b).unwrap().position(), Vec2::from_int(1, 0));
}

#[test]
fn kinematic_pairs_separate_without_impulses() {
    let mut w = World::new(zero_gravity());
    let a =
        w.add_body(Body::circle(Fx::ONE, Vec2::from_int(0, 0), Fx::ONE, false, Fx::ZERO).unwrap());
    let b =
        w.add_body(Body::circle(Fx::ONE, Vec2::from_int(1, 0), Fx::ONE, false, Fx::ZERO).unwrap());
    w.body_mut(a).unwrap().set_kinematic(true);
    w.body_mut(b).unwrap().set_kinematic(true);

    w.step(frame(), 1);
    // Positions were pushed apart but no velocity appeared.
    assert_eq!(w.body(a).unwrap().linear_velocity(), Vec2::ZERO);
    assert_eq!(w.body(b).unwrap().linear_velocity(), Vec2::ZERO);
    let gap = w
        .body(a)
        .unwrap()
        .position()
        .distance(w.body(b).unwrap().position());
    assert!(gap >= Fx::TWO - Fx::from_ratio(1, 1000));
}
