// SPDX-License-Identifier: Apache-2.0
//! Narrow-phase collision tests and contact-point generation.
//!
//! All tests run on the separating axis theorem over the bodies' world-space
//! data. The collision normal always points from the first body towards the
//! second; callers rely on that orientation when applying impulses.

use torq_math::{Fx, Vec2};

use crate::body::Body;
use crate::collider::Shape;

/// Result of a narrow-phase test: unit normal from the first body to the
/// second, and penetration depth along it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    /// Unit collision normal, first body towards second.
    pub normal: Vec2,
    /// Penetration depth along the normal.
    pub depth: Fx,
}

/// Tests two bodies for intersection, dispatching on the shape pair.
///
/// Takes bodies mutably because world-space vertices and bounds are memoized
/// on the body.
pub fn collide(a: &mut Body, b: &mut Body) -> Option<Contact> {
    match (a.shape(), b.shape()) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_circle(a.position(), ra, b.position(), rb)
        }
        (Shape::Circle { radius }, Shape::Rect { .. }) => {
            circle_polygon(a.position(), radius, b)
        }
        (Shape::Rect { .. }, Shape::Circle { radius }) => {
            circle_polygon(b.position(), radius, a).map(|c| Contact {
                normal: -c.normal,
                depth: c.depth,
            })
        }
        (Shape::Rect { .. }, Shape::Rect { .. }) => polygon_polygon(a, b),
    }
}

fn circle_circle(ca: Vec2, ra: Fx, cb: Vec2, rb: Fx) -> Option<Contact> {
    let distance = ca.distance(cb);
    let radii = ra + rb;
    if distance >= radii {
        return None;
    }
    Some(Contact {
        normal: (cb - ca).normalize(),
        depth: radii - distance,
    })
}

fn project_vertices(vertices: &[Vec2; 4], axis: Vec2) -> (Fx, Fx) {
    let mut min = vertices[0].dot(axis);
    let mut max = min;
    for v in &vertices[1..] {
        let p = v.dot(axis);
        min = min.min(p);
        max = max.max(p);
    }
    (min, max)
}

fn project_circle(center: Vec2, radius: Fx, axis: Vec2) -> (Fx, Fx) {
    let c = center.dot(axis);
    (c - radius, c + radius)
}

/// Updates the running minimum-depth axis; returns `false` on separation.
fn accumulate_axis(
    axis: Vec2,
    span_a: (Fx, Fx),
    span_b: (Fx, Fx),
    best: &mut Contact,
) -> bool {
    let (min_a, max_a) = span_a;
    let (min_b, max_b) = span_b;
    if min_a >= max_b || min_b >= max_a {
        return false;
    }
    let axis_depth = (max_b - min_a).min(max_a - min_b);
    if axis_depth < best.depth {
        best.depth = axis_depth;
        best.normal = axis;
    }
    true
}

fn orient_from_a_to_b(center_a: Vec2, center_b: Vec2, mut contact: Contact) -> Contact {
    if (center_b - center_a).dot(contact.normal) < Fx::ZERO {
        contact.normal = -contact.normal;
    }
    contact
}

fn polygon_polygon(a: &mut Body, b: &mut Body) -> Option<Contact> {
    let center_a = a.position();
    let center_b = b.position();
    let va = a.world_vertices()?;
    let vb = b.world_vertices()?;

    let mut best = Contact {
        normal: Vec2::ZERO,
        depth: Fx::MAX,
    };
    for vertices in [&va, &vb] {
        for i in 0..4 {
            let edge = vertices[(i + 1) % 4] - vertices[i];
            let axis = edge.perp().normalize();
            if !accumulate_axis(
                axis,
                project_vertices(&va, axis),
                project_vertices(&vb, axis),
                &mut best,
            ) {
                return None;
            }
        }
    }
    Some(orient_from_a_to_b(center_a, center_b, best))
}

/// Circle against a polygon body; the returned normal points from the circle
/// towards the polygon.
fn circle_polygon(center: Vec2, radius: Fx, poly: &mut Body) -> Option<Contact> {
    let poly_center = poly.position();
    let vertices = poly.world_vertices()?;

    let mut best = Contact {
        normal: Vec2::ZERO,
        depth: Fx::MAX,
    };
    for i in 0..4 {
        let edge = vertices[(i + 1) % 4] - vertices[i];
        let axis = edge.perp().normalize();
        if !accumulate_axis(
            axis,
            project_circle(center, radius, axis),
            project_vertices(&vertices, axis),
            &mut best,
        ) {
            return None;
        }
    }

    // Edge normals alone miss vertex-region contacts; add the axis through
    // the nearest vertex. This is an approximation for shallow corner hits
    // but is stable and deterministic.
    let mut nearest = vertices[0];
    let mut nearest_d2 = center.distance_squared(vertices[0]);
    for v in &vertices[1..] {
        let d2 = center.distance_squared(*v);
        if d2 < nearest_d2 {
            nearest_d2 = d2;
            nearest = *v;
        }
    }
    let axis = (nearest - center).normalize();
    if !accumulate_axis(
        axis,
        project_circle(center, radius, axis),
        project_vertices(&vertices, axis),
        &mut best,
    ) {
        return None;
    }

    Some(orient_from_a_to_b(center, poly_center, best))
}

/// Closest point on segment `[a, b]` to `p`, with the squared distance.
/// A degenerate segment collapses to its start point.
fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> (Vec2, Fx) {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq.is_zero() {
        return (a, p.distance_squared(a));
    }
    let t = (p - a).dot(ab) / len_sq;
    let t = t.clamp(Fx::ZERO, Fx::ONE);
    let closest = a + ab * t;
    (closest, p.distance_squared(closest))
}

/// Computes up to two world-space contact points for an intersecting pair.
///
/// Returns `(contact1, contact2, count)`. `count` is `0` only for shape
/// pairs that could not produce a point (never happens for intersecting
/// bodies).
pub fn find_contact_points(a: &mut Body, b: &mut Body) -> (Vec2, Vec2, u8) {
    match (a.shape(), b.shape()) {
        (Shape::Circle { radius: ra }, Shape::Circle { .. }) => {
            let cp = a.position() + (b.position() - a.position()).normalize() * ra;
            (cp, Vec2::ZERO, 1)
        }
        (Shape::Circle { .. }, Shape::Rect { .. }) => circle_polygon_contact(a.position(), b),
        (Shape::Rect { .. }, Shape::Circle { .. }) => circle_polygon_contact(b.position(), a),
        (Shape::Rect { .. }, Shape::Rect { .. }) => polygon_polygon_contacts(a, b),
    }
}

fn circle_polygon_contact(center: Vec2, poly: &mut Body) -> (Vec2, Vec2, u8) {
    let Some(vertices) = poly.world_vertices() else {
        return (Vec2::ZERO, Vec2::ZERO, 0);
    };
    let mut best = Vec2::ZERO;
    let mut best_d2 = Fx::MAX;
    for i in 0..4 {
        let (cp, d2) = point_segment_distance(center, vertices[i], vertices[(i + 1) % 4]);
        if d2 < best_d2 {
            best_d2 = d2;
            best = cp;
        }
    }
    (best, Vec2::ZERO, 1)
}

fn polygon_polygon_contacts(a: &mut Body, b: &mut Body) -> (Vec2, Vec2, u8) {
    let Some(va) = a.world_vertices() else {
        return (Vec2::ZERO, Vec2::ZERO, 0);
    };
    let Some(vb) = b.world_vertices() else {
        return (Vec2::ZERO, Vec2::ZERO, 0);
    };

    let mut contact1 = Vec2::ZERO;
    let mut contact2 = Vec2::ZERO;
    let mut count: u8 = 0;
    let mut min_d2 = Fx::MAX;

    // Exact equality on the distance tie: parallel face contacts land on it
    // reliably in fixed point, and it never merges two distinct points.
    let mut consider = |cp: Vec2, d2: Fx| {
        if d2 == min_d2 {
            if cp != contact1 {
                contact2 = cp;
                count = 2;
            }
        } else if d2 < min_d2 {
            min_d2 = d2;
            contact1 = cp;
            count = 1;
        }
    };

    for p in &va {
        for i in 0..4 {
            let (cp, d2) = point_segment_distance(*p, vb[i], vb[(i + 1) % 4]);
            consider(cp, d2);
        }
    }
    for p in &vb {
        for i in 0..4 {
            let (cp, d2) = point_segment_distance(*p, va[i], va[(i + 1) % 4]);
            consider(cp, d2);
        }
    }
    (contact1, contact2, count)
}
