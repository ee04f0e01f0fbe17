// SPDX-License-Identifier: Apache-2.0
//! Contact manifolds produced by the narrow phase.

use torq_math::{Fx, Vec2};

use crate::body::BodyId;

/// Immutable record of one resolved contact between two bodies.
///
/// `normal` points from body `a` towards body `b` and has unit length;
/// `depth` is the penetration along that normal. `contact2` is only
/// meaningful when `contact_count == 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Manifold {
    /// First body (lower id of the canonical pair).
    pub a: BodyId,
    /// Second body (higher id of the canonical pair).
    pub b: BodyId,
    /// Collision normal, unit length, pointing from `a` to `b`.
    pub normal: Vec2,
    /// Penetration depth along the normal.
    pub depth: Fx,
    /// First contact point, in world coordinates.
    pub contact1: Vec2,
    /// Second contact point; zero unless `contact_count == 2`.
    pub contact2: Vec2,
    /// Number of valid contact points, `1` or `2`.
    pub contact_count: u8,
}
