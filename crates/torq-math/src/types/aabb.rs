// SPDX-License-Identifier: Apache-2.0
//! 2D axis-aligned bounding box.

use crate::fx::Fx;
use crate::types::vec2::Vec2;

/// Axis-aligned bounding box in world coordinates.
///
/// Invariant: `min` components are less than or equal to `max` components.
/// Constructors normalize swapped corners instead of panicking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    min: Vec2,
    max: Vec2,
}

impl Aabb {
    /// Constructs an AABB from two corners, normalizing per component so the
    /// invariant holds for any input.
    #[must_use]
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Builds an AABB centered at `center` with half-extents `hx, hy`.
    #[must_use]
    pub fn from_center_half_extents(center: Vec2, hx: Fx, hy: Fx) -> Self {
        let he = Vec2::new(hx.abs(), hy.abs());
        Self {
            min: center - he,
            max: center + he,
        }
    }

    /// Returns the minimum corner.
    #[must_use]
    pub const fn min(&self) -> Vec2 {
        self.min
    }

    /// Returns the maximum corner.
    #[must_use]
    pub const fn max(&self) -> Vec2 {
        self.max
    }

    /// Returns `true` if this AABB overlaps another with **strict**
    /// inequality: boxes that merely share an edge or corner do not overlap.
    ///
    /// Broad-phase pairing relies on this exact semantic; a pair whose boxes
    /// only touch is never handed to the narrow phase.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.max.x <= other.min.x
            || other.max.x <= self.min.x
            || self.max.y <= other.min.y
            || other.max.y <= self.min.y)
    }

    /// Returns the union of two AABBs.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: Vec2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Vec2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}
