// SPDX-License-Identifier: Apache-2.0
//! Collider shapes.
//!
//! Shapes are a tagged union so every dispatch in the engine is an
//! exhaustive `match`; there is no runtime type check that can miss a
//! variant.

use torq_math::{Fx, Vec2};

use crate::error::BodyError;

/// Shape of a collider, in the body's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// Circle centered on the body origin.
    Circle {
        /// Radius, strictly positive.
        radius: Fx,
    },
    /// Axis-aligned rectangle centered on the body origin (world orientation
    /// follows the body's angle).
    Rect {
        /// Full width, strictly positive.
        width: Fx,
        /// Full height, strictly positive.
        height: Fx,
    },
}

impl Shape {
    /// Validated circle constructor.
    pub fn circle(radius: Fx) -> Result<Self, BodyError> {
        if radius <= Fx::ZERO {
            return Err(BodyError::DegenerateShape(radius));
        }
        Ok(Self::Circle { radius })
    }

    /// Validated rectangle constructor.
    pub fn rect(width: Fx, height: Fx) -> Result<Self, BodyError> {
        if width <= Fx::ZERO {
            return Err(BodyError::DegenerateShape(width));
        }
        if height <= Fx::ZERO {
            return Err(BodyError::DegenerateShape(height));
        }
        Ok(Self::Rect { width, height })
    }

    /// Area of the shape.
    #[must_use]
    pub fn area(&self) -> Fx {
        match *self {
            Self::Circle { radius } => Fx::PI * radius * radius,
            Self::Rect { width, height } => width * height,
        }
    }

    /// Largest world-space AABB span the shape can present under any
    /// orientation: the diameter for circles, the diagonal for rectangles.
    /// The broad-phase grid sizes its query neighborhood from this.
    #[must_use]
    pub fn bounding_extent(&self) -> Fx {
        match *self {
            Self::Circle { radius } => radius * Fx::TWO,
            Self::Rect { width, height } => (width * width + height * height).sqrt(),
        }
    }

    /// Local-frame corners of a rectangle in counter-clockwise winding,
    /// starting bottom-left. Circles have no vertices.
    #[must_use]
    pub fn local_vertices(&self) -> Option<[Vec2; 4]> {
        match *self {
            Self::Circle { .. } => None,
            Self::Rect { width, height } => {
                let hw = width * Fx::HALF;
                let hh = height * Fx::HALF;
                Some([
                    Vec2::new(-hw, -hh),
                    Vec2::new(hw, -hh),
                    Vec2::new(hw, hh),
                    Vec2::new(-hw, hh),
                ])
            }
        }
    }
}
