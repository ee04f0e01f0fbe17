// SPDX-License-Identifier: Apache-2.0
//! Foundational geometric types over the fixed-point scalar.

/// 2D axis-aligned bounding box.
pub mod aabb;
/// 2D vector.
pub mod vec2;
