// SPDX-License-Identifier: Apache-2.0
//! torq-math: deterministic fixed-point math for the torq physics engine.
//!
//! This crate provides:
//! - A Q32.32 fixed-point scalar (`Fx`).
//! - A 2D vector over that scalar (`Vec2`).
//! - A 2D axis-aligned bounding box (`Aabb`).
//!
//! Design notes:
//! - All arithmetic runs in integer space with saturating overflow; repeated
//!   runs with identical inputs produce bit-identical results on every
//!   supported platform.
//! - Transcendentals (`sin_cos`) never call platform libm; they are evaluated
//!   as fixed-point polynomials after exact range reduction.
//! - `f32` conversions exist only for boundary crossings and diagnostics.
#![forbid(unsafe_code)]

/// Q32.32 fixed-point scalar.
pub mod fx;
/// Geometric types over the fixed-point scalar.
pub mod types;

pub use fx::Fx;
pub use types::aabb::Aabb;
pub use types::vec2::Vec2;
