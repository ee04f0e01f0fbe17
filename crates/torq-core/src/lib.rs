// SPDX-License-Identifier: Apache-2.0
//! torq-core: deterministic fixed-point 2D rigid-body physics.
//!
//! The engine owns a flat list of rigid bodies and advances them with a
//! multi-iteration step loop: force integration, AABB broad phase (uniform
//! grid or all-pairs), SAT narrow phase, positional separation, and
//! sequential-impulse resolution with friction and restitution.
//!
//! Determinism is a first-class contract:
//! - all simulation arithmetic is Q32.32 fixed point ([`torq_math::Fx`]);
//! - bodies are iterated in insertion order; candidate pairs are enumerated
//!   in canonical `(min_id, max_id)` order;
//! - hash containers are used for membership only, never for ordered
//!   iteration;
//! - [`World::state_digest`] hashes the full body state so callers and tests
//!   can assert bit-identical trajectories in one comparison.
#![forbid(unsafe_code)]

mod body;
mod broad;
mod collider;
/// Injected diagnostics sinks (no global logger).
pub mod diag;
mod error;
mod grid;
mod manifold;
mod material;
/// Narrow-phase intersection tests and contact generation.
pub mod narrow;
mod snapshot;
mod world;

pub use body::{Body, BodyId, Pose, StepOverFn};
pub use collider::Shape;
pub use diag::{MemorySink, NullSink, SharedSink, Sink, StderrSink};
pub use error::BodyError;
pub use grid::GridConfig;
pub use manifold::Manifold;
pub use material::{Material, MAX_DENSITY, MIN_DENSITY};
pub use snapshot::StateDigest;
pub use world::{CombineRule, World, WorldDef, MAX_ITERATIONS, MIN_ITERATIONS};
