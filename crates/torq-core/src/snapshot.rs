// SPDX-License-Identifier: Apache-2.0
//! Deterministic state digests.
//!
//! Two worlds that evolved from identical initial state through identical
//! steps must hash to the same digest. Bodies are folded in ascending id
//! order over raw fixed-point bits, so neither insertion order nor any
//! floating-point conversion can perturb the result.

use std::fmt;

use torq_math::{Fx, Vec2};

use crate::world::World;

/// 256-bit digest of a world's dynamic state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateDigest([u8; 32]);

impl StateDigest {
    /// Raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for StateDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

fn fold_fx(hasher: &mut blake3::Hasher, v: Fx) {
    hasher.update(&v.raw().to_le_bytes());
}

fn fold_vec2(hasher: &mut blake3::Hasher, v: Vec2) {
    fold_fx(hasher, v.x);
    fold_fx(hasher, v.y);
}

impl World {
    /// Hashes the dynamic state of every body, in ascending id order.
    #[must_use]
    pub fn state_digest(&self) -> StateDigest {
        let mut hasher = blake3::Hasher::new();
        let bodies = self.bodies_by_id();
        hasher.update(&(bodies.len() as u64).to_le_bytes());
        for body in bodies {
            hasher.update(&body.id().value().to_le_bytes());
            fold_vec2(&mut hasher, body.position());
            fold_fx(&mut hasher, body.angle());
            fold_vec2(&mut hasher, body.linear_velocity());
            fold_fx(&mut hasher, body.angular_velocity());
            fold_vec2(&mut hasher, body.force());
        }
        StateDigest(*hasher.finalize().as_bytes())
    }
}
