// SPDX-License-Identifier: Apache-2.0
//! Physical material properties: density, restitution, friction.

use torq_math::Fx;

use crate::error::BodyError;

/// Smallest accepted density (half the density of water).
pub const MIN_DENSITY: Fx = Fx::HALF;

/// Largest accepted density (21.4, roughly platinum).
pub const MAX_DENSITY: Fx = Fx::from_raw(91_912_300_134);

/// Material of a rigid body.
///
/// All four coefficients are validated at construction and on every setter;
/// an out-of-range value is rejected and the previous value retained. The
/// body that owns the material reports rejections through its diagnostics
/// sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Material {
    density: Fx,
    restitution: Fx,
    static_friction: Fx,
    dynamic_friction: Fx,
}

fn in_unit_range(v: Fx) -> bool {
    v >= Fx::ZERO && v <= Fx::ONE
}

impl Material {
    /// Constructs a validated material.
    pub fn new(
        density: Fx,
        restitution: Fx,
        static_friction: Fx,
        dynamic_friction: Fx,
    ) -> Result<Self, BodyError> {
        if density < MIN_DENSITY || density > MAX_DENSITY {
            return Err(BodyError::DensityOutOfRange(density));
        }
        if !in_unit_range(restitution) {
            return Err(BodyError::RestitutionOutOfRange(restitution));
        }
        if !in_unit_range(static_friction) {
            return Err(BodyError::FrictionOutOfRange(static_friction));
        }
        if !in_unit_range(dynamic_friction) {
            return Err(BodyError::FrictionOutOfRange(dynamic_friction));
        }
        Ok(Self {
            density,
            restitution,
            static_friction,
            dynamic_friction,
        })
    }

    /// Density in mass per unit area.
    #[must_use]
    pub const fn density(&self) -> Fx {
        self.density
    }

    /// Restitution (bounciness), `0` inelastic to `1` elastic.
    #[must_use]
    pub const fn restitution(&self) -> Fx {
        self.restitution
    }

    /// Static friction coefficient.
    #[must_use]
    pub const fn static_friction(&self) -> Fx {
        self.static_friction
    }

    /// Dynamic friction coefficient.
    #[must_use]
    pub const fn dynamic_friction(&self) -> Fx {
        self.dynamic_friction
    }

    /// Replaces the restitution; rejects out-of-range values and keeps the
    /// previous one.
    pub fn try_set_restitution(&mut self, v: Fx) -> Result<(), BodyError> {
        if in_unit_range(v) {
            self.restitution = v;
            Ok(())
        } else {
            Err(BodyError::RestitutionOutOfRange(v))
        }
    }

    /// Replaces the static friction; rejects out-of-range values.
    pub fn try_set_static_friction(&mut self, v: Fx) -> Result<(), BodyError> {
        if in_unit_range(v) {
            self.static_friction = v;
            Ok(())
        } else {
            Err(BodyError::FrictionOutOfRange(v))
        }
    }

    /// Replaces the dynamic friction; rejects out-of-range values.
    pub fn try_set_dynamic_friction(&mut self, v: Fx) -> Result<(), BodyError> {
        if in_unit_range(v) {
            self.dynamic_friction = v;
            Ok(())
        } else {
            Err(BodyError::FrictionOutOfRange(v))
        }
    }
}
