// SPDX-License-Identifier: Apache-2.0
//! Error types for body and material construction.

use thiserror::Error;
use torq_math::Fx;

/// Errors emitted when constructing bodies or materials.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BodyError {
    /// Density outside the configured `[MIN_DENSITY, MAX_DENSITY]` range.
    #[error("density {0} outside [{min}, {max}]", min = crate::MIN_DENSITY, max = crate::MAX_DENSITY)]
    DensityOutOfRange(Fx),
    /// Restitution outside `[0, 1]`.
    #[error("restitution {0} outside [0, 1]")]
    RestitutionOutOfRange(Fx),
    /// Static or dynamic friction outside `[0, 1]`.
    #[error("friction {0} outside [0, 1]")]
    FrictionOutOfRange(Fx),
    /// Circle radius or rectangle extent was zero or negative.
    #[error("degenerate shape extent {0}")]
    DegenerateShape(Fx),
}
