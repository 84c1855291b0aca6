//! Externally supplied post-hoc corrections to a BSDF.
//!
//! A host may run its own model on top of the physical result and hand
//! back small relative deltas. Their provenance is not checked; only their
//! size is bounded, and energy is re-balanced after applying them.

use serde::{Deserialize, Serialize};

use crate::evaluate::evaluated::Bsdf;

/// Largest relative change accepted on either term.
pub const MAX_RELATIVE_CORRECTION: f32 = 0.10;

/// Relative deltas: `0.05` means "5% more than the physical value".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Correction {
    pub reflectance_delta: f32,
    pub transmittance_delta: f32,
}

impl Correction {
    pub const fn new(reflectance_delta: f32, transmittance_delta: f32) -> Self {
        Self {
            reflectance_delta,
            transmittance_delta,
        }
    }

    /// Deltas clamped to ±[`MAX_RELATIVE_CORRECTION`]; non-finite deltas
    /// become zero.
    pub fn bounded(&self) -> Self {
        let bound = |d: f32| {
            if d.is_finite() {
                d.clamp(-MAX_RELATIVE_CORRECTION, MAX_RELATIVE_CORRECTION)
            } else {
                0.0
            }
        };
        let bounded = Self::new(bound(self.reflectance_delta), bound(self.transmittance_delta));
        if bounded != *self {
            tracing::warn!(
                requested = ?self,
                applied = ?bounded,
                "correction exceeds ±10% and was bounded"
            );
        }
        bounded
    }

    /// Scale `R` and `T` by the bounded deltas and recompute absorption so
    /// that the three terms still sum to one.
    pub fn apply(&self, bsdf: Bsdf) -> Bsdf {
        let delta = self.bounded();
        let reflectance = (bsdf.reflectance * (1.0 + delta.reflectance_delta)).clamp(0.0, 1.0);
        let transmittance =
            (bsdf.transmittance * (1.0 + delta.transmittance_delta)).clamp(0.0, 1.0 - reflectance);
        Bsdf {
            reflectance,
            transmittance,
            absorption: 1.0 - reflectance - transmittance,
        }
    }
}

impl Bsdf {
    pub fn corrected(self, correction: &Correction) -> Self {
        correction.apply(self)
    }
}
