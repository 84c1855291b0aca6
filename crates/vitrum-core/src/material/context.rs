//! Environment a material is evaluated against.

use serde::{Deserialize, Serialize};

use crate::abi::flush;
use crate::color::oklab::Oklch;

/// Reference temperature at which IOR values are specified, °C.
pub const REFERENCE_TEMPERATURE_C: f32 = 20.0;

/// Background and viewing environment of one evaluation.
///
/// Separate from the material so one material can be evaluated in many
/// surroundings, and separate from the render context so that nothing
/// about the output target leaks into the physics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialContext {
    /// What sits behind the glass.
    pub background: Oklch,
    /// Angle between view ray and surface normal, degrees. 0 is normal
    /// incidence.
    pub incidence_angle_deg: f32,
    /// Ambient temperature, °C.
    pub temperature_c: f32,
}

impl Default for MaterialContext {
    fn default() -> Self {
        Self {
            background: Oklch::new(0.5, 0.0, 0.0),
            incidence_angle_deg: 0.0,
            temperature_c: REFERENCE_TEMPERATURE_C,
        }
    }
}

impl MaterialContext {
    pub fn with_background(background: Oklch) -> Self {
        Self {
            background,
            ..Self::default()
        }
    }

    /// `cos θ` of the incidence angle, clamped to `[0, 1]` so grazing and
    /// back-facing angles collapse to the silhouette.
    pub fn cos_incidence(&self) -> f32 {
        self.incidence_angle_deg.to_radians().cos().clamp(0.0, 1.0)
    }

    /// Copy with every non-finite field replaced by 0, matching how packed
    /// buffers are read.
    pub fn sanitized(&self) -> Self {
        Self {
            background: Oklch::from_array(self.background.to_array().map(flush)),
            incidence_angle_deg: flush(self.incidence_angle_deg),
            temperature_c: flush(self.temperature_c),
        }
    }
}
