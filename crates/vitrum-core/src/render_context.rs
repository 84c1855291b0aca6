//! Render-time parameters, supplied only when a backend renders.

use serde::{Deserialize, Serialize};

use crate::color::color_space::ColorSpaceId;

/// Millimetres per inch.
pub const MM_PER_INCH: f32 = 25.4;

/// Output-target parameters for one render call.
///
/// Kept apart from [`MaterialContext`](crate::material::MaterialContext):
/// nothing here affects the physics, only how physical units become
/// target units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderContext {
    /// Physical display density, dots per inch.
    pub dpi: f32,
    /// Device pixels per logical pixel.
    pub scale_factor: f32,
    /// Measured viewport density, overriding `dpi · scale_factor / 25.4`
    /// when present, finite and positive.
    pub viewport_px_per_mm: Option<f32>,
    /// Color space the artifact should be encoded for.
    pub target_space: ColorSpaceId,
    pub compensation: Compensation,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            dpi: 96.0,
            scale_factor: 1.0,
            viewport_px_per_mm: None,
            target_space: ColorSpaceId::Srgb,
            compensation: Compensation::default(),
        }
    }
}

impl RenderContext {
    /// Device pixels per millimetre.
    pub fn device_px_per_mm(&self) -> f32 {
        self.viewport_px_per_mm
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(self.dpi * self.scale_factor / MM_PER_INCH)
    }
}

/// Opt-in adjustments that are NOT physically derived.
///
/// They exist to make a given renderer look closer to the physical result
/// (e.g. blur in CSS washes out color, so a saturation boost can be asked
/// for). All are off by default and never feed back into an
/// [`EvaluatedMaterial`](crate::evaluate::EvaluatedMaterial).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Compensation {
    /// Multiplier for a CSS `saturate()` step, e.g. `1.2`.
    pub saturation_boost: Option<f32>,
}

impl Compensation {
    pub fn is_enabled(&self) -> bool {
        self.saturation_boost.is_some()
    }
}
