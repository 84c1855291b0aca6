//! Native backend: density-independent points for platform toolkits.

use serde::{Deserialize, Serialize};

use vitrum_core::color::linear_to_srgb;
use vitrum_core::render_context::MM_PER_INCH;
use vitrum_core::{EvaluatedMaterial, RenderContext};

use crate::{Backend, BackendKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NativeBackend;

/// Parameters for a native blur/vibrancy view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NativeArtifact {
    /// Blur radius in points (`mm · dpi / 25.4 / scale_factor`).
    pub blur_radius_pt: f32,
    /// sRGB-encoded RGBA, alpha = opacity.
    pub tint: [f32; 4],
    pub edge_reflectance: f32,
    pub edge_power: f32,
}

/// Millimetres to density-independent points.
pub fn mm_to_points(mm: f32, ctx: &RenderContext) -> f32 {
    let scale = if ctx.scale_factor > 0.0 { ctx.scale_factor } else { 1.0 };
    mm * ctx.dpi / MM_PER_INCH / scale
}

impl Backend for NativeBackend {
    type Output = NativeArtifact;

    fn kind(&self) -> BackendKind {
        BackendKind::Native
    }

    fn render(&self, material: &EvaluatedMaterial, ctx: &RenderContext) -> NativeArtifact {
        let [r, g, b, a] = material.color;
        let encode = |c: f32| linear_to_srgb(c).clamp(0.0, 1.0);
        NativeArtifact {
            blur_radius_pt: mm_to_points(material.scattering_radius_mm, ctx),
            tint: [encode(r), encode(g), encode(b), a],
            edge_reflectance: material.edge_reflectance,
            edge_power: material.edge_power,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_one_inch_at_72_dpi_is_72_points() {
        let ctx = RenderContext {
            dpi: 72.0,
            ..RenderContext::default()
        };
        assert!((mm_to_points(25.4, &ctx) - 72.0).abs() < EPSILON);
    }

    #[test]
    fn test_scale_factor_divides_out() {
        let ctx = RenderContext {
            dpi: 192.0,
            scale_factor: 2.0,
            ..RenderContext::default()
        };
        assert!((mm_to_points(25.4, &ctx) - 96.0).abs() < EPSILON);
    }

    #[test]
    fn test_zero_scale_factor_is_treated_as_one() {
        let ctx = RenderContext {
            scale_factor: 0.0,
            ..RenderContext::default()
        };
        assert!(mm_to_points(1.0, &ctx).is_finite());
    }
}
