//! Print backend: millimetres stay millimetres.

use serde::{Deserialize, Serialize};

use vitrum_core::color::{ColorSpaceId, encode_linear_srgb};
use vitrum_core::{EvaluatedMaterial, RenderContext};

use crate::{Backend, BackendKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrintBackend;

/// Print-ready parameters. Lengths are physical and independent of the
/// render context's density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrintArtifact {
    pub blur_radius_mm: f32,
    /// Tint encoded for `color_space`, each channel in `[0, 1]`.
    pub color: [f32; 3],
    pub color_space: ColorSpaceId,
    pub opacity: f32,
    pub edge_reflectance: f32,
}

impl Backend for PrintBackend {
    type Output = PrintArtifact;

    fn kind(&self) -> BackendKind {
        BackendKind::Print
    }

    fn render(&self, material: &EvaluatedMaterial, ctx: &RenderContext) -> PrintArtifact {
        let [r, g, b, _] = material.color;
        PrintArtifact {
            blur_radius_mm: material.scattering_radius_mm,
            color: encode_linear_srgb([r, g, b], ctx.target_space).map(|c| c.clamp(0.0, 1.0)),
            color_space: ctx.target_space,
            opacity: material.opacity,
            edge_reflectance: material.edge_reflectance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrum_core::{MaterialContext, Preset, evaluate};

    #[test]
    fn test_length_is_identity_at_any_density() {
        let m = evaluate(&Preset::Frosted.material(), &MaterialContext::default()).unwrap();
        let dense = RenderContext {
            dpi: 600.0,
            scale_factor: 3.0,
            ..RenderContext::default()
        };
        assert_eq!(PrintBackend.render(&m, &dense).blur_radius_mm, m.scattering_radius_mm);
    }

    #[test]
    fn test_color_is_encoded_for_target() {
        let m = evaluate(&Preset::Regular.material(), &MaterialContext::default()).unwrap();
        let srgb = PrintBackend.render(&m, &RenderContext::default());
        let adobe = PrintBackend.render(
            &m,
            &RenderContext {
                target_space: ColorSpaceId::AdobeRgb,
                ..RenderContext::default()
            },
        );
        assert_eq!(adobe.color_space, ColorSpaceId::AdobeRgb);
        assert!(srgb.color.iter().all(|c| (0.0..=1.0).contains(c)));
        // Near-white tint: both encodings stay close to 1.
        for (a, b) in srgb.color.iter().zip(&adobe.color) {
            assert!((a - b).abs() < 0.05, "{a} vs {b}");
        }
    }
}
