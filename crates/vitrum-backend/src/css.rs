//! CSS backend: a backdrop filter, a tinted background and an edge
//! highlight, in CSS reference pixels.

use std::fmt;

use serde::{Deserialize, Serialize};

use vitrum_core::color::{ColorSpaceId, encode_linear_srgb};
use vitrum_core::{EvaluatedMaterial, RenderContext};

use crate::{Backend, BackendKind};

/// CSS pixels per millimetre. CSS fixes 1in = 96px regardless of the
/// physical display, so this ignores the render context's density.
pub const CSS_PX_PER_MM: f32 = 3.779_527_559;

/// Width of the inset edge highlight, CSS px.
const EDGE_HIGHLIGHT_PX: u32 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CssBackend;

/// Values for three CSS properties, without the property names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CssArtifact {
    /// e.g. `blur(26px)` or `blur(26px) saturate(1.2)`.
    pub backdrop_filter: String,
    /// `rgba(...)` for sRGB targets, `color(...)` otherwise.
    pub background_color: String,
    /// Inset highlight whose alpha is the silhouette reflectance.
    pub box_shadow: String,
}

impl CssArtifact {
    /// Semicolon-separated declarations ready for a `style` attribute.
    pub fn declarations(&self) -> String {
        format!(
            "backdrop-filter: {}; -webkit-backdrop-filter: {}; background-color: {}; box-shadow: {};",
            self.backdrop_filter, self.backdrop_filter, self.background_color, self.box_shadow
        )
    }
}

impl fmt::Display for CssArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.declarations())
    }
}

impl Backend for CssBackend {
    type Output = CssArtifact;

    fn kind(&self) -> BackendKind {
        BackendKind::Css
    }

    fn render(&self, material: &EvaluatedMaterial, ctx: &RenderContext) -> CssArtifact {
        CssArtifact {
            backdrop_filter: backdrop_filter(material.scattering_radius_mm, ctx),
            background_color: css_color(material.color, ctx.target_space),
            box_shadow: format!(
                "inset 0 0 0 {EDGE_HIGHLIGHT_PX}px rgba(255, 255, 255, {})",
                css_number(material.edge_reflectance.clamp(0.0, 1.0), 3)
            ),
        }
    }
}

/// Blur radius in whole CSS pixels.
pub fn blur_px(radius_mm: f32) -> u32 {
    (radius_mm.max(0.0) * CSS_PX_PER_MM).round() as u32
}

fn backdrop_filter(radius_mm: f32, ctx: &RenderContext) -> String {
    let blur = format!("blur({}px)", blur_px(radius_mm));
    match ctx.compensation.saturation_boost {
        Some(boost) => format!("{blur} saturate({})", css_number(boost.max(0.0), 3)),
        None => blur,
    }
}

/// Linear RGBA as a CSS color in `target`.
pub fn css_color(linear_rgba: [f32; 4], target: ColorSpaceId) -> String {
    let [r, g, b, a] = linear_rgba;
    let alpha = css_number(a.clamp(0.0, 1.0), 3);
    let [er, eg, eb] = encode_linear_srgb([r, g, b], target).map(|c| c.clamp(0.0, 1.0));
    let function = match target {
        ColorSpaceId::Srgb => {
            let byte = |c: f32| (c * 255.0).round() as u8;
            return format!("rgba({}, {}, {}, {alpha})", byte(er), byte(eg), byte(eb));
        }
        ColorSpaceId::LinearSrgb => "srgb-linear",
        ColorSpaceId::DisplayP3 => "display-p3",
        ColorSpaceId::Rec2020 => "rec2020",
        ColorSpaceId::AdobeRgb => "a98-rgb",
    };
    format!(
        "color({function} {} {} {} / {alpha})",
        css_number(er, 4),
        css_number(eg, 4),
        css_number(eb, 4)
    )
}

/// Fixed-precision number without trailing zeros.
fn css_number(v: f32, decimals: usize) -> String {
    let s = format!("{v:.decimals$}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}
