//! Color interpolation in OKLab (default) and OKLCH with an explicit hue arc.

use serde::{Deserialize, Serialize};

use crate::color::gamut::map_to_srgb_gamut;
use crate::color::oklab::{Oklab, Oklch, normalize_hue};
use crate::color::rgb::Rgb;

/// Which way around the hue circle an OKLCH blend travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HueArc {
    /// The arc of at most 180°.
    #[default]
    Shorter,
    /// The complementary arc of at least 180°.
    Longer,
}

/// Interpolation space for blends and gradients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Straight line in OKLab.
    #[default]
    Oklab,
    /// Polar blend in OKLCH along the given arc.
    Oklch(HueArc),
}

/// Linear blend in OKLab. `t` is clamped to `[0, 1]`.
pub fn mix_oklab(a: Oklab, b: Oklab, t: f32) -> Oklab {
    let t = t.clamp(0.0, 1.0);
    Oklab::new(
        lerp(a.l, b.l, t),
        lerp(a.a, b.a, t),
        lerp(a.b, b.b, t),
    )
}

/// Polar blend in OKLCH. `t` is clamped to `[0, 1]`.
///
/// An achromatic endpoint has no meaningful hue, so it borrows the other
/// endpoint's hue instead of dragging the blend through an arbitrary angle.
pub fn mix_oklch(a: Oklch, b: Oklch, t: f32, arc: HueArc) -> Oklch {
    let t = t.clamp(0.0, 1.0);
    let (ha, hb) = match (a.is_achromatic(), b.is_achromatic()) {
        (true, false) => (b.h, b.h),
        (false, true) => (a.h, a.h),
        _ => (a.h, b.h),
    };
    let delta = hue_delta(ha, hb, arc);
    Oklch::new(
        lerp(a.l, b.l, t),
        lerp(a.c, b.c, t),
        normalize_hue(ha + delta * t),
    )
}

/// Signed hue travel from `from` to `to` along `arc`, in degrees.
///
/// Shorter: `(-180, 180]`. Longer: `[-360, -180] ∪ [180, 360]`; equal hues
/// travel a full turn.
pub fn hue_delta(from: f32, to: f32, arc: HueArc) -> f32 {
    let mut d = normalize_hue(to) - normalize_hue(from);
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    match arc {
        HueArc::Shorter => d,
        HueArc::Longer if d > 0.0 => d - 360.0,
        HueArc::Longer => d + 360.0,
    }
}

/// Blend two sRGB colors in the chosen space; the result is gamut mapped.
pub fn mix(a: Rgb, b: Rgb, t: f32, space: Interpolation) -> Rgb {
    match space {
        Interpolation::Oklab => map_to_srgb_gamut(mix_oklab(a.to_oklab(), b.to_oklab(), t).to_oklch()).rgb,
        Interpolation::Oklch(arc) => map_to_srgb_gamut(mix_oklch(a.to_oklch(), b.to_oklch(), t, arc)).rgb,
    }
}

/// `steps` evenly spaced colors from `a` to `b` inclusive.
///
/// Allocates exactly one buffer. `steps == 1` yields `[a]`, `0` yields `[]`.
pub fn gradient(a: Rgb, b: Rgb, steps: usize, space: Interpolation) -> Vec<Rgb> {
    let denom = steps.saturating_sub(1).max(1) as f32;
    (0..steps).map(|i| mix(a, b, i as f32 / denom, space)).collect()
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_shorter_arc_crosses_wrap_point() {
        let a = Oklch::new(0.6, 0.1, 350.0);
        let b = Oklch::new(0.6, 0.1, 10.0);
        let mid = mix_oklch(a, b, 0.5, HueArc::Shorter);
        assert!(mid.h < EPSILON || (mid.h - 360.0).abs() < EPSILON, "h = {}", mid.h);
    }

    #[test]
    fn test_longer_arc_goes_the_other_way() {
        let a = Oklch::new(0.6, 0.1, 350.0);
        let b = Oklch::new(0.6, 0.1, 10.0);
        let mid = mix_oklch(a, b, 0.5, HueArc::Longer);
        assert!((mid.h - 180.0).abs() < EPSILON, "h = {}", mid.h);
    }

    #[test]
    fn test_hue_delta_ranges() {
        assert!((hue_delta(10.0, 350.0, HueArc::Shorter) + 20.0).abs() < EPSILON);
        assert!((hue_delta(10.0, 350.0, HueArc::Longer) - 340.0).abs() < EPSILON);
        assert!((hue_delta(0.0, 180.0, HueArc::Shorter) - 180.0).abs() < EPSILON);
        assert!((hue_delta(0.0, 180.0, HueArc::Longer) + 180.0).abs() < EPSILON);
        assert!((hue_delta(42.0, 42.0, HueArc::Longer) - 360.0).abs() < EPSILON);
    }

    #[test]
    fn test_achromatic_endpoint_borrows_hue() {
        let gray = Oklch::new(0.5, 0.0, 0.0);
        let blue = Oklch::new(0.5, 0.15, 260.0);
        let mid = mix_oklch(gray, blue, 0.5, HueArc::Shorter);
        assert!((mid.h - 260.0).abs() < EPSILON);
    }

    #[test]
    fn test_oklab_mix_endpoints() {
        let a = Rgb::new(0.1, 0.2, 0.9);
        let b = Rgb::new(0.9, 0.8, 0.1);
        let start = mix(a, b, 0.0, Interpolation::Oklab);
        let end = mix(a, b, 1.0, Interpolation::Oklab);
        for i in 0..3 {
            assert!((start.to_array()[i] - a.to_array()[i]).abs() < 1e-3);
            assert!((end.to_array()[i] - b.to_array()[i]).abs() < 1e-3);
        }
    }

    #[test]
    fn test_gradient_length_and_endpoints() {
        let g = gradient(Rgb::BLACK, Rgb::WHITE, 5, Interpolation::Oklab);
        assert_eq!(g.len(), 5);
        assert!(g[0].r < 1e-3);
        assert!(g[4].r > 1.0 - 1e-3);
        // Lightness is monotone along an OKLab ramp between neutrals.
        for pair in g.windows(2) {
            assert!(pair[1].r >= pair[0].r);
        }
        assert!(gradient(Rgb::BLACK, Rgb::WHITE, 0, Interpolation::Oklab).is_empty());
    }
}
