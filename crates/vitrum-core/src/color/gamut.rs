//! sRGB gamut mapping by chroma reduction at fixed lightness and hue.
//!
//! # Algorithm
//! Binary search on chroma in `[0, C]`: the midpoint is kept when its sRGB
//! conversion stays inside the unit cube (within `epsilon`), otherwise the
//! upper bound drops. Lightness and hue never change, so the OKLab distance
//! between input and output equals the chroma removed.
//!
//! # Complexity
//! At most `max_iterations` conversions; the default bound of 24 halvings
//! resolves chroma to below 1e-7 for any displayable input.

use serde::{Deserialize, Serialize};

use crate::color::oklab::Oklch;
use crate::color::rgb::Rgb;

/// Bounds for the chroma search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamutConfig {
    /// Hard cap on bisection steps.
    pub max_iterations: u32,
    /// Channel slack when testing `[0, 1]` membership; also the chroma
    /// resolution at which the search stops early.
    pub epsilon: f32,
}

impl Default for GamutConfig {
    fn default() -> Self {
        Self {
            max_iterations: 24,
            epsilon: 1e-5,
        }
    }
}

/// Outcome of mapping one color into sRGB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GamutMapping {
    /// The in-gamut OKLCH color.
    pub color: Oklch,
    /// Its sRGB encoding, clamped to `[0, 1]`.
    pub rgb: Rgb,
    /// Chroma removed from the input, `>= 0`.
    pub chroma_reduction: f32,
    /// Bisection steps taken (0 when the input was already in gamut).
    pub iterations: u32,
    /// Whether lightness had to be clamped or the search failed to land
    /// inside the cube and channels were clamped instead.
    pub clamped: bool,
}

/// Whether an OKLCH color converts to sRGB channels within `[-ε, 1 + ε]`.
pub fn in_srgb_gamut(color: Oklch, epsilon: f32) -> bool {
    color.to_srgb().in_unit_cube(epsilon)
}

/// Map into sRGB with the default search bounds.
pub fn map_to_srgb_gamut(color: Oklch) -> GamutMapping {
    map_to_srgb_gamut_with(color, &GamutConfig::default())
}

/// Map into sRGB, reducing chroma only.
///
/// Lightness outside `[0, 1]` has no in-gamut chroma at all; it is clamped
/// first and the result is flagged `clamped`.
pub fn map_to_srgb_gamut_with(color: Oklch, config: &GamutConfig) -> GamutMapping {
    let color = color.normalized();
    let l = color.l.clamp(0.0, 1.0);
    let lightness_clamped = l != color.l;
    let color = Oklch::new(l, color.c, color.h);

    if in_srgb_gamut(color, config.epsilon) {
        return GamutMapping {
            color,
            rgb: color.to_srgb().clamped(),
            chroma_reduction: 0.0,
            iterations: 0,
            clamped: lightness_clamped,
        };
    }

    let mut lo: f32 = 0.0;
    let mut hi: f32 = color.c;
    let mut iterations = 0;
    while iterations < config.max_iterations && hi - lo > config.epsilon * 1e-2 {
        let mid = (lo + hi) * 0.5;
        if in_srgb_gamut(Oklch { c: mid, ..color }, config.epsilon) {
            lo = mid;
        } else {
            hi = mid;
        }
        iterations += 1;
    }

    let mapped = Oklch { c: lo, ..color };
    let converged = in_srgb_gamut(mapped, config.epsilon);
    debug_assert!(converged, "gamut search left the sRGB cube for {color:?}");
    if !converged {
        tracing::warn!(
            ?color,
            iterations,
            "gamut mapping did not converge; clamping channels"
        );
    }

    GamutMapping {
        color: mapped,
        rgb: mapped.to_srgb().clamped(),
        chroma_reduction: color.c - lo,
        iterations,
        clamped: lightness_clamped || !converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_gamut_color_is_untouched() {
        let c = Rgb::new(0.4, 0.6, 0.2).to_oklch();
        let mapped = map_to_srgb_gamut(c);
        assert_eq!(mapped.iterations, 0);
        assert_eq!(mapped.chroma_reduction, 0.0);
        assert_eq!(mapped.color, c);
    }

    #[test]
    fn test_out_of_gamut_color_is_reduced_into_cube() {
        let c = Oklch::new(0.7, 0.4, 150.0);
        assert!(!in_srgb_gamut(c, 1e-5));
        let mapped = map_to_srgb_gamut(c);
        assert!(mapped.chroma_reduction > 0.0);
        assert!(mapped.iterations <= GamutConfig::default().max_iterations);
        assert!(in_srgb_gamut(mapped.color, 1e-5));
        assert_eq!(mapped.color.l, c.l);
        assert_eq!(mapped.color.h, c.h);
        assert!(!mapped.clamped);
    }

    #[test]
    fn test_delta_e_bounded_by_chroma_reduction() {
        for hue in (0..360).step_by(15) {
            let c = Oklch::new(0.55, 0.5, hue as f32);
            let mapped = map_to_srgb_gamut(c);
            let delta_e = c.to_oklab().distance(mapped.color.to_oklab());
            assert!(
                delta_e <= mapped.chroma_reduction + 1e-5,
                "hue {hue}: ΔE {delta_e} > reduction {}",
                mapped.chroma_reduction
            );
        }
    }

    #[test]
    fn test_search_respects_iteration_bound() {
        let config = GamutConfig {
            max_iterations: 4,
            epsilon: 1e-5,
        };
        let mapped = map_to_srgb_gamut_with(Oklch::new(0.6, 0.45, 300.0), &config);
        assert!(mapped.iterations <= 4);
        assert!(in_srgb_gamut(mapped.color, 1e-5));
    }

    #[test]
    fn test_lightness_outside_unit_range_is_clamped_and_flagged() {
        let mapped = map_to_srgb_gamut(Oklch::new(1.3, 0.1, 40.0));
        assert!(mapped.clamped);
        assert_eq!(mapped.color.l, 1.0);
        assert!(mapped.rgb.in_unit_cube(0.0));
    }
}
