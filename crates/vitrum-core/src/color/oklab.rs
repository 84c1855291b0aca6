//! OKLab and OKLCH, Björn Ottosson's perceptually uniform space.
//!
//! Linear sRGB goes to an LMS-like cone space through a fixed matrix, through
//! a cube root, and through a second fixed matrix to `L, a, b`. The matrices
//! are the published ones and are evaluated in `f64` so every platform
//! rounds the same way before the single narrowing to `f32`.
//!
//! ```text
//! linear sRGB ──M1──→ LMS ──∛──→ L'M'S' ──M2──→ L, a, b ──polar──→ L, C, H
//! ```

use serde::{Deserialize, Serialize};

use crate::color::rgb::{LinearRgb, Rgb};

/// Below this chroma the hue is undefined and reported as 0.
pub const ACHROMATIC_CHROMA: f32 = 1e-6;

/// Cartesian OKLab coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Oklab {
    /// Perceptual lightness, 0 (black) to 1 (white).
    pub l: f32,
    pub a: f32,
    pub b: f32,
}

/// Polar OKLCH coordinate. Packed as `[L, C, H]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Oklch {
    /// Perceptual lightness in `[0, 1]`.
    pub l: f32,
    /// Chroma, `>= 0`.
    pub c: f32,
    /// Hue in degrees, `[0, 360)`.
    pub h: f32,
}

impl Oklab {
    pub const fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    pub fn from_linear_srgb(rgb: LinearRgb) -> Self {
        let r = f64::from(rgb.r);
        let g = f64::from(rgb.g);
        let b = f64::from(rgb.b);

        let l = 0.412_221_470_8 * r + 0.536_332_536_3 * g + 0.051_445_992_9 * b;
        let m = 0.211_903_498_2 * r + 0.680_699_545_1 * g + 0.107_396_956_6 * b;
        let s = 0.088_302_461_9 * r + 0.281_718_837_6 * g + 0.629_978_700_5 * b;

        let l_ = l.cbrt();
        let m_ = m.cbrt();
        let s_ = s.cbrt();

        Self::new(
            (0.210_454_255_3 * l_ + 0.793_617_785_0 * m_ - 0.004_072_046_8 * s_) as f32,
            (1.977_998_495_1 * l_ - 2.428_592_205_0 * m_ + 0.450_593_709_9 * s_) as f32,
            (0.025_904_037_1 * l_ + 0.782_771_766_2 * m_ - 0.808_675_766_0 * s_) as f32,
        )
    }

    pub fn to_linear_srgb(self) -> LinearRgb {
        let l_ok = f64::from(self.l);
        let a = f64::from(self.a);
        let b = f64::from(self.b);

        let l_ = l_ok + 0.396_337_777_4 * a + 0.215_803_757_3 * b;
        let m_ = l_ok - 0.105_561_345_8 * a - 0.063_854_172_8 * b;
        let s_ = l_ok - 0.089_484_177_5 * a - 1.291_485_548_0 * b;

        let l = l_ * l_ * l_;
        let m = m_ * m_ * m_;
        let s = s_ * s_ * s_;

        LinearRgb::new(
            (4.076_741_662_1 * l - 3.307_711_591_3 * m + 0.230_969_929_2 * s) as f32,
            (-1.268_438_004_6 * l + 2.609_757_401_1 * m - 0.341_319_396_5 * s) as f32,
            (-0.004_196_086_3 * l - 0.703_418_614_7 * m + 1.707_614_701_0 * s) as f32,
        )
    }

    /// Gamma-encoded sRGB, possibly outside `[0, 1]`.
    pub fn to_srgb(self) -> Rgb {
        self.to_linear_srgb().to_srgb()
    }

    pub fn to_oklch(self) -> Oklch {
        let a = f64::from(self.a);
        let b = f64::from(self.b);
        let c = a.hypot(b);
        let h = if c < f64::from(ACHROMATIC_CHROMA) {
            0.0
        } else {
            b.atan2(a).to_degrees()
        };
        Oklch::new(self.l, c as f32, normalize_hue(h as f32))
    }

    pub const fn to_array(self) -> [f32; 3] {
        [self.l, self.a, self.b]
    }

    /// Euclidean distance, ΔE_ok.
    pub fn distance(self, other: Self) -> f32 {
        let dl = f64::from(self.l - other.l);
        let da = f64::from(self.a - other.a);
        let db = f64::from(self.b - other.b);
        (dl * dl + da * da + db * db).sqrt() as f32
    }
}

impl Oklch {
    pub const fn new(l: f32, c: f32, h: f32) -> Self {
        Self { l, c, h }
    }

    pub const fn from_array(lch: [f32; 3]) -> Self {
        Self::new(lch[0], lch[1], lch[2])
    }

    /// Packed `[L, C, H]`.
    pub const fn to_array(self) -> [f32; 3] {
        [self.l, self.c, self.h]
    }

    pub fn to_oklab(self) -> Oklab {
        let h = f64::from(self.h).to_radians();
        let c = f64::from(self.c.max(0.0));
        Oklab::new(self.l, (c * h.cos()) as f32, (c * h.sin()) as f32)
    }

    pub fn to_linear_srgb(self) -> LinearRgb {
        self.to_oklab().to_linear_srgb()
    }

    /// Gamma-encoded sRGB without gamut mapping; may leave `[0, 1]`.
    pub fn to_srgb(self) -> Rgb {
        self.to_oklab().to_srgb()
    }

    /// Same color with hue folded into `[0, 360)` and chroma clamped to `>= 0`.
    pub fn normalized(self) -> Self {
        Self::new(self.l, self.c.max(0.0), normalize_hue(self.h))
    }

    pub fn is_achromatic(self) -> bool {
        self.c < ACHROMATIC_CHROMA
    }
}

/// ΔE_ok between two OKLab colors.
#[inline]
pub fn oklab_distance(a: Oklab, b: Oklab) -> f32 {
    a.distance(b)
}

/// Fold a hue angle into `[0, 360)`.
#[inline]
pub fn normalize_hue(h: f32) -> f32 {
    let h = h.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if h >= 360.0 { 0.0 } else { h }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_white_is_unit_lightness_and_neutral() {
        let lab = Rgb::WHITE.to_oklab();
        assert!(approx_eq(lab.l, 1.0, EPSILON), "L = {}", lab.l);
        assert!(lab.a.abs() < EPSILON && lab.b.abs() < EPSILON, "{lab:?}");
    }

    #[test]
    fn test_black_is_zero_lightness() {
        let lab = Rgb::BLACK.to_oklab();
        assert!(approx_eq(lab.l, 0.0, EPSILON));
    }

    #[test]
    fn test_srgb_red_golden_vector() {
        // Reference values from Ottosson's published conversion.
        let lch = Rgb::new(1.0, 0.0, 0.0).to_oklch();
        assert!(approx_eq(lch.l, 0.627_955, EPSILON), "L = {}", lch.l);
        assert!(approx_eq(lch.c, 0.257_683, EPSILON), "C = {}", lch.c);
        assert!(approx_eq(lch.h, 29.2339, 0.01), "H = {}", lch.h);
    }

    #[test]
    fn test_oklab_roundtrip_preserves_rgb() {
        for rgb in [[0.1, 0.2, 0.3], [0.9, 0.5, 0.05], [0.5, 0.5, 0.5]] {
            let c = Rgb::from_array(rgb);
            let back = c.to_oklch().to_srgb();
            for i in 0..3 {
                assert!(
                    approx_eq(back.to_array()[i], rgb[i], EPSILON),
                    "channel {i}: {:?} vs {rgb:?}",
                    back
                );
            }
        }
    }

    #[test]
    fn test_gray_has_zero_hue() {
        let lch = Rgb::new(0.5, 0.5, 0.5).to_oklch();
        assert!(lch.c < 1e-4);
        assert_eq!(lch.h, 0.0);
    }

    #[test]
    fn test_normalize_hue_wraps() {
        assert!(approx_eq(normalize_hue(370.0), 10.0, EPSILON));
        assert!(approx_eq(normalize_hue(-10.0), 350.0, EPSILON));
        assert!(normalize_hue(-1e-9) < 360.0);
    }

    #[test]
    fn test_distance_is_chroma_difference_at_fixed_hue() {
        let a = Oklch::new(0.6, 0.2, 120.0).to_oklab();
        let b = Oklch::new(0.6, 0.05, 120.0).to_oklab();
        assert!(approx_eq(a.distance(b), 0.15, 1e-5));
    }
}
