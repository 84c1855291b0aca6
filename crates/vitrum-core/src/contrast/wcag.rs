//! WCAG 2.1 relative luminance and contrast ratio.

use serde::{Deserialize, Serialize};

use crate::color::rgb::{LUMA_REC709, Rgb};

/// Font size at or above which text is "large" regardless of weight.
pub const LARGE_TEXT_PX: f32 = 24.0;
/// Font size at or above which bold text is "large" (14pt).
pub const LARGE_BOLD_TEXT_PX: f32 = 18.66;
/// Minimum weight counted as bold.
pub const BOLD_WEIGHT: u16 = 700;

const AA_NORMAL: f32 = 4.5;
const AA_LARGE: f32 = 3.0;
const AAA_NORMAL: f32 = 7.0;
const AAA_LARGE: f32 = 4.5;

/// Rendered text size, used to pick the WCAG threshold pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSize {
    pub font_size_px: f32,
    pub font_weight: u16,
}

impl Default for TextSize {
    fn default() -> Self {
        Self {
            font_size_px: 16.0,
            font_weight: 400,
        }
    }
}

impl TextSize {
    pub const fn new(font_size_px: f32, font_weight: u16) -> Self {
        Self {
            font_size_px,
            font_weight,
        }
    }

    /// `>= 24px`, or `>= 18.66px` at weight 700 and up.
    pub fn is_large(&self) -> bool {
        self.font_size_px >= LARGE_TEXT_PX
            || (self.font_size_px >= LARGE_BOLD_TEXT_PX && self.font_weight >= BOLD_WEIGHT)
    }
}

/// Conformance level reached by a contrast ratio for a given text size.
///
/// Ordered from worst to best. `AaLarge` means the pair is below AA for
/// this text but would pass AA if the text were large.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WcagLevel {
    Fail,
    AaLarge,
    Aa,
    Aaa,
}

impl WcagLevel {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Fail => "Fail",
            Self::AaLarge => "AA Large",
            Self::Aa => "AA",
            Self::Aaa => "AAA",
        }
    }
}

/// Level reached by `ratio` for text of the given size.
pub fn level_for(ratio: f32, text: TextSize) -> WcagLevel {
    if text.is_large() {
        if ratio >= AAA_LARGE {
            WcagLevel::Aaa
        } else if ratio >= AA_LARGE {
            WcagLevel::Aa
        } else {
            WcagLevel::Fail
        }
    } else if ratio >= AAA_NORMAL {
        WcagLevel::Aaa
    } else if ratio >= AA_NORMAL {
        WcagLevel::Aa
    } else if ratio >= AA_LARGE {
        WcagLevel::AaLarge
    } else {
        WcagLevel::Fail
    }
}

/// Rec. 709 luminance of already-linear channels.
#[inline]
pub fn luminance_from_linear(linear: [f32; 3]) -> f32 {
    LUMA_REC709[0] * linear[0] + LUMA_REC709[1] * linear[1] + LUMA_REC709[2] * linear[2]
}

/// Relative luminance of an sRGB color, `0.0` for black, `1.0` for white.
pub fn relative_luminance(rgb: Rgb) -> f32 {
    luminance_from_linear(rgb.to_linear().to_array())
}

/// Contrast ratio between two luminances, in `[1, 21]`.
///
/// Symmetric: the larger luminance is always the numerator.
#[inline]
pub fn ratio_from_luminance(a: f32, b: f32) -> f32 {
    let (light, dark) = if a >= b { (a, b) } else { (b, a) };
    (light + 0.05) / (dark + 0.05)
}

/// WCAG contrast ratio between two sRGB colors.
pub fn wcag_ratio(fg: Rgb, bg: Rgb) -> f32 {
    ratio_from_luminance(relative_luminance(fg), relative_luminance(bg))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-3;

    #[test]
    fn test_black_on_white_is_21() {
        let ratio = wcag_ratio(Rgb::BLACK, Rgb::WHITE);
        assert!((ratio - 21.0).abs() < EPSILON, "ratio = {ratio}");
        assert_eq!(level_for(ratio, TextSize::default()), WcagLevel::Aaa);
    }

    #[test]
    fn test_identical_colors_are_1() {
        let c = Rgb::new(0.2, 0.5, 0.7);
        assert!((wcag_ratio(c, c) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ratio_is_symmetric() {
        let samples = [
            Rgb::new(0.1, 0.2, 0.3),
            Rgb::new(0.9, 0.1, 0.4),
            Rgb::new(0.5, 0.5, 0.5),
            Rgb::WHITE,
            Rgb::BLACK,
        ];
        for &a in &samples {
            for &b in &samples {
                assert_eq!(wcag_ratio(a, b), wcag_ratio(b, a), "{a:?} / {b:?}");
            }
        }
    }

    #[test]
    fn test_large_text_thresholds() {
        assert!(TextSize::new(24.0, 400).is_large());
        assert!(TextSize::new(18.66, 700).is_large());
        assert!(!TextSize::new(18.66, 400).is_large());
        assert!(!TextSize::new(18.0, 900).is_large());
    }

    #[test]
    fn test_level_for_normal_and_large_text() {
        let normal = TextSize::default();
        let large = TextSize::new(32.0, 400);
        assert_eq!(level_for(3.5, normal), WcagLevel::AaLarge);
        assert_eq!(level_for(3.5, large), WcagLevel::Aa);
        assert_eq!(level_for(5.0, normal), WcagLevel::Aa);
        assert_eq!(level_for(5.0, large), WcagLevel::Aaa);
        assert_eq!(level_for(2.9, large), WcagLevel::Fail);
        assert!(WcagLevel::Aaa > WcagLevel::Aa);
        assert!(WcagLevel::AaLarge > WcagLevel::Fail);
    }
}
