//! APCA lightness contrast (0.0.98G-4g constants).
//!
//! Lc is signed: positive for dark text on a light background, negative
//! for light text on a dark background. Magnitudes run roughly 0..108.

use serde::{Deserialize, Serialize};

use crate::color::rgb::Rgb;

const MAIN_TRC: f32 = 2.4;
const R_CO: f32 = 0.212_672_9;
const G_CO: f32 = 0.715_152_2;
const B_CO: f32 = 0.072_175_0;

const NORM_BG: f32 = 0.56;
const NORM_TXT: f32 = 0.57;
const REV_TXT: f32 = 0.62;
const REV_BG: f32 = 0.65;

const BLK_THRS: f32 = 0.022;
const BLK_CLMP: f32 = 1.414;
const SCALE_BOW: f32 = 1.14;
const SCALE_WOB: f32 = 1.14;
const LO_BOW_OFFSET: f32 = 0.027;
const LO_WOB_OFFSET: f32 = 0.027;
const DELTA_Y_MIN: f32 = 0.0005;
const LO_CLIP: f32 = 0.1;

/// Minimum |Lc| for a class of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApcaUseCase {
    BodyText,
    Heading,
    LargeText,
    NonText,
}

impl ApcaUseCase {
    pub const fn threshold(&self) -> f32 {
        match self {
            Self::BodyText => 75.0,
            Self::Heading => 60.0,
            Self::LargeText => 45.0,
            Self::NonText => 30.0,
        }
    }

    pub fn passes(&self, lc: f32) -> bool {
        lc.abs() >= self.threshold()
    }
}

/// APCA screen luminance of one encoded channel (simple power curve, no
/// linear toe).
#[inline]
pub fn apca_channel(encoded: f32) -> f32 {
    encoded.max(0.0).powf(MAIN_TRC)
}

/// APCA luminance from already-linearized channels.
#[inline]
pub fn apca_y_from_linear(linear: [f32; 3]) -> f32 {
    R_CO * linear[0] + G_CO * linear[1] + B_CO * linear[2]
}

/// APCA screen luminance of an sRGB color.
pub fn apca_y(rgb: Rgb) -> f32 {
    apca_y_from_linear(rgb.to_array().map(apca_channel))
}

/// Signed Lc from text and background screen luminances.
pub fn apca_from_y(text_y: f32, bg_y: f32) -> f32 {
    if !text_y.is_finite()
        || !bg_y.is_finite()
        || !(0.0..=1.1).contains(&text_y)
        || !(0.0..=1.1).contains(&bg_y)
    {
        return 0.0;
    }

    let text_y = soft_clamp_black(text_y);
    let bg_y = soft_clamp_black(bg_y);
    if (bg_y - text_y).abs() < DELTA_Y_MIN {
        return 0.0;
    }

    let lc = if bg_y > text_y {
        let sapc = (bg_y.powf(NORM_BG) - text_y.powf(NORM_TXT)) * SCALE_BOW;
        if sapc < LO_CLIP { 0.0 } else { sapc - LO_BOW_OFFSET }
    } else {
        let sapc = (bg_y.powf(REV_BG) - text_y.powf(REV_TXT)) * SCALE_WOB;
        if sapc > -LO_CLIP { 0.0 } else { sapc + LO_WOB_OFFSET }
    };
    lc * 100.0
}

/// Signed Lc for `text` drawn over `bg`. Not symmetric.
pub fn apca_contrast(text: Rgb, bg: Rgb) -> f32 {
    apca_from_y(apca_y(text), apca_y(bg))
}

#[inline]
fn soft_clamp_black(y: f32) -> f32 {
    if y > BLK_THRS {
        y
    } else {
        y + (BLK_THRS - y).powf(BLK_CLMP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.1;

    #[test]
    fn test_black_on_white() {
        let lc = apca_contrast(Rgb::BLACK, Rgb::WHITE);
        assert!((lc - 106.04).abs() < EPSILON, "Lc = {lc}");
    }

    #[test]
    fn test_white_on_black_is_negative() {
        let lc = apca_contrast(Rgb::WHITE, Rgb::BLACK);
        assert!((lc + 107.88).abs() < EPSILON, "Lc = {lc}");
    }

    #[test]
    fn test_polarity_matters() {
        let dark = Rgb::from_u8(0x33, 0x33, 0x33);
        let light = Rgb::from_u8(0xee, 0xee, 0xee);
        let normal = apca_contrast(dark, light);
        let reverse = apca_contrast(light, dark);
        assert!(normal > 0.0 && reverse < 0.0);
        assert!((normal.abs() - reverse.abs()).abs() > 0.5);
    }

    #[test]
    fn test_low_contrast_clips_to_zero() {
        let a = Rgb::new(0.5, 0.5, 0.5);
        let b = Rgb::new(0.52, 0.52, 0.52);
        assert_eq!(apca_contrast(a, b), 0.0);
        assert_eq!(apca_contrast(a, a), 0.0);
    }

    #[test]
    fn test_non_finite_luminance_yields_zero() {
        assert_eq!(apca_from_y(f32::NAN, 1.0), 0.0);
        assert_eq!(apca_from_y(0.0, f32::INFINITY), 0.0);
    }

    #[test]
    fn test_use_case_thresholds() {
        assert!(ApcaUseCase::BodyText.passes(-80.0));
        assert!(!ApcaUseCase::BodyText.passes(70.0));
        assert!(ApcaUseCase::Heading.passes(60.0));
        assert_eq!(ApcaUseCase::LargeText.threshold(), 45.0);
        assert_eq!(ApcaUseCase::NonText.threshold(), 30.0);
    }
}
