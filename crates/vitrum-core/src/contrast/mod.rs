//! Contrast metrics: WCAG 2.1 ratio and APCA lightness contrast.
//!
//! Everything here is a pure function of two colors. The batch variants
//! take packed buffers so a host can check many pairs per boundary crossing.

pub mod apca;
pub mod batch;
pub mod wcag;

use serde::{Deserialize, Serialize};

use crate::color::gamut::map_to_srgb_gamut;
use crate::color::oklab::Oklch;
use crate::color::rgb::Rgb;

pub use apca::{ApcaUseCase, apca_contrast};
pub use batch::{apca_batch_f32, apca_batch_u8, wcag_ratio_batch_f32, wcag_ratio_batch_u8};
pub use wcag::{TextSize, WcagLevel, level_for, relative_luminance, wcag_ratio};

/// Bisection steps on OKLCH lightness in [`ensure_contrast`].
const ENSURE_STEPS: u32 = 32;

/// Both metrics for one foreground/background pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContrastResult {
    /// WCAG ratio in `[1, 21]`.
    pub ratio: f32,
    /// WCAG level for the text size it was computed with.
    pub level: WcagLevel,
    /// Signed APCA Lc, foreground as text.
    pub apca_lc: f32,
    pub large_text: bool,
}

impl ContrastResult {
    pub fn passes_aa(&self) -> bool {
        self.level >= WcagLevel::Aa
    }

    pub fn passes_aaa(&self) -> bool {
        self.level == WcagLevel::Aaa
    }

    pub fn passes_apca(&self, use_case: ApcaUseCase) -> bool {
        use_case.passes(self.apca_lc)
    }
}

/// Evaluate `fg` over `bg` for text of the given size.
pub fn contrast(fg: Rgb, bg: Rgb, text: TextSize) -> ContrastResult {
    let ratio = wcag_ratio(fg, bg);
    ContrastResult {
        ratio,
        level: level_for(ratio, text),
        apca_lc: apca_contrast(fg, bg),
        large_text: text.is_large(),
    }
}

/// Nudge `fg` until its WCAG ratio against `bg` reaches `target`.
///
/// Only OKLCH lightness moves; hue and chroma are kept (subject to gamut
/// mapping). The search heads away from the background first: toward black
/// when `fg` is the darker of the two, toward white otherwise. Returns the
/// candidate closest to `fg` that meets the target, or `None` when neither
/// pure black nor pure white gets there.
pub fn ensure_contrast(fg: Rgb, bg: Rgb, target: f32) -> Option<Rgb> {
    if wcag_ratio(fg, bg) >= target {
        return Some(fg);
    }
    let start = fg.to_oklch();
    let ends = if relative_luminance(fg) <= relative_luminance(bg) {
        [0.0, 1.0]
    } else {
        [1.0, 0.0]
    };
    ends.into_iter()
        .find_map(|end| search_lightness(start, bg, target, end))
}

fn search_lightness(start: Oklch, bg: Rgb, target: f32, end_l: f32) -> Option<Rgb> {
    let at = |l: f32| map_to_srgb_gamut(Oklch::new(l, start.c, start.h)).rgb;

    let mut best = at(end_l);
    if wcag_ratio(best, bg) < target {
        return None;
    }

    let mut near = start.l.clamp(0.0, 1.0);
    let mut far = end_l;
    for _ in 0..ENSURE_STEPS {
        let mid = 0.5 * (near + far);
        let candidate = at(mid);
        if wcag_ratio(candidate, bg) >= target {
            far = mid;
            best = candidate;
        } else {
            near = mid;
        }
    }
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.01;

    #[test]
    fn test_black_on_white_is_aaa() {
        let result = contrast(Rgb::BLACK, Rgb::WHITE, TextSize::default());
        assert!((result.ratio - 21.0).abs() < EPSILON);
        assert_eq!(result.level, WcagLevel::Aaa);
        assert!(result.passes_aa() && result.passes_aaa());
        assert!(result.passes_apca(ApcaUseCase::BodyText));
    }

    #[test]
    fn test_mid_gray_on_white_is_aa_large_only() {
        let gray = Rgb::from_hex("#888888").unwrap();
        let result = contrast(gray, Rgb::WHITE, TextSize::default());
        assert!((result.ratio - 3.54).abs() < EPSILON, "ratio = {}", result.ratio);
        assert_eq!(result.level, WcagLevel::AaLarge);
        assert!(!result.passes_aa());

        let large = contrast(gray, Rgb::WHITE, TextSize::new(24.0, 400));
        assert!(large.large_text);
        assert!(large.passes_aa());
        assert!(!large.passes_aaa());
    }

    #[test]
    fn test_dark_gray_on_white_passes_aa_not_aaa() {
        let gray = Rgb::from_hex("#646464").unwrap();
        let result = contrast(gray, Rgb::WHITE, TextSize::default());
        assert!((result.ratio - 5.92).abs() < EPSILON, "ratio = {}", result.ratio);
        assert!(result.passes_aa());
        assert!(!result.passes_aaa());
    }

    #[test]
    fn test_ratio_increases_toward_black_and_white() {
        let mut previous = 0.0;
        for step in (0..=50).rev() {
            let v = step as f32 / 100.0;
            let ratio = wcag_ratio(Rgb::new(v, v, v), Rgb::WHITE);
            assert!(ratio > previous, "ratio not increasing at v = {v}");
            previous = ratio;
        }
        let mut previous = 0.0;
        for step in 50..=100 {
            let v = step as f32 / 100.0;
            let ratio = wcag_ratio(Rgb::new(v, v, v), Rgb::BLACK);
            assert!(ratio > previous, "ratio not increasing at v = {v}");
            previous = ratio;
        }
    }

    #[test]
    fn test_ensure_contrast_darkens_to_target() {
        let gray = Rgb::from_hex("#888888").unwrap();
        let fixed = ensure_contrast(gray, Rgb::WHITE, 4.5).unwrap();
        let ratio = wcag_ratio(fixed, Rgb::WHITE);
        assert!(ratio >= 4.5, "ratio = {ratio}");
        assert!(ratio < 4.6, "overshot: {ratio}");
        assert!(fixed.r < gray.r);
    }

    #[test]
    fn test_ensure_contrast_keeps_passing_color() {
        let fg = Rgb::new(0.1, 0.1, 0.3);
        assert_eq!(ensure_contrast(fg, Rgb::WHITE, 4.5), Some(fg));
    }

    #[test]
    fn test_ensure_contrast_keeps_hue() {
        let blue = Rgb::new(0.35, 0.5, 0.95);
        let fixed = ensure_contrast(blue, Rgb::WHITE, 7.0).unwrap();
        assert!(wcag_ratio(fixed, Rgb::WHITE) >= 7.0);
        let dh = (fixed.to_oklch().h - blue.to_oklch().h).abs();
        assert!(dh < 1.0, "hue drift {dh}");
    }

    #[test]
    fn test_ensure_contrast_unreachable_target() {
        let mid = Rgb::new(0.5, 0.5, 0.5);
        assert_eq!(ensure_contrast(mid, mid, 21.0), None);
    }
}
