//! Tonal palettes: one hue and chroma swept across a fixed list of tones.

use serde::{Deserialize, Serialize};

use crate::color::hct::Hct;
use crate::color::rgb::Rgb;

/// Tone steps of a standard palette.
pub const STANDARD_TONES: [f32; 13] = [
    0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 95.0, 99.0, 100.0,
];

/// A key hue and chroma from which every tone is solved.
///
/// Chroma is a request: near tone 0 and 100 few saturated colors exist, so
/// the solved swatches come back with attenuated chroma.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TonalPalette {
    pub hue: f32,
    pub chroma: f32,
}

impl TonalPalette {
    pub const fn new(hue: f32, chroma: f32) -> Self {
        Self { hue, chroma }
    }

    /// Palette keyed on a color's own hue and chroma.
    pub fn from_rgb(rgb: Rgb) -> Self {
        let hct = Hct::from_rgb(rgb);
        Self::new(hct.hue, hct.chroma)
    }

    /// The solved color at `tone`.
    pub fn tone(&self, tone: f32) -> Hct {
        Hct::from_hct(self.hue, self.chroma, tone)
    }

    /// sRGB swatch at `tone`.
    pub fn swatch(&self, tone: f32) -> Rgb {
        Hct::from_array([self.hue, self.chroma, tone]).to_rgb()
    }

    /// Solved HCT for every tone in [`STANDARD_TONES`].
    pub fn standard(&self) -> Vec<Hct> {
        self.tones(&STANDARD_TONES)
    }

    /// Solved HCT for each requested tone. One allocation.
    pub fn tones(&self, tones: &[f32]) -> Vec<Hct> {
        tones.iter().map(|&t| self.tone(t)).collect()
    }

    /// Packed `[hue, chroma, tone]` triplets for each requested tone.
    pub fn packed(&self, tones: &[f32]) -> Vec<f32> {
        let mut out = Vec::with_capacity(tones.len() * 3);
        for &t in tones {
            out.extend_from_slice(&self.tone(t).to_array());
        }
        out
    }
}
