//! Perceptual color difference (CIEDE2000) over CIELAB, D65.

use palette::color_difference::Ciede2000;
use palette::{IntoColor, Lab, LinSrgb};

use crate::color::rgb::{LinearRgb, Rgb};

/// CIEDE2000 difference between two sRGB colors. Values below ~1.0 are
/// not distinguishable side by side.
pub fn delta_e_2000(a: Rgb, b: Rgb) -> f32 {
    delta_e_2000_linear(a.to_linear(), b.to_linear())
}

/// CIEDE2000 difference between two linear sRGB colors.
pub fn delta_e_2000_linear(a: LinearRgb, b: LinearRgb) -> f32 {
    let lab_a: Lab = LinSrgb::new(a.r, a.g, a.b).into_color();
    let lab_b: Lab = LinSrgb::new(b.r, b.g, b.b).into_color();
    lab_a.difference(lab_b)
}
