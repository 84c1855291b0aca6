//! Color spaces: sRGB, linear sRGB, OKLab/OKLCH, CAM16/HCT, plus gamut
//! mapping, interpolation and perceptual difference.

pub mod color_space;
pub mod delta_e;
pub mod gamut;
pub mod hct;
pub mod interpolate;
pub mod oklab;
pub mod rgb;
pub mod tonal;
pub mod transfer;

pub use color_space::{ColorMatrix, ColorSpaceId, get_conversion_matrix};
pub use delta_e::{delta_e_2000, delta_e_2000_linear};
pub use gamut::{GamutConfig, GamutMapping, in_srgb_gamut, map_to_srgb_gamut, map_to_srgb_gamut_with};
pub use hct::{Cam16, Hct, ViewingConditions};
pub use interpolate::{HueArc, Interpolation, gradient, mix};
pub use oklab::{Oklab, Oklch, normalize_hue, oklab_distance};
pub use rgb::{LinearRgb, Rgb};
pub use tonal::{STANDARD_TONES, TonalPalette};
pub use transfer::{TransferFunction, encode_linear_srgb, get_transfer, linear_to_srgb, srgb_to_linear};
