//! Transfer function (OETF/EOTF) implementations for display and print encodings.
//!
//! Each implementation uses the constants published in each standard.
//! Transfer functions convert between non-linear (encoded) and linear light
//! values. Evaluation happens in `f64` and is narrowed once on return so the
//! encode/decode round trip stays well inside 1e-6 over `[0, 1]`.

use crate::color::color_space::{ColorSpaceId, get_conversion_matrix};

/// A transfer function that converts between linear and non-linear encodings.
pub trait TransferFunction: Send + Sync {
    /// Convert from non-linear (encoded) to linear light.
    fn to_linear(&self, encoded: f32) -> f32;

    /// Convert from linear light to non-linear (encoded).
    fn to_encoded(&self, linear: f32) -> f32;
}

static SRGB: SrgbTransfer = SrgbTransfer;
static REC2020: Rec2020Transfer = Rec2020Transfer;
static ADOBE_GAMMA: GammaTransfer = GammaTransfer::ADOBE_RGB;

/// Get the transfer function for a color space, if it has a non-linear encoding.
///
/// Returns `None` for [`ColorSpaceId::LinearSrgb`]. The returned reference
/// points at a static instance, so lookups never allocate.
pub fn get_transfer(space: ColorSpaceId) -> Option<&'static dyn TransferFunction> {
    match space {
        ColorSpaceId::Srgb | ColorSpaceId::DisplayP3 => Some(&SRGB),
        ColorSpaceId::Rec2020 => Some(&REC2020),
        ColorSpaceId::AdobeRgb => Some(&ADOBE_GAMMA),
        ColorSpaceId::LinearSrgb => None,
    }
}

/// Linear sRGB to the encoded values of `target`: primaries matrix first,
/// then the target's transfer curve.
pub fn encode_linear_srgb(rgb: [f32; 3], target: ColorSpaceId) -> [f32; 3] {
    let linear = get_conversion_matrix(ColorSpaceId::LinearSrgb, target).apply(rgb);
    match get_transfer(target) {
        Some(tf) => linear.map(|c| tf.to_encoded(c)),
        None => linear,
    }
}

/// Decode one sRGB-encoded channel to linear light.
#[inline]
pub fn srgb_to_linear(encoded: f32) -> f32 {
    SRGB.to_linear(encoded)
}

/// Encode one linear-light channel with the sRGB curve.
#[inline]
pub fn linear_to_srgb(linear: f32) -> f32 {
    SRGB.to_encoded(linear)
}

// ---------------------------------------------------------------------------
// sRGB (IEC 61966-2-1)
// ---------------------------------------------------------------------------

/// sRGB transfer function per IEC 61966-2-1. Display P3 shares this curve.
///
/// ```text
/// to_linear:   V <= 0.04045 → V / 12.92
///              V >  0.04045 → ((V + 0.055) / 1.055) ^ 2.4
///
/// from_linear: L <= 0.0031308 → L × 12.92
///              L >  0.0031308 → 1.055 × L^(1/2.4) − 0.055
/// ```
///
/// Negative inputs are mirrored so out-of-gamut intermediates keep their sign.
#[derive(Debug, Clone, Copy)]
pub struct SrgbTransfer;

impl TransferFunction for SrgbTransfer {
    fn to_linear(&self, encoded: f32) -> f32 {
        let v = f64::from(encoded);
        let magnitude = v.abs();
        let linear = if magnitude <= 0.04045 {
            magnitude / 12.92
        } else {
            ((magnitude + 0.055) / 1.055).powf(2.4)
        };
        (linear.copysign(v)) as f32
    }

    fn to_encoded(&self, linear: f32) -> f32 {
        let v = f64::from(linear);
        let magnitude = v.abs();
        let encoded = if magnitude <= 0.003_130_8 {
            magnitude * 12.92
        } else {
            1.055 * magnitude.powf(1.0 / 2.4) - 0.055
        };
        (encoded.copysign(v)) as f32
    }
}

// ---------------------------------------------------------------------------
// ITU-R BT.2020
// ---------------------------------------------------------------------------

/// ITU-R BT.2020 OETF (12-bit precision constants).
///
/// # Reference
/// ITU-R BT.2020-2, Table 4
///
/// ```text
/// to_encoded: L <  β → 4.5 × L
///             L >= β → α × L^0.45 − (α − 1)
///
/// to_linear:  E <  4.5β → E / 4.5
///             E >= 4.5β → ((E + α − 1) / α)^(1/0.45)
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Rec2020Transfer;

impl Rec2020Transfer {
    const ALPHA: f64 = 1.099_296_826_809_44;
    const BETA: f64 = 0.018_053_968_510_807;
}

impl TransferFunction for Rec2020Transfer {
    fn to_linear(&self, encoded: f32) -> f32 {
        let e = f64::from(encoded).max(0.0);
        let linear = if e < 4.5 * Self::BETA {
            e / 4.5
        } else {
            ((e + Self::ALPHA - 1.0) / Self::ALPHA).powf(1.0 / 0.45)
        };
        linear as f32
    }

    fn to_encoded(&self, linear: f32) -> f32 {
        let l = f64::from(linear).max(0.0);
        let encoded = if l < Self::BETA {
            4.5 * l
        } else {
            Self::ALPHA * l.powf(0.45) - (Self::ALPHA - 1.0)
        };
        encoded as f32
    }
}

// ---------------------------------------------------------------------------
// Pure power gamma
// ---------------------------------------------------------------------------

/// A pure power-law encoding, `E = L^(1/γ)`.
#[derive(Debug, Clone, Copy)]
pub struct GammaTransfer {
    gamma: f64,
}

impl GammaTransfer {
    /// Adobe RGB (1998): γ = 563/256 ≈ 2.2.
    pub const ADOBE_RGB: Self = Self { gamma: 563.0 / 256.0 };

    /// Arbitrary power curve. Non-positive or non-finite gammas fall back to 1.
    pub fn new(gamma: f64) -> Self {
        let gamma = if gamma.is_finite() && gamma > 0.0 { gamma } else { 1.0 };
        Self { gamma }
    }
}

impl TransferFunction for GammaTransfer {
    fn to_linear(&self, encoded: f32) -> f32 {
        f64::from(encoded).max(0.0).powf(self.gamma) as f32
    }

    fn to_encoded(&self, linear: f32) -> f32 {
        f64::from(linear).max(0.0).powf(1.0 / self.gamma) as f32
    }
}
