//! Color space identifiers and 3x3 matrix transforms between linear RGB spaces.
//!
//! All matrices assume a D65 white point and go through CIE XYZ. Linear sRGB
//! is the hub: materials are evaluated in linear sRGB and backends convert
//! to their target space on the way out.

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

/// Identifies an output color space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpaceId {
    /// sRGB (Rec. 709 primaries, sRGB transfer).
    #[default]
    Srgb,
    /// Linear sRGB (Rec. 709 primaries, linear).
    LinearSrgb,
    /// Display P3 (DCI-P3 primaries, D65, sRGB transfer).
    DisplayP3,
    /// ITU-R BT.2020 (wide gamut).
    Rec2020,
    /// Adobe RGB (1998), common for print proofing.
    AdobeRgb,
}

impl ColorSpaceId {
    /// Human-readable label for menus and diagnostics.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Srgb => "sRGB",
            Self::LinearSrgb => "Linear sRGB",
            Self::DisplayP3 => "Display P3",
            Self::Rec2020 => "Rec.2020",
            Self::AdobeRgb => "Adobe RGB (1998)",
        }
    }

    /// Every supported color space.
    pub fn all() -> &'static [Self] {
        const ALL: [ColorSpaceId; 5] = [
            ColorSpaceId::Srgb,
            ColorSpaceId::LinearSrgb,
            ColorSpaceId::DisplayP3,
            ColorSpaceId::Rec2020,
            ColorSpaceId::AdobeRgb,
        ];
        &ALL
    }

    /// Whether the space stores linear light (no transfer function).
    pub const fn is_linear(&self) -> bool {
        matches!(self, Self::LinearSrgb)
    }

    /// Row-major matrix from this space's linear RGB to CIE XYZ (Y = 1 for white).
    fn to_xyz_rows(self) -> [[f32; 3]; 3] {
        match self {
            Self::Srgb | Self::LinearSrgb => SRGB_TO_XYZ,
            Self::DisplayP3 => P3_TO_XYZ,
            Self::Rec2020 => REC2020_TO_XYZ,
            Self::AdobeRgb => ADOBE_TO_XYZ,
        }
    }

    /// Row-major matrix from CIE XYZ to this space's linear RGB.
    fn from_xyz_rows(self) -> [[f32; 3]; 3] {
        match self {
            Self::Srgb | Self::LinearSrgb => XYZ_TO_SRGB,
            Self::DisplayP3 => XYZ_TO_P3,
            Self::Rec2020 => XYZ_TO_REC2020,
            Self::AdobeRgb => XYZ_TO_ADOBE,
        }
    }
}

const SRGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.412_390_8, 0.357_584_33, 0.180_480_8],
    [0.212_639, 0.715_168_65, 0.072_192_32],
    [0.019_330_818, 0.119_194_78, 0.950_532_14],
];

const XYZ_TO_SRGB: [[f32; 3]; 3] = [
    [3.240_97, -1.537_383_2, -0.498_610_76],
    [-0.969_243_65, 1.875_967_5, 0.041_555_06],
    [0.055_630_08, -0.203_976_96, 1.056_971_5],
];

const P3_TO_XYZ: [[f32; 3]; 3] = [
    [0.486_570_95, 0.265_667_7, 0.198_217_29],
    [0.228_974_56, 0.691_738_5, 0.079_286_91],
    [0.0, 0.045_113_38, 1.043_944_4],
];

const XYZ_TO_P3: [[f32; 3]; 3] = [
    [2.493_497, -0.931_383_6, -0.402_710_78],
    [-0.829_489, 1.762_664_1, 0.023_624_686],
    [0.035_845_83, -0.076_172_39, 0.956_884_5],
];

const REC2020_TO_XYZ: [[f32; 3]; 3] = [
    [0.636_958_04, 0.144_616_9, 0.168_880_98],
    [0.262_700_2, 0.677_998, 0.059_301_72],
    [0.0, 0.028_072_693, 1.060_985_1],
];

const XYZ_TO_REC2020: [[f32; 3]; 3] = [
    [1.716_651_2, -0.355_670_78, -0.253_366_28],
    [-0.666_684_35, 1.616_481_2, 0.015_768_546],
    [0.017_639_857, -0.042_770_613, 0.942_103_1],
];

const ADOBE_TO_XYZ: [[f32; 3]; 3] = [
    [0.576_669, 0.185_558_24, 0.188_228_65],
    [0.297_344_97, 0.627_363_57, 0.075_291_46],
    [0.027_031_36, 0.070_688_85, 0.991_337_5],
];

const XYZ_TO_ADOBE: [[f32; 3]; 3] = [
    [2.041_588, -0.565_007, -0.344_731_36],
    [-0.969_243_65, 1.875_967_5, 0.041_555_06],
    [0.013_444_28, -0.118_362_39, 1.015_175],
];

/// A 3x3 color matrix for linear color space conversions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix(pub Mat3);

impl ColorMatrix {
    /// Returns the identity matrix (no-op transform).
    pub fn identity() -> Self {
        Self(Mat3::IDENTITY)
    }

    /// Build from row-major coefficients.
    pub fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        Self(Mat3::from_cols_array_2d(&rows).transpose())
    }

    /// Apply this matrix to an RGB triplet.
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        (self.0 * Vec3::from_array(rgb)).to_array()
    }

    /// Compose: apply `self` first, then `next`.
    pub fn then(&self, next: &ColorMatrix) -> Self {
        Self(next.0 * self.0)
    }
}

/// Get the 3x3 transform matrix to convert linear RGB between color spaces.
///
/// Transfer functions are not part of the matrix; see
/// [`get_transfer`](crate::color::transfer::get_transfer).
pub fn get_conversion_matrix(from: ColorSpaceId, to: ColorSpaceId) -> ColorMatrix {
    let same_primaries = |a: ColorSpaceId, b: ColorSpaceId| {
        matches!(
            (a, b),
            (
                ColorSpaceId::Srgb | ColorSpaceId::LinearSrgb,
                ColorSpaceId::Srgb | ColorSpaceId::LinearSrgb
            )
        ) || a == b
    };
    if same_primaries(from, to) {
        return ColorMatrix::identity();
    }
    ColorMatrix::from_rows(from.to_xyz_rows()).then(&ColorMatrix::from_rows(to.from_xyz_rows()))
}

/// Linear sRGB → CIE XYZ (Y = 1 for reference white).
pub fn linear_srgb_to_xyz(rgb: [f32; 3]) -> [f32; 3] {
    ColorMatrix::from_rows(SRGB_TO_XYZ).apply(rgb)
}

/// CIE XYZ (Y = 1 for reference white) → linear sRGB.
pub fn xyz_to_linear_srgb(xyz: [f32; 3]) -> [f32; 3] {
    ColorMatrix::from_rows(XYZ_TO_SRGB).apply(xyz)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn assert_close3(actual: [f32; 3], expected: [f32; 3], tol: f32) {
        for i in 0..3 {
            let diff = (actual[i] - expected[i]).abs();
            assert!(
                diff <= tol,
                "channel {i} mismatch: got {}, expected {}, diff {diff} > {tol}",
                actual[i],
                expected[i],
            );
        }
    }

    #[test]
    fn test_identity_matrix_is_passthrough() {
        let rgb = [0.2, 0.5, 0.8];
        assert_eq!(ColorMatrix::identity().apply(rgb), rgb);
    }

    #[test]
    fn test_srgb_to_linear_srgb_is_identity() {
        let m = get_conversion_matrix(ColorSpaceId::Srgb, ColorSpaceId::LinearSrgb);
        assert_eq!(m, ColorMatrix::identity());
    }

    #[test]
    fn test_white_maps_to_white_in_every_space() {
        for &space in ColorSpaceId::all() {
            let m = get_conversion_matrix(ColorSpaceId::LinearSrgb, space);
            assert_close3(m.apply([1.0, 1.0, 1.0]), [1.0, 1.0, 1.0], EPSILON);
        }
    }

    #[test]
    fn test_srgb_red_is_inside_p3() {
        let m = get_conversion_matrix(ColorSpaceId::LinearSrgb, ColorSpaceId::DisplayP3);
        let p3 = m.apply([1.0, 0.0, 0.0]);
        assert!(p3.iter().all(|c| (-EPSILON..=1.0 + EPSILON).contains(c)), "{p3:?}");
        assert!(p3[0] < 1.0, "sRGB red should be less saturated in P3");
    }

    #[test]
    fn test_p3_roundtrip_preserves_values() {
        let there = get_conversion_matrix(ColorSpaceId::LinearSrgb, ColorSpaceId::DisplayP3);
        let back = get_conversion_matrix(ColorSpaceId::DisplayP3, ColorSpaceId::LinearSrgb);
        let rgb = [0.3, 0.6, 0.1];
        assert_close3(back.apply(there.apply(rgb)), rgb, EPSILON);
    }

    #[test]
    fn test_xyz_white_has_unit_luminance() {
        let xyz = linear_srgb_to_xyz([1.0, 1.0, 1.0]);
        assert!((xyz[1] - 1.0).abs() < EPSILON);
        assert_close3(xyz_to_linear_srgb(xyz), [1.0, 1.0, 1.0], EPSILON);
    }
}
