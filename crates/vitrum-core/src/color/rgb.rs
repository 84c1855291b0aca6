//! Gamma-encoded and linear RGB triplets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::color_space::{linear_srgb_to_xyz, xyz_to_linear_srgb};
use crate::color::oklab::{Oklab, Oklch};
use crate::color::transfer::{linear_to_srgb, srgb_to_linear};
use crate::error::{Result, VitrumError};

/// Rec. 709 luminance weights for linear sRGB.
pub const LUMA_REC709: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// A gamma-encoded sRGB color with channels nominally in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// A linear-light sRGB color (no gamma).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LinearRgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn from_array(rgb: [f32; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }

    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// From 8-bit channels.
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        )
    }

    /// To 8-bit channels, clamping and rounding to nearest.
    pub fn to_u8(self) -> [u8; 3] {
        self.to_array().map(unit_to_u8)
    }

    /// Parse `#rgb`, `#rrggbb`, or the same without the leading `#`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
        let invalid = || VitrumError::InvalidHex(hex.to_string());
        if !digits.is_ascii() {
            return Err(invalid());
        }
        let nibble = |c: u8| (c as char).to_digit(16).map(|d| d as u8).ok_or_else(invalid);
        let bytes = digits.as_bytes();
        match bytes.len() {
            3 => {
                let r = nibble(bytes[0])?;
                let g = nibble(bytes[1])?;
                let b = nibble(bytes[2])?;
                Ok(Self::from_u8(r * 17, g * 17, b * 17))
            }
            6 => {
                let byte =
                    |i: usize| -> Result<u8> { Ok((nibble(bytes[i])? << 4) | nibble(bytes[i + 1])?) };
                Ok(Self::from_u8(byte(0)?, byte(2)?, byte(4)?))
            }
            _ => Err(invalid()),
        }
    }

    /// Format as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_u8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Remove the sRGB transfer curve.
    pub fn to_linear(self) -> LinearRgb {
        LinearRgb::new(srgb_to_linear(self.r), srgb_to_linear(self.g), srgb_to_linear(self.b))
    }

    pub fn to_oklab(self) -> Oklab {
        self.to_linear().to_oklab()
    }

    pub fn to_oklch(self) -> Oklch {
        self.to_oklab().to_oklch()
    }

    /// Whether every channel lies in `[-epsilon, 1 + epsilon]`.
    pub fn in_unit_cube(self, epsilon: f32) -> bool {
        self.to_array()
            .iter()
            .all(|c| (-epsilon..=1.0 + epsilon).contains(c))
    }

    /// Clamp each channel to `[0, 1]`.
    pub fn clamped(self) -> Self {
        Self::from_array(self.to_array().map(|c| c.clamp(0.0, 1.0)))
    }
}

impl FromStr for Rgb {
    type Err = VitrumError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl LinearRgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn from_array(rgb: [f32; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }

    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Apply the sRGB transfer curve.
    pub fn to_srgb(self) -> Rgb {
        Rgb::new(linear_to_srgb(self.r), linear_to_srgb(self.g), linear_to_srgb(self.b))
    }

    pub fn to_oklab(self) -> Oklab {
        Oklab::from_linear_srgb(self)
    }

    /// Rec. 709 relative luminance.
    pub fn luminance(self) -> f32 {
        LUMA_REC709[0] * self.r + LUMA_REC709[1] * self.g + LUMA_REC709[2] * self.b
    }

    /// CIE XYZ with Y = 1 at reference white.
    pub fn to_xyz(self) -> [f32; 3] {
        linear_srgb_to_xyz(self.to_array())
    }

    pub fn from_xyz(xyz: [f32; 3]) -> Self {
        Self::from_array(xyz_to_linear_srgb(xyz))
    }
}

impl From<Rgb> for LinearRgb {
    fn from(rgb: Rgb) -> Self {
        rgb.to_linear()
    }
}

impl From<LinearRgb> for Rgb {
    fn from(linear: LinearRgb) -> Self {
        linear.to_srgb()
    }
}

fn unit_to_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
