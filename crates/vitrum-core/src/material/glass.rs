//! Glass material description.

use serde::{Deserialize, Serialize};

use crate::color::oklab::Oklch;
use crate::color::rgb::LUMA_REC709;
use crate::error::{Result, VitrumError};
use crate::evaluate::{EvaluatedMaterial, evaluate};
use crate::material::context::MaterialContext;

/// Immutable physical description of a glass pane.
///
/// Parameters only: nothing here knows how to render. Construct through
/// [`GlassMaterial::new`], the builder, or a preset so that [`validate`]
/// has run; values deserialized from a host should be checked with
/// [`GlassMaterial::from_json`].
///
/// [`validate`]: GlassMaterial::validate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassMaterial {
    /// Index of refraction, `>= 1.0`.
    pub ior: f32,
    /// Microfacet roughness in `[0, 1]`.
    pub roughness: f32,
    /// Slab thickness in millimetres, `>= 0`.
    pub thickness: f32,
    /// Beer–Lambert absorption coefficient per linear RGB channel, mm⁻¹.
    pub absorption: [f32; 3],
    /// Tint of the glass body.
    pub base_color: Oklch,
    /// Falloff exponent of the edge highlight, `> 0`.
    pub edge_power: f32,
    /// Spatial frequency of surface noise in the distortion map. Zero or
    /// negative disables noise.
    pub noise_scale: f32,
}

impl Default for GlassMaterial {
    fn default() -> Self {
        Self {
            ior: 1.5,
            roughness: 0.3,
            thickness: 4.0,
            absorption: [0.1; 3],
            base_color: Oklch::new(0.98, 0.0, 0.0),
            edge_power: 2.0,
            noise_scale: 0.0,
        }
    }
}

impl GlassMaterial {
    /// Validated material with default absorption, tint and shape.
    pub fn new(ior: f32, roughness: f32, thickness: f32) -> Result<Self> {
        Self::builder()
            .ior(ior)
            .roughness(roughness)
            .thickness(thickness)
            .build()
    }

    pub fn builder() -> GlassMaterialBuilder {
        GlassMaterialBuilder::default()
    }

    /// Parse a (possibly partial) JSON object and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let material: Self = serde_json::from_str(json)?;
        material.validate()?;
        Ok(material)
    }

    /// Reject structurally invalid parameters.
    ///
    /// Nothing is clamped: out-of-range roughness is an error just like an
    /// IOR below vacuum or a negative thickness.
    pub fn validate(&self) -> Result<()> {
        if !self.ior.is_finite() || self.ior < 1.0 {
            return Err(VitrumError::InvalidIor(self.ior));
        }
        if !self.thickness.is_finite() || self.thickness < 0.0 {
            return Err(VitrumError::NegativeThickness(self.thickness));
        }
        if !(0.0..=1.0).contains(&self.roughness) {
            return Err(VitrumError::RoughnessOutOfRange(self.roughness));
        }
        if self.absorption.iter().any(|a| !a.is_finite() || *a < 0.0) {
            return Err(VitrumError::InvalidAbsorption(self.absorption));
        }
        if !self.edge_power.is_finite() || self.edge_power <= 0.0 {
            return Err(VitrumError::InvalidEdgePower(self.edge_power));
        }
        let lch = self.base_color.to_array();
        if lch.iter().any(|v| !v.is_finite()) {
            return Err(VitrumError::InvalidBaseColor(lch));
        }
        Ok(())
    }

    /// Scalar absorption coefficient: the Rec. 709 luminance-weighted mean
    /// of the per-channel coefficients.
    pub fn mean_absorption(&self) -> f32 {
        let weighted: f64 = self
            .absorption
            .iter()
            .zip(LUMA_REC709)
            .map(|(&a, w)| f64::from(a) * f64::from(w))
            .sum();
        weighted as f32
    }

    /// Evaluate against `context`.
    pub fn evaluate(&self, context: &MaterialContext) -> Result<EvaluatedMaterial> {
        evaluate(self, context)
    }
}

/// Step-by-step construction starting from [`GlassMaterial::default`].
#[derive(Debug, Clone, Default)]
pub struct GlassMaterialBuilder {
    material: GlassMaterial,
}

impl GlassMaterialBuilder {
    pub fn ior(mut self, ior: f32) -> Self {
        self.material.ior = ior;
        self
    }

    pub fn roughness(mut self, roughness: f32) -> Self {
        self.material.roughness = roughness;
        self
    }

    pub fn thickness(mut self, thickness_mm: f32) -> Self {
        self.material.thickness = thickness_mm;
        self
    }

    pub fn absorption(mut self, per_mm: [f32; 3]) -> Self {
        self.material.absorption = per_mm;
        self
    }

    /// Same coefficient on every channel.
    pub fn uniform_absorption(self, per_mm: f32) -> Self {
        self.absorption([per_mm; 3])
    }

    pub fn base_color(mut self, color: Oklch) -> Self {
        self.material.base_color = color;
        self
    }

    pub fn edge_power(mut self, edge_power: f32) -> Self {
        self.material.edge_power = edge_power;
        self
    }

    pub fn noise_scale(mut self, noise_scale: f32) -> Self {
        self.material.noise_scale = noise_scale;
        self
    }

    pub fn build(self) -> Result<GlassMaterial> {
        self.material.validate()?;
        Ok(self.material)
    }
}
