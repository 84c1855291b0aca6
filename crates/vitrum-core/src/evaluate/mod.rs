//! Material evaluation: `GlassMaterial × MaterialContext → EvaluatedMaterial`.
//!
//! # Pipeline
//! 1. Thermo-optic IOR shift, then Schlick F0 `((1 - n) / (1 + n))²`.
//! 2. Angle-dependent Fresnel `F0 + (1 - F0)(1 - cos θ)^5` via the shared LUT.
//! 3. Beer–Lambert transmittance `exp(-α · thickness)`.
//! 4. Scattering radius `roughness · 10 mm + min(thickness · 0.1, 2 mm)`.
//! 5. Background-dependent opacity.
//! 6. Absorption and base color passed through in linear light.
//!
//! Every step is a pure function of its inputs. The scalar entry point and
//! the batch engine both funnel into [`evaluate_kernel`], so the two agree
//! exactly.

pub mod correction;
pub mod distortion;
pub mod evaluated;
pub mod fresnel;
pub mod opacity;

use crate::color::gamut::map_to_srgb_gamut;
use crate::color::oklab::Oklch;
use crate::error::Result;
use crate::material::context::{MaterialContext, REFERENCE_TEMPERATURE_C};
use crate::material::glass::GlassMaterial;

pub use correction::Correction;
pub use distortion::{
    DISTORTION_STRIDE, MAX_DISTORTION_CELLS, distortion_len, distortion_map, distortion_map_into,
};
pub use evaluated::{Bsdf, EVALUATED_STRIDE, EvaluatedMaterial};
pub use fresnel::{FresnelLut, SILHOUETTE_COS, fresnel_f0, schlick};
pub use opacity::context_opacity;

/// IOR change per °C away from the reference temperature.
pub const THERMO_OPTIC_COEFFICIENT: f32 = 1e-5;

/// Surface scattering per unit roughness, mm.
pub const SURFACE_SCATTER_MM: f32 = 10.0;
/// Volume scattering per mm of thickness, mm.
pub const VOLUME_SCATTER_PER_MM: f32 = 0.1;
/// Cap on volume scattering, mm.
pub const VOLUME_SCATTER_MAX_MM: f32 = 2.0;

/// Evaluate a material in a context.
///
/// Fails only on a structurally invalid material; see
/// [`GlassMaterial::validate`].
pub fn evaluate(material: &GlassMaterial, context: &MaterialContext) -> Result<EvaluatedMaterial> {
    material.validate()?;
    Ok(evaluate_kernel(
        &KernelInput::new(material, context),
        FresnelLut::shared(),
    ))
}

/// Flattened per-element inputs of the evaluation kernel.
///
/// The batch engine builds these straight from its column storage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelInput {
    pub ior: f32,
    pub roughness: f32,
    pub thickness: f32,
    pub absorption: [f32; 3],
    pub mean_absorption: f32,
    pub base_color: Oklch,
    pub edge_power: f32,
    pub noise_scale: f32,
    pub background_l: f32,
    pub cos_incidence: f32,
    pub temperature_c: f32,
}

impl KernelInput {
    pub fn new(material: &GlassMaterial, context: &MaterialContext) -> Self {
        let context = context.sanitized();
        Self {
            ior: material.ior,
            roughness: material.roughness,
            thickness: material.thickness,
            absorption: material.absorption,
            mean_absorption: material.mean_absorption(),
            base_color: material.base_color,
            edge_power: material.edge_power,
            noise_scale: material.noise_scale,
            background_l: context.background.l,
            cos_incidence: context.cos_incidence(),
            temperature_c: context.temperature_c,
        }
    }
}

/// IOR at `temperature_c`, never below 1.
#[inline]
pub fn effective_ior(ior: f32, temperature_c: f32) -> f32 {
    (ior + THERMO_OPTIC_COEFFICIENT * (temperature_c - REFERENCE_TEMPERATURE_C)).max(1.0)
}

/// `exp(-α · d)`.
#[inline]
pub fn beer_lambert(absorption_per_mm: f32, thickness_mm: f32) -> f32 {
    (-f64::from(absorption_per_mm) * f64::from(thickness_mm)).exp() as f32
}

/// Blur radius in mm from surface roughness and volume scattering.
#[inline]
pub fn scattering_radius_mm(roughness: f32, thickness_mm: f32) -> f32 {
    let surface = roughness * SURFACE_SCATTER_MM;
    let volume = (thickness_mm * VOLUME_SCATTER_PER_MM).min(VOLUME_SCATTER_MAX_MM);
    surface + volume
}

/// The evaluation itself, on pre-validated input. Allocation-free.
#[inline]
pub fn evaluate_kernel(input: &KernelInput, lut: &FresnelLut) -> EvaluatedMaterial {
    let ior = effective_ior(input.ior, input.temperature_c);
    let f0 = fresnel_f0(ior);
    let fresnel = lut.schlick(f0, input.cos_incidence);
    let transmittance = beer_lambert(input.mean_absorption, input.thickness);
    let opacity = context_opacity(transmittance, input.background_l);
    let [r, g, b] = map_to_srgb_gamut(input.base_color).rgb.to_linear().to_array();

    EvaluatedMaterial {
        scattering_radius_mm: scattering_radius_mm(input.roughness, input.thickness),
        fresnel_f0: f0,
        fresnel,
        transmittance,
        opacity,
        absorption: input.absorption,
        color: [r, g, b, opacity],
        edge_reflectance: lut.schlick(f0, SILHOUETTE_COS),
        edge_power: input.edge_power,
        noise_scale: input.noise_scale,
    }
}
