//! Flat `f32` record layouts shared with hosts across the ABI.
//!
//! ```text
//! material (11): ior roughness thickness absR absG absB L C H edge_power noise_scale
//! context   (5): bg_L bg_C bg_H incidence_deg temperature_c
//! evaluated(13): see EVALUATED_STRIDE
//! ```
//!
//! Records are `#[repr(C)]` and `Pod` so a host buffer is viewed in place
//! with `bytemuck` instead of being copied field by field.

use bytemuck::{Pod, Zeroable};

use crate::abi::flush;
use crate::color::oklab::Oklch;
use crate::error::{Result, VitrumError};
use crate::material::context::MaterialContext;
use crate::material::glass::GlassMaterial;

pub const MATERIAL_STRIDE: usize = 11;
pub const CONTEXT_STRIDE: usize = 5;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PackedMaterial {
    pub ior: f32,
    pub roughness: f32,
    pub thickness: f32,
    pub absorption: [f32; 3],
    pub base_lch: [f32; 3],
    pub edge_power: f32,
    pub noise_scale: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PackedContext {
    pub background_lch: [f32; 3],
    pub incidence_angle_deg: f32,
    pub temperature_c: f32,
}

const _: () = assert!(size_of::<PackedMaterial>() == MATERIAL_STRIDE * size_of::<f32>());
const _: () = assert!(size_of::<PackedContext>() == CONTEXT_STRIDE * size_of::<f32>());

impl PackedMaterial {
    /// Copy with every non-finite field replaced by 0.
    pub fn flushed(&self) -> Self {
        let fields: [f32; MATERIAL_STRIDE] = bytemuck::cast(*self);
        bytemuck::cast(fields.map(flush))
    }
}

impl PackedContext {
    /// Copy with every non-finite field replaced by 0.
    pub fn flushed(&self) -> Self {
        let fields: [f32; CONTEXT_STRIDE] = bytemuck::cast(*self);
        bytemuck::cast(fields.map(flush))
    }
}

impl From<&PackedMaterial> for GlassMaterial {
    fn from(p: &PackedMaterial) -> Self {
        Self {
            ior: p.ior,
            roughness: p.roughness,
            thickness: p.thickness,
            absorption: p.absorption,
            base_color: Oklch::from_array(p.base_lch),
            edge_power: p.edge_power,
            noise_scale: p.noise_scale,
        }
    }
}

impl From<&GlassMaterial> for PackedMaterial {
    fn from(m: &GlassMaterial) -> Self {
        Self {
            ior: m.ior,
            roughness: m.roughness,
            thickness: m.thickness,
            absorption: m.absorption,
            base_lch: m.base_color.to_array(),
            edge_power: m.edge_power,
            noise_scale: m.noise_scale,
        }
    }
}

impl From<&PackedContext> for MaterialContext {
    fn from(p: &PackedContext) -> Self {
        Self {
            background: Oklch::from_array(p.background_lch),
            incidence_angle_deg: p.incidence_angle_deg,
            temperature_c: p.temperature_c,
        }
    }
}

impl From<&MaterialContext> for PackedContext {
    fn from(c: &MaterialContext) -> Self {
        Self {
            background_lch: c.background.to_array(),
            incidence_angle_deg: c.incidence_angle_deg,
            temperature_c: c.temperature_c,
        }
    }
}

/// View a flat buffer as material records without copying.
pub fn view_materials(buf: &[f32]) -> Result<&[PackedMaterial]> {
    bytemuck::try_cast_slice(buf).map_err(|_| VitrumError::PackedLength {
        len: buf.len(),
        stride: MATERIAL_STRIDE,
    })
}

/// View a flat buffer as context records without copying.
pub fn view_contexts(buf: &[f32]) -> Result<&[PackedContext]> {
    bytemuck::try_cast_slice(buf).map_err(|_| VitrumError::PackedLength {
        len: buf.len(),
        stride: CONTEXT_STRIDE,
    })
}
