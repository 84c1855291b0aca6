//! GPU backend: a uniform-ready command struct in device pixels.

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use vitrum_core::{EvaluatedMaterial, RenderContext};

use crate::{Backend, BackendKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GpuBackend;

/// Per-material parameters for a glass shader.
///
/// `#[repr(C)]` and 64 bytes, so it uploads directly with
/// `bytemuck::bytes_of` and satisfies 16-byte uniform alignment. Color
/// stays linear; the shader's output target does the encoding. The
/// refractive index itself is not carried: F0 already encodes it.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct GpuMaterialCommand {
    /// Linear RGBA tint, alpha = opacity.
    pub color: [f32; 4],
    /// Per-channel absorption, mm⁻¹.
    pub absorption: [f32; 3],
    /// Blur radius in device pixels.
    pub blur_radius_px: f32,
    pub fresnel_f0: f32,
    pub fresnel: f32,
    pub opacity: f32,
    pub edge_reflectance: f32,
    pub edge_power: f32,
    pub noise_scale: f32,
    /// Device pixels per millimetre used for this command.
    pub px_per_mm: f32,
    pub _padding: f32,
}

const _: () = assert!(size_of::<GpuMaterialCommand>() == 64);

impl GpuMaterialCommand {
    pub fn color(&self) -> Vec4 {
        Vec4::from_array(self.color)
    }

    pub fn absorption(&self) -> Vec3 {
        Vec3::from_array(self.absorption)
    }

    /// Raw bytes for a buffer write.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl Backend for GpuBackend {
    type Output = GpuMaterialCommand;

    fn kind(&self) -> BackendKind {
        BackendKind::Gpu
    }

    fn render(&self, material: &EvaluatedMaterial, ctx: &RenderContext) -> GpuMaterialCommand {
        let px_per_mm = ctx.device_px_per_mm();
        GpuMaterialCommand {
            color: material.color,
            absorption: material.absorption,
            blur_radius_px: material.scattering_radius_mm * px_per_mm,
            fresnel_f0: material.fresnel_f0,
            fresnel: material.fresnel,
            opacity: material.opacity,
            edge_reflectance: material.edge_reflectance,
            edge_power: material.edge_power,
            noise_scale: material.noise_scale,
            px_per_mm,
            _padding: 0.0,
        }
    }
}

/// Pack commands into one contiguous byte buffer for a storage-buffer
/// upload.
pub fn commands_as_bytes(commands: &[GpuMaterialCommand]) -> &[u8] {
    bytemuck::cast_slice(commands)
}
