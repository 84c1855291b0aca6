//! Struct-of-arrays material storage for repeated batch evaluation.

use crate::color::oklab::Oklch;
use crate::error::Result;
use crate::evaluate::KernelInput;
use crate::material::context::MaterialContext;
use crate::material::glass::GlassMaterial;

/// Validated materials split into one column per parameter.
///
/// Built once and evaluated many times (e.g. against a moving background):
/// validation and the mean-absorption reduction happen at construction,
/// so each later pass only streams columns through the kernel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialBatch {
    ior: Vec<f32>,
    roughness: Vec<f32>,
    thickness: Vec<f32>,
    absorption: Vec<[f32; 3]>,
    mean_absorption: Vec<f32>,
    base_color: Vec<Oklch>,
    edge_power: Vec<f32>,
    noise_scale: Vec<f32>,
}

impl MaterialBatch {
    /// Validate every material, then transpose. Nothing is stored if any
    /// material is invalid.
    pub fn from_materials(materials: &[GlassMaterial]) -> Result<Self> {
        for m in materials {
            m.validate()?;
        }
        let n = materials.len();
        let mut batch = Self {
            ior: Vec::with_capacity(n),
            roughness: Vec::with_capacity(n),
            thickness: Vec::with_capacity(n),
            absorption: Vec::with_capacity(n),
            mean_absorption: Vec::with_capacity(n),
            base_color: Vec::with_capacity(n),
            edge_power: Vec::with_capacity(n),
            noise_scale: Vec::with_capacity(n),
        };
        for m in materials {
            batch.ior.push(m.ior);
            batch.roughness.push(m.roughness);
            batch.thickness.push(m.thickness);
            batch.absorption.push(m.absorption);
            batch.mean_absorption.push(m.mean_absorption());
            batch.base_color.push(m.base_color);
            batch.edge_power.push(m.edge_power);
            batch.noise_scale.push(m.noise_scale);
        }
        Ok(batch)
    }

    pub fn len(&self) -> usize {
        self.ior.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ior.is_empty()
    }

    /// Reassemble material `i`.
    pub fn get(&self, i: usize) -> Option<GlassMaterial> {
        (i < self.len()).then(|| GlassMaterial {
            ior: self.ior[i],
            roughness: self.roughness[i],
            thickness: self.thickness[i],
            absorption: self.absorption[i],
            base_color: self.base_color[i],
            edge_power: self.edge_power[i],
            noise_scale: self.noise_scale[i],
        })
    }

    /// Kernel input for material `i` in `context`. `i` must be in range.
    #[inline]
    pub(crate) fn kernel_input(&self, i: usize, context: &MaterialContext) -> KernelInput {
        let context = context.sanitized();
        KernelInput {
            ior: self.ior[i],
            roughness: self.roughness[i],
            thickness: self.thickness[i],
            absorption: self.absorption[i],
            mean_absorption: self.mean_absorption[i],
            base_color: self.base_color[i],
            edge_power: self.edge_power[i],
            noise_scale: self.noise_scale[i],
            background_l: context.background.l,
            cos_incidence: context.cos_incidence(),
            temperature_c: context.temperature_c,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::presets::Preset;

    #[test]
    fn test_columns_round_trip() {
        let materials: Vec<GlassMaterial> = Preset::all().iter().map(Preset::material).collect();
        let batch = MaterialBatch::from_materials(&materials).unwrap();
        assert_eq!(batch.len(), materials.len());
        for (i, m) in materials.iter().enumerate() {
            assert_eq!(batch.get(i).as_ref(), Some(m));
        }
        assert_eq!(batch.get(materials.len()), None);
    }

    #[test]
    fn test_invalid_material_rejects_whole_batch() {
        let mut materials = vec![GlassMaterial::default(); 3];
        materials[1].thickness = -1.0;
        assert!(MaterialBatch::from_materials(&materials).is_err());
    }

    #[test]
    fn test_kernel_input_matches_scalar_construction() {
        let m = Preset::Thick.material();
        let ctx = MaterialContext::default();
        let batch = MaterialBatch::from_materials(&[m]).unwrap();
        assert_eq!(batch.kernel_input(0, &ctx), KernelInput::new(&m, &ctx));
    }

    #[test]
    fn test_kernel_input_flushes_non_finite_context() {
        let m = Preset::Frosted.material();
        let ctx = MaterialContext {
            incidence_angle_deg: f32::NAN,
            temperature_c: f32::INFINITY,
            ..MaterialContext::default()
        };
        let batch = MaterialBatch::from_materials(&[m]).unwrap();
        let input = batch.kernel_input(0, &ctx);
        assert_eq!(input, KernelInput::new(&m, &ctx));
        assert_eq!(input.cos_incidence, 1.0);
        assert_eq!(input.temperature_c, 0.0);
    }
}
