//! Output of evaluation: backend-agnostic physical quantities.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Floats per material in the packed evaluated layout:
/// `[scattering_radius_mm, fresnel_f0, fresnel, transmittance, opacity,
///   absR, absG, absB, r, g, b, a, edge_reflectance]`.
pub const EVALUATED_STRIDE: usize = 13;

/// Physical properties of one material in one context.
///
/// Units only, no presentation: lengths in millimetres, absorption in mm⁻¹,
/// color in linear light. Backends translate these into their own units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedMaterial {
    /// Blur radius from surface roughness plus volume scattering, mm.
    pub scattering_radius_mm: f32,
    /// Reflectance at normal incidence.
    pub fresnel_f0: f32,
    /// Reflectance at the context's incidence angle.
    pub fresnel: f32,
    /// Beer–Lambert transmittance through the full thickness.
    pub transmittance: f32,
    /// Apparent opacity against the context background.
    pub opacity: f32,
    /// Per-channel absorption coefficients, mm⁻¹, as given.
    pub absorption: [f32; 3],
    /// Linear RGBA tint; alpha equals `opacity`.
    pub color: [f32; 4],
    /// Reflectance at the silhouette.
    pub edge_reflectance: f32,
    pub edge_power: f32,
    pub noise_scale: f32,
}

impl EvaluatedMaterial {
    /// Reflectance/transmittance/absorption split of incoming light.
    pub fn bsdf(&self) -> Bsdf {
        Bsdf::from_parts(self.fresnel, self.transmittance)
    }

    /// Write the packed layout into `out[..EVALUATED_STRIDE]`.
    pub fn write_packed(&self, out: &mut [f32]) {
        let [ar, ag, ab] = self.absorption;
        let [r, g, b, a] = self.color;
        out[..EVALUATED_STRIDE].copy_from_slice(&[
            self.scattering_radius_mm,
            self.fresnel_f0,
            self.fresnel,
            self.transmittance,
            self.opacity,
            ar,
            ag,
            ab,
            r,
            g,
            b,
            a,
            self.edge_reflectance,
        ]);
    }

    pub fn to_packed(&self) -> [f32; EVALUATED_STRIDE] {
        let mut out = [0.0; EVALUATED_STRIDE];
        self.write_packed(&mut out);
        out
    }

    /// Descriptive JSON for hosts that want metadata rather than numbers.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Energy split of light hitting the pane. The three terms sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bsdf {
    pub reflectance: f32,
    pub transmittance: f32,
    pub absorption: f32,
}

impl Bsdf {
    /// From surface reflectance `R` and bulk transmittance `T`: the light
    /// that is not reflected passes through the slab and loses `1 - T` of
    /// itself to absorption.
    pub fn from_parts(reflectance: f32, bulk_transmittance: f32) -> Self {
        let reflectance = reflectance.clamp(0.0, 1.0);
        let transmittance = (1.0 - reflectance) * bulk_transmittance.clamp(0.0, 1.0);
        Self {
            reflectance,
            transmittance,
            absorption: 1.0 - reflectance - transmittance,
        }
    }

    pub fn total(&self) -> f32 {
        self.reflectance + self.transmittance + self.absorption
    }

    pub const fn to_array(&self) -> [f32; 3] {
        [self.reflectance, self.transmittance, self.absorption]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bsdf_conserves_energy() {
        for ri in 0..=10 {
            for ti in 0..=10 {
                let bsdf = Bsdf::from_parts(ri as f32 / 10.0, ti as f32 / 10.0);
                assert!((bsdf.total() - 1.0).abs() < 1e-6, "{bsdf:?}");
                assert!(bsdf.absorption >= -1e-7);
            }
        }
    }

    #[test]
    fn test_packed_layout_order() {
        let m = EvaluatedMaterial {
            scattering_radius_mm: 1.0,
            fresnel_f0: 2.0,
            fresnel: 3.0,
            transmittance: 4.0,
            opacity: 5.0,
            absorption: [6.0, 7.0, 8.0],
            color: [9.0, 10.0, 11.0, 12.0],
            edge_reflectance: 13.0,
            edge_power: 0.0,
            noise_scale: 0.0,
        };
        let packed = m.to_packed();
        for (i, v) in packed.iter().enumerate() {
            assert_eq!(*v, (i + 1) as f32);
        }
    }
}
