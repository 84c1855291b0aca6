//! Fresnel reflectance: Schlick's approximation and its lookup table.

use std::sync::OnceLock;

/// Entries in the Schlick weight table.
pub const FRESNEL_LUT_SIZE: usize = 1024;

/// `cos θ` at which edge (silhouette) reflectance is taken.
pub const SILHOUETTE_COS: f32 = 0.25;

/// Normal-incidence reflectance of a dielectric in air.
///
/// `F0 = ((1 - n) / (1 + n))²`
#[inline]
pub fn fresnel_f0(ior: f32) -> f32 {
    let n = f64::from(ior);
    let r = (1.0 - n) / (1.0 + n);
    (r * r) as f32
}

/// Angular weight `(1 - cos θ)^5` of Schlick's approximation.
#[inline]
pub fn schlick_weight(cos_theta: f32) -> f32 {
    let m = (1.0 - cos_theta.clamp(0.0, 1.0)) as f64;
    let m2 = m * m;
    (m2 * m2 * m) as f32
}

/// Reference Schlick reflectance, evaluated directly.
#[inline]
pub fn schlick(f0: f32, cos_theta: f32) -> f32 {
    f0 + (1.0 - f0) * schlick_weight(cos_theta)
}

/// Schlick weight sampled at `FRESNEL_LUT_SIZE` evenly spaced `cos θ`.
///
/// Linear interpolation between entries stays within 3e-6 of the direct
/// formula. Both the scalar and the batch evaluators read the same shared
/// instance so their outputs match bit for bit.
#[derive(Debug, Clone)]
pub struct FresnelLut {
    weights: Box<[f32; FRESNEL_LUT_SIZE]>,
}

impl Default for FresnelLut {
    fn default() -> Self {
        Self::new()
    }
}

impl FresnelLut {
    pub fn new() -> Self {
        let mut weights = Box::new([0.0_f32; FRESNEL_LUT_SIZE]);
        let last = (FRESNEL_LUT_SIZE - 1) as f32;
        for (i, w) in weights.iter_mut().enumerate() {
            *w = schlick_weight(i as f32 / last);
        }
        Self { weights }
    }

    /// Process-wide table, built on first use.
    pub fn shared() -> &'static Self {
        static LUT: OnceLock<FresnelLut> = OnceLock::new();
        LUT.get_or_init(|| {
            tracing::debug!(entries = FRESNEL_LUT_SIZE, "building Fresnel LUT");
            Self::new()
        })
    }

    /// Interpolated `(1 - cos θ)^5`.
    #[inline]
    pub fn weight(&self, cos_theta: f32) -> f32 {
        let last = FRESNEL_LUT_SIZE - 1;
        let x = cos_theta.clamp(0.0, 1.0) * last as f32;
        let i = (x as usize).min(last - 1);
        let frac = x - i as f32;
        let a = self.weights[i];
        let b = self.weights[i + 1];
        a + (b - a) * frac
    }

    /// Schlick reflectance with the angular term read from the table.
    #[inline]
    pub fn schlick(&self, f0: f32, cos_theta: f32) -> f32 {
        f0 + (1.0 - f0) * self.weight(cos_theta)
    }
}
