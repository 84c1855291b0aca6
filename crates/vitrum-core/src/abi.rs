//! Packed host-boundary surface.
//!
//! Every function here takes flat `f32` buffers and returns exactly one
//! buffer. Non-finite inputs are read as 0, and non-finite outputs are
//! written as 0, so nothing a host hands in can make NaN or ±Inf cross the
//! boundary on the way back. Structural problems (ragged buffers, invalid
//! materials, mismatched batch lengths) are returned as errors before any
//! output is produced.
//!
//! | Function                 | In (stride)                 | Out (stride) |
//! |--------------------------|-----------------------------|--------------|
//! | `srgb_to_oklch_packed`   | rgb (3)                     | `[L, C, H]`  |
//! | `oklch_to_srgb_packed`   | `[L, C, H]` (3)             | rgb (3)      |
//! | `hct_from_srgb_packed`   | rgb (3)                     | `[h, c, t]`  |
//! | `hct_to_srgb_packed`     | `[h, c, t]` (3)             | rgb (3)      |
//! | `tonal_palette_packed`   | hue, chroma, tones          | `[h, c, t]`  |
//! | `wcag_ratio_packed`      | fg rgb + bg rgb (6)         | ratio (1)    |
//! | `apca_packed`            | text rgb + bg rgb (6)       | Lc (1)       |
//! | `evaluate_packed`        | material (11), context (5)  | 13           |
//! | `bsdf_packed`            | material (11), context (5)  | `[R, T, A]`  |
//! | `distortion_map_packed`  | material (11), cols, rows   | 4 per cell   |

use crate::batch::BatchEngine;
use crate::batch::packed::{MATERIAL_STRIDE, view_materials};
use crate::color::gamut::map_to_srgb_gamut;
use crate::color::hct::Hct;
use crate::color::oklab::Oklch;
use crate::color::rgb::Rgb;
use crate::color::tonal::{STANDARD_TONES, TonalPalette};
use crate::contrast::batch::{apca_batch_f32, wcag_ratio_batch_f32};
use crate::error::{Result, VitrumError};
use crate::evaluate::{EVALUATED_STRIDE, Bsdf, distortion_map};
use crate::material::glass::GlassMaterial;

const TRIPLET: usize = 3;

/// `v` if finite, otherwise 0.
#[inline]
pub fn flush(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}

/// sRGB triplets to OKLCH triplets.
pub fn srgb_to_oklch_packed(rgb: &[f32]) -> Result<Vec<f32>> {
    map_triplets(rgb, "srgb_to_oklch_packed", |c| {
        Rgb::from_array(c).to_oklch().to_array()
    })
}

/// OKLCH triplets to gamut-mapped sRGB triplets.
pub fn oklch_to_srgb_packed(lch: &[f32]) -> Result<Vec<f32>> {
    map_triplets(lch, "oklch_to_srgb_packed", |c| {
        map_to_srgb_gamut(Oklch::from_array(c)).rgb.to_array()
    })
}

/// sRGB triplets to HCT triplets.
pub fn hct_from_srgb_packed(rgb: &[f32]) -> Result<Vec<f32>> {
    map_triplets(rgb, "hct_from_srgb_packed", |c| {
        Hct::from_rgb(Rgb::from_array(c)).to_array()
    })
}

/// HCT triplets to sRGB triplets.
pub fn hct_to_srgb_packed(hct: &[f32]) -> Result<Vec<f32>> {
    map_triplets(hct, "hct_to_srgb_packed", |c| {
        Hct::from_array(c).to_rgb().to_array()
    })
}

/// Achieved `[hue, chroma, tone]` for each tone of a palette. An empty
/// `tones` slice selects the standard tone list.
pub fn tonal_palette_packed(hue: f32, chroma: f32, tones: &[f32]) -> Vec<f32> {
    warn_non_finite("tonal_palette_packed", tones);
    let palette = TonalPalette::new(flush(hue), flush(chroma));
    let tones = if tones.is_empty() { &STANDARD_TONES[..] } else { tones };
    let mut out = Vec::with_capacity(tones.len() * TRIPLET);
    for &t in tones {
        out.extend(palette.tone(flush(t)).to_array().map(flush));
    }
    out
}

/// WCAG ratio per six-channel pair.
pub fn wcag_ratio_packed(pairs: &[f32]) -> Result<Vec<f32>> {
    warn_non_finite("wcag_ratio_packed", pairs);
    let mut out = wcag_ratio_batch_f32(pairs)?;
    flush_in_place(&mut out);
    Ok(out)
}

/// Signed APCA Lc per six-channel pair.
pub fn apca_packed(pairs: &[f32]) -> Result<Vec<f32>> {
    warn_non_finite("apca_packed", pairs);
    let mut out = apca_batch_f32(pairs)?;
    flush_in_place(&mut out);
    Ok(out)
}

/// Evaluated records (stride 13) for packed materials and contexts.
pub fn evaluate_packed(materials: &[f32], contexts: &[f32]) -> Result<Vec<f32>> {
    warn_non_finite("evaluate_packed", materials);
    warn_non_finite("evaluate_packed", contexts);
    let mut out = BatchEngine::new().evaluate_packed(materials, contexts)?;
    flush_in_place(&mut out);
    Ok(out)
}

/// BSDF triplets `[reflectance, transmittance, absorption]`.
pub fn bsdf_packed(materials: &[f32], contexts: &[f32]) -> Result<Vec<f32>> {
    let evaluated = evaluate_packed(materials, contexts)?;
    let mut out = Vec::with_capacity(evaluated.len() / EVALUATED_STRIDE * TRIPLET);
    for record in evaluated.chunks_exact(EVALUATED_STRIDE) {
        // fresnel at index 2, transmittance at index 3
        let bsdf = Bsdf::from_parts(record[2], record[3]);
        out.extend(bsdf.to_array().map(flush));
    }
    Ok(out)
}

/// Distortion map for a single packed material.
pub fn distortion_map_packed(material: &[f32], cols: u32, rows: u32) -> Result<Vec<f32>> {
    let records = view_materials(material)?;
    let [record] = records else {
        return Err(VitrumError::PackedLength {
            len: material.len(),
            stride: MATERIAL_STRIDE,
        });
    };
    warn_non_finite("distortion_map_packed", material);
    let material = GlassMaterial::from(&record.flushed());
    material.validate()?;
    let mut out = distortion_map(&material, cols as usize, rows as usize)?;
    flush_in_place(&mut out);
    Ok(out)
}

fn map_triplets(
    input: &[f32],
    name: &'static str,
    f: impl Fn([f32; 3]) -> [f32; 3],
) -> Result<Vec<f32>> {
    if input.len() % TRIPLET != 0 {
        return Err(VitrumError::PackedLength {
            len: input.len(),
            stride: TRIPLET,
        });
    }
    warn_non_finite(name, input);
    let mut out = Vec::with_capacity(input.len());
    for c in input.chunks_exact(TRIPLET) {
        out.extend(f([flush(c[0]), flush(c[1]), flush(c[2])]).map(flush));
    }
    Ok(out)
}

fn flush_in_place(buf: &mut [f32]) {
    for v in buf.iter_mut() {
        *v = flush(*v);
    }
}

/// One warning per call, never per element.
fn warn_non_finite(name: &str, buf: &[f32]) {
    let count = buf.iter().filter(|v| !v.is_finite()).count();
    if count > 0 {
        tracing::warn!("{name}: flushed {count} non-finite input value(s) to 0");
    }
}
