//! Refraction distortion maps for a pane.
//!
//! The pane is sampled on a `cols × rows` grid of cell centers in
//! normalized coordinates `[-1, 1]²`. Each cell gets a 4-tuple
//! `[offset_x, offset_y, hue_shift, brightness]`:
//!
//! - offsets (mm) push outward along the edge profile, scaled by the
//!   refraction strength `(ior - 1) · thickness`;
//! - hue shift (degrees) models dispersion, growing with `ior - 1` toward
//!   the edge;
//! - brightness is `1` plus the Fresnel edge highlight, modulated by value
//!   noise.
//!
//! Noise is a deterministic hash of integer lattice coordinates, so a map
//! depends only on the material and grid size.

use crate::error::{Result, VitrumError};
use crate::evaluate::fresnel::{FresnelLut, SILHOUETTE_COS, fresnel_f0};
use crate::material::glass::GlassMaterial;

/// Floats per grid cell.
pub const DISTORTION_STRIDE: usize = 4;

/// Hue rotation at the very edge for `ior - 1 = 1`, degrees.
const DISPERSION_HUE_DEG: f32 = 30.0;
/// Amplitude of noise on brightness.
const NOISE_BRIGHTNESS: f32 = 0.08;
/// Amplitude of noise on offsets, relative to refraction strength, scaled
/// by roughness.
const NOISE_OFFSET: f32 = 0.25;
/// Lattice cells across the pane at `noise_scale = 1`.
const NOISE_FREQUENCY: f32 = 8.0;

/// Largest grid a single map may cover (a 4096 × 4096 grid).
pub const MAX_DISTORTION_CELLS: usize = 1 << 24;

/// Floats needed for a `cols × rows` map, or `GridTooLarge`.
pub fn distortion_len(cols: usize, rows: usize) -> Result<usize> {
    cols.checked_mul(rows)
        .filter(|&cells| cells <= MAX_DISTORTION_CELLS)
        .map(|cells| cells * DISTORTION_STRIDE)
        .ok_or(VitrumError::GridTooLarge {
            cols,
            rows,
            max: MAX_DISTORTION_CELLS,
        })
}

/// Allocate and fill a distortion map. Empty when either side is zero.
pub fn distortion_map(material: &GlassMaterial, cols: usize, rows: usize) -> Result<Vec<f32>> {
    let mut out = vec![0.0; distortion_len(cols, rows)?];
    distortion_map_into(material, cols, rows, &mut out)?;
    Ok(out)
}

/// Fill `out[..cols * rows * 4]` in row-major order.
pub fn distortion_map_into(
    material: &GlassMaterial,
    cols: usize,
    rows: usize,
    out: &mut [f32],
) -> Result<()> {
    let needed = distortion_len(cols, rows)?;
    if out.len() < needed {
        return Err(VitrumError::OutputTooSmall {
            needed,
            got: out.len(),
        });
    }
    if needed == 0 {
        return Ok(());
    }
    let strength = (material.ior - 1.0).max(0.0) * material.thickness;
    let edge_reflectance = FresnelLut::shared().schlick(fresnel_f0(material.ior), SILHOUETTE_COS);
    let frequency = material.noise_scale.max(0.0) * NOISE_FREQUENCY;

    let cells = out[..needed].chunks_exact_mut(DISTORTION_STRIDE);
    for (index, cell) in cells.enumerate() {
        let (x, y) = (index % cols, index / cols);
        let u = (x as f32 + 0.5) / cols as f32 * 2.0 - 1.0;
        let v = (y as f32 + 0.5) / rows as f32 * 2.0 - 1.0;

        let edge = edge_profile(u, v, material.edge_power);
        let noise = if frequency > 0.0 {
            value_noise((u + 1.0) * frequency, (v + 1.0) * frequency) - 0.5
        } else {
            0.0
        };

        let push = strength * edge * (1.0 + NOISE_OFFSET * material.roughness * noise);
        let radius = (u * u + v * v).sqrt();
        let (dx, dy) = if radius > 0.0 {
            (u / radius, v / radius)
        } else {
            (0.0, 0.0)
        };

        cell[0] = dx * push;
        cell[1] = dy * push;
        cell[2] = DISPERSION_HUE_DEG * (material.ior - 1.0).max(0.0) * edge;
        cell[3] = 1.0 + edge_reflectance * edge + NOISE_BRIGHTNESS * noise;
    }
    Ok(())
}

/// 0 at the pane center, 1 at its border, shaped by `edge_power`.
#[inline]
fn edge_profile(u: f32, v: f32, edge_power: f32) -> f32 {
    let border = u.abs().max(v.abs()).clamp(0.0, 1.0);
    border.powf(edge_power.max(f32::EPSILON))
}

/// Smooth value noise in `[0, 1)`.
fn value_noise(x: f32, y: f32) -> f32 {
    let (x0, y0) = (x.floor(), y.floor());
    let (fx, fy) = (smooth(x - x0), smooth(y - y0));
    let (ix, iy) = (x0 as i32, y0 as i32);
    let n00 = lattice(ix, iy);
    let n10 = lattice(ix + 1, iy);
    let n01 = lattice(ix, iy + 1);
    let n11 = lattice(ix + 1, iy + 1);
    let top = n00 + (n10 - n00) * fx;
    let bottom = n01 + (n11 - n01) * fx;
    top + (bottom - top) * fy
}

#[inline]
fn smooth(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Hash a lattice point to `[0, 1)`.
#[inline]
fn lattice(x: i32, y: i32) -> f32 {
    let mut h = (x as u32).wrapping_mul(0x8da6_b343) ^ (y as u32).wrapping_mul(0xd816_3841);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2c1b_3c6d);
    h ^= h >> 12;
    h = h.wrapping_mul(0x297a_2d39);
    h ^= h >> 15;
    (h >> 8) as f32 / (1u32 << 24) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn smooth_glass() -> GlassMaterial {
        GlassMaterial::builder()
            .ior(1.5)
            .thickness(4.0)
            .noise_scale(0.0)
            .build()
            .unwrap()
    }

    fn cell(map: &[f32], cols: usize, x: usize, y: usize) -> [f32; 4] {
        let i = (y * cols + x) * DISTORTION_STRIDE;
        [map[i], map[i + 1], map[i + 2], map[i + 3]]
    }

    #[test]
    fn test_map_shape() {
        let map = distortion_map(&smooth_glass(), 8, 5).unwrap();
        assert_eq!(map.len(), 8 * 5 * 4);
        assert!(distortion_map(&smooth_glass(), 0, 5).unwrap().is_empty());
    }

    #[test]
    fn test_oversized_grid_is_rejected() {
        let err = distortion_map(&smooth_glass(), usize::MAX, 2).unwrap_err();
        assert!(matches!(err, VitrumError::GridTooLarge { .. }));
        let err = distortion_map(&smooth_glass(), 4097, 4096).unwrap_err();
        assert!(matches!(err, VitrumError::GridTooLarge { cols: 4097, .. }));
        assert_eq!(distortion_len(4096, 4096).unwrap(), MAX_DISTORTION_CELLS * 4);
    }

    #[test]
    fn test_short_output_is_an_error() {
        let mut out = [0.0; 15];
        let err = distortion_map_into(&smooth_glass(), 2, 2, &mut out).unwrap_err();
        assert!(matches!(err, VitrumError::OutputTooSmall { needed: 16, got: 15 }));
    }

    #[test]
    fn test_center_is_undistorted() {
        let map = distortion_map(&smooth_glass(), 5, 5).unwrap();
        let [dx, dy, hue, brightness] = cell(&map, 5, 2, 2);
        assert_eq!(dx, 0.0);
        assert_eq!(dy, 0.0);
        assert!(hue.abs() < 1.0);
        assert!(brightness >= 1.0);
    }

    #[test]
    fn test_offsets_mirror_without_noise() {
        let cols = 6;
        let map = distortion_map(&smooth_glass(), cols, 6).unwrap();
        let left = cell(&map, cols, 0, 2);
        let right = cell(&map, cols, cols - 1, 2);
        assert!((left[0] + right[0]).abs() < EPSILON);
        assert!((left[1] - right[1]).abs() < EPSILON);
        assert!(left[0] < 0.0 && right[0] > 0.0);
    }

    #[test]
    fn test_edges_distort_more_than_center() {
        let cols = 9;
        let map = distortion_map(&smooth_glass(), cols, 9).unwrap();
        let center = cell(&map, cols, 4, 4);
        let edge = cell(&map, cols, 8, 4);
        assert!(edge[0].abs() > center[0].abs());
        assert!(edge[2] > center[2]);
        assert!(edge[3] > center[3]);
    }

    #[test]
    fn test_index_matched_glass_does_not_refract() {
        let m = GlassMaterial::builder().ior(1.0).noise_scale(0.0).build().unwrap();
        let map = distortion_map(&m, 4, 4).unwrap();
        for c in map.chunks_exact(4) {
            assert_eq!(c[0], 0.0);
            assert_eq!(c[1], 0.0);
            assert_eq!(c[2], 0.0);
        }
    }

    #[test]
    fn test_noise_is_deterministic_and_bounded() {
        let m = GlassMaterial::preset("frosted").unwrap();
        let a = distortion_map(&m, 16, 16).unwrap();
        let b = distortion_map(&m, 16, 16).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|v| v.is_finite()));
        for i in 0..1000 {
            let n = value_noise(i as f32 * 0.37, i as f32 * 0.11);
            assert!((0.0..1.0).contains(&n), "noise {n}");
        }
    }
}
