//! Packed contrast over many color pairs per call.
//!
//! Each pair is six channels `[fg_r, fg_g, fg_b, bg_r, bg_g, bg_b]`. Output
//! is one `f32` per pair in a single buffer allocated at the return.

use std::sync::OnceLock;

use crate::abi::flush;
use crate::color::transfer::srgb_to_linear;
use crate::contrast::apca::{apca_channel, apca_from_y, apca_y_from_linear};
use crate::contrast::wcag::{luminance_from_linear, ratio_from_luminance};
use crate::error::{Result, VitrumError};

/// Channels per packed pair.
pub const PAIR_STRIDE: usize = 6;

/// 8-bit decode tables, built once and read-only afterwards.
struct ByteTables {
    srgb_linear: [f32; 256],
    apca_linear: [f32; 256],
}

fn byte_tables() -> &'static ByteTables {
    static TABLES: OnceLock<ByteTables> = OnceLock::new();
    TABLES.get_or_init(|| {
        let mut srgb_linear = [0.0_f32; 256];
        let mut apca_linear = [0.0_f32; 256];
        for (i, (s, a)) in srgb_linear.iter_mut().zip(apca_linear.iter_mut()).enumerate() {
            let encoded = i as f32 / 255.0;
            *s = srgb_to_linear(encoded);
            *a = apca_channel(encoded);
        }
        ByteTables {
            srgb_linear,
            apca_linear,
        }
    })
}

fn check_stride(len: usize) -> Result<usize> {
    if len % PAIR_STRIDE != 0 {
        return Err(VitrumError::PackedLength {
            len,
            stride: PAIR_STRIDE,
        });
    }
    Ok(len / PAIR_STRIDE)
}

fn decode(table: &[f32; 256], px: &[u8]) -> [f32; 3] {
    [
        table[usize::from(px[0])],
        table[usize::from(px[1])],
        table[usize::from(px[2])],
    ]
}

/// WCAG ratios for packed 8-bit pairs.
pub fn wcag_ratio_batch_u8(pairs: &[u8]) -> Result<Vec<f32>> {
    let count = check_stride(pairs.len())?;
    tracing::trace!(count, "wcag ratio batch (u8)");
    let table = &byte_tables().srgb_linear;
    let mut out = Vec::with_capacity(count);
    for pair in pairs.chunks_exact(PAIR_STRIDE) {
        let fg = luminance_from_linear(decode(table, &pair[..3]));
        let bg = luminance_from_linear(decode(table, &pair[3..]));
        out.push(ratio_from_luminance(fg, bg));
    }
    Ok(out)
}

/// Signed APCA Lc (text first, background second) for packed 8-bit pairs.
pub fn apca_batch_u8(pairs: &[u8]) -> Result<Vec<f32>> {
    let count = check_stride(pairs.len())?;
    tracing::trace!(count, "apca batch (u8)");
    let table = &byte_tables().apca_linear;
    let mut out = Vec::with_capacity(count);
    for pair in pairs.chunks_exact(PAIR_STRIDE) {
        let text = apca_y_from_linear(decode(table, &pair[..3]));
        let bg = apca_y_from_linear(decode(table, &pair[3..]));
        out.push(apca_from_y(text, bg));
    }
    Ok(out)
}

/// Non-finite channels read as 0, the rest clamp to `[0, 1]`.
fn channel(v: f32) -> f32 {
    flush(v).clamp(0.0, 1.0)
}

/// WCAG ratios for packed float pairs with channels in `[0, 1]`.
/// Non-finite channels are read as 0 and out-of-range ones are clamped, so
/// every ratio lands in `[1, 21]`.
pub fn wcag_ratio_batch_f32(pairs: &[f32]) -> Result<Vec<f32>> {
    let count = check_stride(pairs.len())?;
    tracing::trace!(count, "wcag ratio batch (f32)");
    let mut out = Vec::with_capacity(count);
    for pair in pairs.chunks_exact(PAIR_STRIDE) {
        let fg = luminance_from_linear([
            srgb_to_linear(channel(pair[0])),
            srgb_to_linear(channel(pair[1])),
            srgb_to_linear(channel(pair[2])),
        ]);
        let bg = luminance_from_linear([
            srgb_to_linear(channel(pair[3])),
            srgb_to_linear(channel(pair[4])),
            srgb_to_linear(channel(pair[5])),
        ]);
        out.push(ratio_from_luminance(fg, bg));
    }
    Ok(out)
}

/// Signed APCA Lc for packed float pairs.
pub fn apca_batch_f32(pairs: &[f32]) -> Result<Vec<f32>> {
    let count = check_stride(pairs.len())?;
    let mut out = Vec::with_capacity(count);
    for pair in pairs.chunks_exact(PAIR_STRIDE) {
        let text = apca_y_from_linear([
            apca_channel(channel(pair[0])),
            apca_channel(channel(pair[1])),
            apca_channel(channel(pair[2])),
        ]);
        let bg = apca_y_from_linear([
            apca_channel(channel(pair[3])),
            apca_channel(channel(pair[4])),
            apca_channel(channel(pair[5])),
        ]);
        out.push(apca_from_y(text, bg));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::rgb::Rgb;
    use crate::contrast::apca::apca_contrast;
    use crate::contrast::wcag::wcag_ratio;

    #[test]
    fn test_u8_batch_matches_scalar_exactly() {
        let pairs: [[u8; 6]; 4] = [
            [0, 0, 0, 255, 255, 255],
            [0x88, 0x88, 0x88, 0xff, 0xff, 0xff],
            [12, 200, 77, 240, 10, 130],
            [255, 255, 255, 0x33, 0x66, 0x99],
        ];
        let flat: Vec<u8> = pairs.iter().flatten().copied().collect();
        let ratios = wcag_ratio_batch_u8(&flat).unwrap();
        let lcs = apca_batch_u8(&flat).unwrap();
        assert_eq!(ratios.len(), 4);
        for (i, p) in pairs.iter().enumerate() {
            let fg = Rgb::from_u8(p[0], p[1], p[2]);
            let bg = Rgb::from_u8(p[3], p[4], p[5]);
            assert_eq!(ratios[i], wcag_ratio(fg, bg), "pair {i}");
            assert_eq!(lcs[i], apca_contrast(fg, bg), "pair {i}");
        }
    }

    #[test]
    fn test_f32_batch_matches_scalar_exactly() {
        let flat = [0.1, 0.2, 0.3, 0.9, 0.8, 0.7, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
        let ratios = wcag_ratio_batch_f32(&flat).unwrap();
        let lcs = apca_batch_f32(&flat).unwrap();
        let a = Rgb::new(0.1, 0.2, 0.3);
        let b = Rgb::new(0.9, 0.8, 0.7);
        assert_eq!(ratios[0], wcag_ratio(a, b));
        assert_eq!(lcs[0], apca_contrast(a, b));
        assert!((ratios[1] - 21.0).abs() < 1e-3);
    }

    #[test]
    fn test_ragged_buffer_is_rejected() {
        let err = wcag_ratio_batch_u8(&[0, 0, 0, 255, 255]).unwrap_err();
        assert!(matches!(err, VitrumError::PackedLength { len: 5, stride: 6 }));
        assert!(apca_batch_f32(&[0.0; 7]).is_err());
    }

    #[test]
    fn test_non_finite_channels_read_as_zero() {
        let dirty = [f32::NAN, 0.0, f32::INFINITY, 1.0, 1.0, 1.0];
        let ratio = wcag_ratio_batch_f32(&dirty).unwrap()[0];
        assert!((ratio - 21.0).abs() < 1e-3);
        assert!(apca_batch_f32(&dirty).unwrap()[0].is_finite());
    }

    #[test]
    fn test_out_of_range_channels_are_clamped() {
        let flat = [
            -0.2479, -0.2479, -0.2479, 1.0, 1.0, 1.0, //
            -1.0, -1.0, -1.0, 1.0, 1.0, 1.0, //
            3.0, 3.0, 3.0, 0.0, 0.0, 0.0,
        ];
        let ratios = wcag_ratio_batch_f32(&flat).unwrap();
        for ratio in &ratios {
            assert!((1.0..=21.0 + 1e-3).contains(ratio), "ratio {ratio}");
            assert!((ratio - 21.0).abs() < 1e-3);
        }
        let lcs = apca_batch_f32(&flat).unwrap();
        assert!(lcs.iter().all(|lc| lc.is_finite() && lc.abs() <= 110.0));
        assert_eq!(lcs[0], apca_contrast(Rgb::BLACK, Rgb::WHITE));
    }

    #[test]
    fn test_empty_buffer_yields_empty_output() {
        assert!(wcag_ratio_batch_u8(&[]).unwrap().is_empty());
    }
}
