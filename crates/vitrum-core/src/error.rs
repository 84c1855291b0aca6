//! Error type shared by every fallible core operation.

/// Errors raised by structural validation and boundary parsing.
///
/// Numeric problems (NaN/Inf) are not errors: they are flushed to zero at
/// the exported boundary. Everything here describes input that has the
/// wrong *shape* and must be rejected instead of clamped.
#[derive(Debug, thiserror::Error)]
pub enum VitrumError {
    #[error("index of refraction must be >= 1.0, got {0}")]
    InvalidIor(f32),

    #[error("thickness must be >= 0 mm, got {0}")]
    NegativeThickness(f32),

    #[error("roughness must be within [0, 1], got {0}")]
    RoughnessOutOfRange(f32),

    #[error("absorption coefficients must be finite and >= 0 mm^-1, got {0:?}")]
    InvalidAbsorption([f32; 3]),

    #[error("edge power must be finite and > 0, got {0}")]
    InvalidEdgePower(f32),

    #[error("base color must have finite L, C, H, got {0:?}")]
    InvalidBaseColor([f32; 3]),

    #[error("batch length mismatch: {materials} materials vs {contexts} contexts")]
    LengthMismatch { materials: usize, contexts: usize },

    #[error("output buffer holds {got} elements, {needed} required")]
    OutputTooSmall { needed: usize, got: usize },

    #[error("distortion grid {cols}x{rows} exceeds {max} cells")]
    GridTooLarge { cols: usize, rows: usize, max: usize },

    #[error("packed buffer of length {len} is not a multiple of stride {stride}")]
    PackedLength { len: usize, stride: usize },

    #[error("invalid hex color: {0:?}")]
    InvalidHex(String),

    #[error("unknown material preset: {0:?}")]
    UnknownPreset(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, VitrumError>;
