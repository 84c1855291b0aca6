//! Vitrum Core — deterministic color science and material physics.
//!
//! Perceptual color spaces, contrast metrics, and the glass material
//! evaluation pipeline that turns physical descriptions into
//! backend-agnostic quantities. No renderer dependencies: backends live in
//! `vitrum-backend` and only convert units.

pub mod abi;
pub mod batch;
pub mod color;
pub mod config;
pub mod contrast;
pub mod error;
pub mod evaluate;
pub mod material;
pub mod render_context;

// Re-exports for convenience.
pub use batch::{BatchEngine, MaterialBatch, evaluate_batch};
pub use color::{Hct, HueArc, Interpolation, LinearRgb, Oklab, Oklch, Rgb, TonalPalette};
pub use color::color_space::ColorSpaceId;
pub use config::VitrumConfig;
pub use contrast::{ContrastResult, TextSize, WcagLevel, contrast, ensure_contrast};
pub use error::{Result, VitrumError};
pub use evaluate::{Bsdf, Correction, EvaluatedMaterial, evaluate};
pub use material::{GlassMaterial, MaterialContext, Preset};
pub use render_context::{Compensation, RenderContext};
