//! Material descriptions and the context they are evaluated in.

pub mod context;
pub mod glass;
pub mod presets;

pub use context::{MaterialContext, REFERENCE_TEMPERATURE_C};
pub use glass::{GlassMaterial, GlassMaterialBuilder};
pub use presets::{Preset, presets_json};
