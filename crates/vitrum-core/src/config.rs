//! Host-supplied configuration.

use serde::{Deserialize, Serialize};

use crate::color::gamut::GamutConfig;
use crate::error::Result;
use crate::material::context::MaterialContext;
use crate::render_context::RenderContext;

/// Everything a host may want to set once and pass around. Every field
/// has a default, so `{}` is a complete configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VitrumConfig {
    pub material_context: MaterialContext,
    pub render_context: RenderContext,
    pub gamut: GamutConfig,
}

impl VitrumConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::color_space::ColorSpaceId;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(VitrumConfig::from_json("{}").unwrap(), VitrumConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let cfg = VitrumConfig::from_json(
            r#"{
                "render_context": { "dpi": 144.0, "target_space": "display_p3" },
                "gamut": { "max_iterations": 12 }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.render_context.dpi, 144.0);
        assert_eq!(cfg.render_context.target_space, ColorSpaceId::DisplayP3);
        assert_eq!(cfg.render_context.scale_factor, 1.0);
        assert_eq!(cfg.gamut.max_iterations, 12);
        assert_eq!(cfg.gamut.epsilon, GamutConfig::default().epsilon);
        assert_eq!(cfg.material_context, MaterialContext::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut cfg = VitrumConfig::default();
        cfg.render_context.compensation.saturation_boost = Some(1.2);
        let back = VitrumConfig::from_json(&cfg.to_json().unwrap()).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(VitrumConfig::from_json("[1, 2").is_err());
    }
}
