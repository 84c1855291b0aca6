//! Named glass presets.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::oklab::Oklch;
use crate::error::{Result, VitrumError};
use crate::material::glass::GlassMaterial;

/// Built-in glass looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Thin, polished, nearly invisible.
    Clear,
    /// General-purpose panel glass.
    Regular,
    /// Heavily diffusing frosted pane.
    Frosted,
    /// Dense slab with a faint green-blue body tint.
    Thick,
}

impl Preset {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Regular => "regular",
            Self::Frosted => "frosted",
            Self::Thick => "thick",
        }
    }

    pub fn all() -> &'static [Self] {
        const ALL: [Preset; 4] = [Preset::Clear, Preset::Regular, Preset::Frosted, Preset::Thick];
        &ALL
    }

    pub fn material(&self) -> GlassMaterial {
        match self {
            Self::Clear => GlassMaterial {
                ior: 1.5,
                roughness: 0.05,
                thickness: 2.0,
                absorption: [0.05; 3],
                base_color: Oklch::new(0.99, 0.0, 0.0),
                edge_power: 3.0,
                noise_scale: 0.0,
            },
            Self::Regular => GlassMaterial::default(),
            Self::Frosted => GlassMaterial {
                ior: 1.5,
                roughness: 0.6,
                thickness: 8.0,
                absorption: [0.1; 3],
                base_color: Oklch::new(0.97, 0.0, 0.0),
                edge_power: 1.5,
                noise_scale: 0.5,
            },
            Self::Thick => GlassMaterial {
                ior: 1.52,
                roughness: 0.2,
                thickness: 12.0,
                absorption: [0.12, 0.1, 0.09],
                base_color: Oklch::new(0.95, 0.02, 180.0),
                edge_power: 2.5,
                noise_scale: 0.1,
            },
        }
    }
}

impl FromStr for Preset {
    type Err = VitrumError;

    fn from_str(name: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| VitrumError::UnknownPreset(name.to_string()))
    }
}

impl GlassMaterial {
    /// Material for a preset name (`clear`, `regular`, `frosted`, `thick`).
    pub fn preset(name: &str) -> Result<Self> {
        Ok(name.parse::<Preset>()?.material())
    }
}

#[derive(Serialize)]
struct PresetEntry {
    name: &'static str,
    material: GlassMaterial,
}

/// Catalogue of every preset as a JSON array of `{name, material}`.
pub fn presets_json() -> Result<String> {
    let entries: Vec<PresetEntry> = Preset::all()
        .iter()
        .map(|p| PresetEntry {
            name: p.name(),
            material: p.material(),
        })
        .collect();
    Ok(serde_json::to_string(&entries)?)
}
