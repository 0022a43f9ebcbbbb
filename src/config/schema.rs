//! Configuration types. Every section defaults independently, so a config
//! file only needs the keys it overrides.

use serde::{Deserialize, Serialize};

use crate::math::presets::SurfacePreset;
use crate::math::surface::{AngleUnit, SurfaceKind};
use crate::math::tessellator::{ParamDomain, TessellationConfig};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub surface: SurfaceConfig,
    pub tessellation: TessellationConfig,
    pub lighting: LightingConfig,
    pub viewer: ViewerConfig,
}

impl AppConfig {
    /// Replace surface and step with a preset, keeping the other settings.
    pub fn apply_preset(&mut self, preset: &SurfacePreset) {
        self.surface = SurfaceConfig {
            kind: preset.kind,
            unit: preset.unit,
            a: preset.scale.0,
            b: preset.scale.1,
            c: preset.scale.2,
            domain: preset.domain,
        };
        self.tessellation.step = preset.step;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub kind: SurfaceKind,
    pub unit: AngleUnit,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub domain: ParamDomain,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            kind: SurfaceKind::Conch,
            unit: AngleUnit::Degrees,
            a: 0.25,
            b: 0.25,
            c: 0.125,
            domain: ParamDomain::default(),
        }
    }
}

/// Spotlight shading. `range` is the cone half-angle in degrees, `focus`
/// the falloff exponent inside the cone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub position: [f32; 3],
    pub direction: [f32; 3],
    pub range: f32,
    pub focus: f32,
    pub ambient: f32,
    pub color: [f32; 4],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            position: [-2.0, 2.0, 2.0],
            direction: [1.0, -1.0, -1.0],
            range: 35.0,
            focus: 2.0,
            ambient: 0.2,
            color: [1.0, 1.0, 0.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub background: [f32; 4],
    pub show_panel: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            vsync: true,
            background: [1.0, 1.0, 1.0, 1.0],
            show_panel: true,
        }
    }
}
