use std::f64::consts::PI;

use crate::math::surface::{AngleUnit, SurfaceKind};
use crate::math::tessellator::ParamDomain;

pub struct SurfacePreset {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: SurfaceKind,
    pub unit: AngleUnit,
    pub scale: (f64, f64, f64),
    pub domain: ParamDomain,
    pub step: f64,
}

pub const SURFACE_PRESETS: &[SurfacePreset] = &[
    SurfacePreset {
        name: "Conch",
        description: "Spiral shell, angles in degrees",
        kind: SurfaceKind::Conch,
        unit: AngleUnit::Degrees,
        scale: (0.25, 0.25, 0.125),
        domain: ParamDomain {
            u: (0.0, 360.0),
            v: (-180.0, 180.0),
        },
        step: 5.0,
    },
    SurfacePreset {
        name: "Conch (radians)",
        description: "Same shell sampled in radians",
        kind: SurfaceKind::Conch,
        unit: AngleUnit::Radians,
        scale: (0.25, 0.25, 0.125),
        domain: ParamDomain {
            u: (0.0, 2.0 * PI),
            v: (-PI, PI),
        },
        step: 0.1,
    },
    SurfacePreset {
        name: "Sphere",
        description: "Polar angle u, azimuth v",
        kind: SurfaceKind::Sphere,
        unit: AngleUnit::Degrees,
        scale: (1.0, 0.0, 0.0),
        domain: ParamDomain {
            u: (0.0, 180.0),
            v: (0.0, 360.0),
        },
        step: 5.0,
    },
    SurfacePreset {
        name: "Torus",
        description: "Donut, major radius A, tube radius B",
        kind: SurfaceKind::Torus,
        unit: AngleUnit::Degrees,
        scale: (1.0, 0.35, 0.0),
        domain: ParamDomain {
            u: (0.0, 360.0),
            v: (0.0, 360.0),
        },
        step: 6.0,
    },
    SurfacePreset {
        name: "Möbius Strip",
        description: "One-sided surface, v is the strip width",
        kind: SurfaceKind::Mobius,
        unit: AngleUnit::Radians,
        scale: (1.0, 0.0, 0.0),
        domain: ParamDomain {
            u: (0.0, 2.0 * PI),
            v: (-0.4, 0.4),
        },
        step: 0.05,
    },
];

pub fn find_preset(name: &str) -> Option<usize> {
    SURFACE_PRESETS
        .iter()
        .position(|p| p.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tessellator::sample_count;

    #[test]
    fn presets_have_usable_grids() {
        for preset in SURFACE_PRESETS {
            assert!(preset.step > 0.0, "{}", preset.name);
            assert!(sample_count(preset.domain.u, preset.step) > 1, "{}", preset.name);
            assert!(sample_count(preset.domain.v, preset.step) > 1, "{}", preset.name);
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(find_preset("conch"), Some(0));
        assert_eq!(find_preset("TORUS"), Some(3));
        assert_eq!(find_preset("klein"), None);
    }
}
