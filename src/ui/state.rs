use conch3d::config::{AppConfig, LightingConfig};
use conch3d::math::presets::{SURFACE_PRESETS, SurfacePreset};
use conch3d::math::{AngleUnit, MeshRequest, ParamDomain, SurfaceKind, TessellationConfig};

/// Figures shown in the statistics block.
#[derive(Clone, Copy, Default)]
pub struct MeshStats {
    pub vertices: usize,
    pub triangles: usize,
    pub index_format: Option<&'static str>,
    pub tessellation_ms: f64,
    pub fps: f32,
}

pub struct UiState {
    pub selected_preset: Option<usize>,

    pub kind: SurfaceKind,
    pub unit: AngleUnit,
    pub scale: (f64, f64, f64),
    pub domain: ParamDomain,
    pub tessellation: TessellationConfig,

    pub lighting: LightingConfig,
    pub background: [f32; 4],

    pub vsync_enabled: bool,
    pub show_stats: bool,
    pub show_panel: bool,

    pub mesh_needs_rebuild: bool,
}

impl UiState {
    pub fn from_config(config: &AppConfig) -> Self {
        let surface = &config.surface;
        let selected_preset = SURFACE_PRESETS
            .iter()
            .position(|p| p.kind == surface.kind && p.unit == surface.unit);

        Self {
            selected_preset,

            kind: surface.kind,
            unit: surface.unit,
            scale: (surface.a, surface.b, surface.c),
            domain: surface.domain,
            tessellation: config.tessellation,

            lighting: config.lighting.clone(),
            background: config.viewer.background,

            vsync_enabled: config.viewer.vsync,
            show_stats: true,
            show_panel: config.viewer.show_panel,

            mesh_needs_rebuild: true,
        }
    }

    pub fn apply_preset(&mut self, index: usize, preset: &SurfacePreset) {
        self.selected_preset = Some(index);
        self.kind = preset.kind;
        self.unit = preset.unit;
        self.scale = preset.scale;
        self.domain = preset.domain;
        self.tessellation.step = preset.step;
        self.mesh_needs_rebuild = true;
    }

    /// Switch angle units, converting the step and the angular domain so the
    /// surface keeps its shape. The Möbius `v` is a distance and stays put.
    pub fn set_unit(&mut self, unit: AngleUnit) {
        if unit == self.unit {
            return;
        }
        let convert = |x: f64| match unit {
            AngleUnit::Radians => x.to_radians(),
            AngleUnit::Degrees => x.to_degrees(),
        };

        self.domain.u = (convert(self.domain.u.0), convert(self.domain.u.1));
        if self.kind != SurfaceKind::Mobius {
            self.domain.v = (convert(self.domain.v.0), convert(self.domain.v.1));
        }
        self.tessellation.step = convert(self.tessellation.step);
        self.unit = unit;
        self.mesh_needs_rebuild = true;
    }

    pub fn mesh_request(&self) -> MeshRequest {
        MeshRequest {
            kind: self.kind,
            unit: self.unit,
            scale: self.scale,
            domain: self.domain,
            tessellation: self.tessellation,
        }
    }

    /// Slider bounds for the step, in the current angle unit.
    pub fn step_range(&self) -> std::ops::RangeInclusive<f64> {
        match self.unit {
            AngleUnit::Degrees => 0.5..=30.0,
            AngleUnit::Radians => 0.01..=0.5,
        }
    }
}
