use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::math::mesh::TriangleMesh;
use crate::math::normal::{DEFAULT_DELTA, NormalEstimator};
use crate::math::surface::SurfaceEquation;

/// Tolerance when deciding whether the last grid line lands on the bound.
const GRID_EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TessellationMode {
    /// Six vertices per cell, no index buffer.
    Flat,
    /// One vertex per grid point, triangles by index.
    #[default]
    Indexed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegenerateNormals {
    /// Keep the NaN the estimator produces at singular points.
    Propagate,
    /// Replace non-finite normals with the zero vector.
    #[default]
    Zero,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationConfig {
    pub step: f64,
    pub delta: f64,
    pub mode: TessellationMode,
    pub degenerate_normals: DegenerateNormals,
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            step: 5.0,
            delta: DEFAULT_DELTA,
            mode: TessellationMode::Indexed,
            degenerate_normals: DegenerateNormals::Zero,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamDomain {
    pub u: (f64, f64),
    pub v: (f64, f64),
}

impl Default for ParamDomain {
    fn default() -> Self {
        Self {
            u: (0.0, 360.0),
            v: (-180.0, 180.0),
        }
    }
}

/// Number of grid lines along one axis, both bounds included when the
/// step divides the range. A reversed range yields a single line. Counts
/// too large for `usize` saturate.
pub fn sample_count(range: (f64, f64), step: f64) -> usize {
    let span = range.1 - range.0;
    if span <= 0.0 {
        return 1;
    }
    ((span / step + GRID_EPSILON).floor() as usize).saturating_add(1)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSize {
    pub u_samples: usize,
    pub v_samples: usize,
}

impl GridSize {
    pub fn new(domain: &ParamDomain, step: f64) -> Self {
        Self {
            u_samples: sample_count(domain.u, step),
            v_samples: sample_count(domain.v, step),
        }
    }

    pub fn cells(&self) -> usize {
        (self.u_samples - 1) * (self.v_samples - 1)
    }
}

pub struct Tessellator {
    config: TessellationConfig,
    estimator: NormalEstimator,
}

impl Tessellator {
    /// # Panics
    ///
    /// If `step` or `delta` is not a positive finite number. Values coming
    /// from users go through `config::validate` first.
    pub fn new(config: TessellationConfig) -> Self {
        assert!(
            config.step.is_finite() && config.step > 0.0,
            "tessellation step must be positive, got {}",
            config.step
        );
        assert!(
            config.delta.is_finite() && config.delta > 0.0,
            "finite-difference delta must be positive, got {}",
            config.delta
        );

        Self {
            config,
            estimator: NormalEstimator::new(config.delta),
        }
    }

    pub fn config(&self) -> &TessellationConfig {
        &self.config
    }

    pub fn tessellate<S>(&self, surface: &S, domain: &ParamDomain) -> TriangleMesh
    where
        S: SurfaceEquation + ?Sized,
    {
        let grid = GridSize::new(domain, self.config.step);
        let samples = self.sample_grid(surface, domain, grid);

        let mesh = match self.config.mode {
            TessellationMode::Flat => self.emit_flat(&samples, grid),
            TessellationMode::Indexed => self.emit_indexed(&samples, grid),
        };

        debug!(
            u_samples = grid.u_samples,
            v_samples = grid.v_samples,
            triangles = mesh.triangle_count(),
            mode = ?self.config.mode,
            "tessellated surface"
        );

        mesh
    }

    /// Every grid point is evaluated once, row-major with rows along u.
    fn sample_grid<S>(&self, surface: &S, domain: &ParamDomain, grid: GridSize) -> Vec<(DVec3, DVec3)>
    where
        S: SurfaceEquation + ?Sized,
    {
        let step = self.config.step;
        let mut samples = Vec::with_capacity(grid.u_samples * grid.v_samples);

        for i in 0..grid.u_samples {
            let u = domain.u.0 + i as f64 * step;
            for j in 0..grid.v_samples {
                let v = domain.v.0 + j as f64 * step;

                let point = surface.point(u, v);
                let normal = self.estimator.estimate(surface, u, v);
                samples.push((point, self.guard(normal)));
            }
        }

        samples
    }

    fn guard(&self, normal: DVec3) -> DVec3 {
        match self.config.degenerate_normals {
            DegenerateNormals::Zero if !normal.is_finite() => DVec3::ZERO,
            _ => normal,
        }
    }

    fn emit_flat(&self, samples: &[(DVec3, DVec3)], grid: GridSize) -> TriangleMesh {
        let floats = grid.cells() * 2 * 3 * 3;
        let mut vertices = Vec::with_capacity(floats);
        let mut normals = Vec::with_capacity(floats);

        let at = |i: usize, j: usize| samples[i * grid.v_samples + j];

        for i in 0..grid.u_samples - 1 {
            for j in 0..grid.v_samples - 1 {
                let c00 = at(i, j);
                let c10 = at(i + 1, j);
                let c01 = at(i, j + 1);
                let c11 = at(i + 1, j + 1);

                for (point, normal) in [c00, c10, c01, c01, c10, c11] {
                    push_vec3(&mut vertices, point);
                    push_vec3(&mut normals, normal);
                }
            }
        }

        TriangleMesh {
            vertices,
            normals,
            indices: None,
        }
    }

    fn emit_indexed(&self, samples: &[(DVec3, DVec3)], grid: GridSize) -> TriangleMesh {
        let mut vertices = Vec::with_capacity(samples.len() * 3);
        let mut normals = Vec::with_capacity(samples.len() * 3);

        for &(point, normal) in samples {
            push_vec3(&mut vertices, point);
            push_vec3(&mut normals, normal);
        }

        let width = grid.v_samples - 1;
        let mut indices = Vec::with_capacity(grid.cells() * 6);

        for row in 0..grid.u_samples - 1 {
            for col in 0..width {
                let idx = (row * (width + 1) + col) as u32;
                let w = width as u32;

                indices.extend_from_slice(&[idx, idx + w + 1, idx + 1]);
                indices.extend_from_slice(&[idx + 1, idx + w + 1, idx + w + 2]);
            }
        }

        TriangleMesh {
            vertices,
            normals,
            indices: Some(indices),
        }
    }
}

#[inline]
fn push_vec3(out: &mut Vec<f32>, v: DVec3) {
    out.push(v.x as f32);
    out.push(v.y as f32);
    out.push(v.z as f32);
}
