use glam::DVec3;

use crate::math::surface::SurfaceEquation;

pub const DEFAULT_DELTA: f64 = 0.001;

/// Forward finite-difference normals.
///
/// `delta` is in the surface's own parameter units (degrees for the default
/// conch). Too large and the normal leans toward the +u/+v side of the
/// sample; too small and the differences cancel out in floating point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalEstimator {
    pub delta: f64,
}

impl Default for NormalEstimator {
    fn default() -> Self {
        Self {
            delta: DEFAULT_DELTA,
        }
    }
}

impl NormalEstimator {
    pub fn new(delta: f64) -> Self {
        Self { delta }
    }

    /// Approximate (dP/du, dP/dv) at (u, v).
    pub fn partials<S>(&self, surface: &S, u: f64, v: f64) -> (DVec3, DVec3)
    where
        S: SurfaceEquation + ?Sized,
    {
        let p = surface.point(u, v);
        let pu = surface.point(u + self.delta, v);
        let pv = surface.point(u, v + self.delta);

        ((pu - p) / self.delta, (pv - p) / self.delta)
    }

    /// Unit normal, or NaN components where the partials are parallel or
    /// vanish (the conch apex at u = 0, sphere poles).
    pub fn estimate<S>(&self, surface: &S, u: f64, v: f64) -> DVec3
    where
        S: SurfaceEquation + ?Sized,
    {
        let (du, dv) = self.partials(surface, u, v);
        du.cross(dv).normalize()
    }

    pub fn try_estimate<S>(&self, surface: &S, u: f64, v: f64) -> Option<DVec3>
    where
        S: SurfaceEquation + ?Sized,
    {
        let (du, dv) = self.partials(surface, u, v);
        du.cross(dv).try_normalize()
    }
}
