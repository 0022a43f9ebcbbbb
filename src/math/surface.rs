use glam::DVec3;
use serde::{Deserialize, Serialize};

/// A map from the (u, v) parameter plane to points in space.
pub trait SurfaceEquation {
    fn point(&self, u: f64, v: f64) -> DVec3;
}

impl<F> SurfaceEquation for F
where
    F: Fn(f64, f64) -> DVec3,
{
    fn point(&self, u: f64, v: f64) -> DVec3 {
        self(u, v)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

impl AngleUnit {
    #[inline]
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            AngleUnit::Degrees => deg2rad(angle),
            AngleUnit::Radians => angle,
        }
    }
}

#[inline]
pub fn deg2rad(angle: f64) -> f64 {
    angle * std::f64::consts::PI / 180.0
}

/// Spiral shell: the radius grows linearly with the winding angle `u`,
/// `v` sweeps the cross-section.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConchSurface {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub unit: AngleUnit,
}

impl Default for ConchSurface {
    fn default() -> Self {
        Self {
            a: 0.25,
            b: 0.25,
            c: 0.125,
            unit: AngleUnit::Degrees,
        }
    }
}

impl SurfaceEquation for ConchSurface {
    fn point(&self, u: f64, v: f64) -> DVec3 {
        let u = self.unit.to_radians(u);
        let v = self.unit.to_radians(v);

        DVec3::new(
            self.a * u * u.sin() * v.cos(),
            self.b * u * u.cos() * v.cos(),
            -self.c * u * v.sin(),
        )
    }
}

/// u is the polar angle, v the azimuth. Singular at both poles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereSurface {
    pub radius: f64,
    pub unit: AngleUnit,
}

impl SurfaceEquation for SphereSurface {
    fn point(&self, u: f64, v: f64) -> DVec3 {
        let u = self.unit.to_radians(u);
        let v = self.unit.to_radians(v);

        DVec3::new(
            self.radius * u.sin() * v.cos(),
            self.radius * u.sin() * v.sin(),
            self.radius * u.cos(),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TorusSurface {
    pub major: f64,
    pub minor: f64,
    pub unit: AngleUnit,
}

impl SurfaceEquation for TorusSurface {
    fn point(&self, u: f64, v: f64) -> DVec3 {
        let u = self.unit.to_radians(u);
        let v = self.unit.to_radians(v);
        let ring = self.major + self.minor * v.cos();

        DVec3::new(ring * u.cos(), ring * u.sin(), self.minor * v.sin())
    }
}

/// `v` is the signed distance across the strip, never converted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MobiusSurface {
    pub radius: f64,
    pub unit: AngleUnit,
}

impl SurfaceEquation for MobiusSurface {
    fn point(&self, u: f64, v: f64) -> DVec3 {
        let u = self.unit.to_radians(u);
        let half = u / 2.0;
        let ring = self.radius + v * half.cos();

        DVec3::new(ring * u.cos(), ring * u.sin(), v * half.sin())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    #[default]
    Conch,
    Sphere,
    Torus,
    Mobius,
}

impl SurfaceKind {
    pub const ALL: [SurfaceKind; 4] = [
        SurfaceKind::Conch,
        SurfaceKind::Sphere,
        SurfaceKind::Torus,
        SurfaceKind::Mobius,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SurfaceKind::Conch => "Conch",
            SurfaceKind::Sphere => "Sphere",
            SurfaceKind::Torus => "Torus",
            SurfaceKind::Mobius => "Möbius Strip",
        }
    }

    /// Builds the equation. `a`, `b`, `c` are the conch scale constants;
    /// the closed-form shapes reuse them as radii (`a`, and `b` for the
    /// torus tube).
    pub fn build(
        self,
        a: f64,
        b: f64,
        c: f64,
        unit: AngleUnit,
    ) -> Box<dyn SurfaceEquation + Send + Sync> {
        match self {
            SurfaceKind::Conch => Box::new(ConchSurface { a, b, c, unit }),
            SurfaceKind::Sphere => Box::new(SphereSurface { radius: a, unit }),
            SurfaceKind::Torus => Box::new(TorusSurface {
                major: a,
                minor: b,
                unit,
            }),
            SurfaceKind::Mobius => Box::new(MobiusSurface { radius: a, unit }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn deg2rad_matches_std() {
        assert!((deg2rad(180.0) - PI).abs() < 1e-15);
        assert!((deg2rad(90.0) - 90f64.to_radians()).abs() < 1e-15);
        assert_eq!(AngleUnit::Radians.to_radians(1.25), 1.25);
    }

    #[test]
    fn conch_known_points() {
        let conch = ConchSurface::default();

        // u = 90°: sin(u) = 1, cos(u) = 0; v = 0: cos(v) = 1, sin(v) = 0.
        let p = conch.point(90.0, 0.0);
        let r = PI / 2.0;
        assert!((p.x - 0.25 * r).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
        assert!(p.z.abs() < 1e-12);

        // v = 90° collapses x and y onto the axis.
        let p = conch.point(180.0, 90.0);
        assert!(p.x.abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
        assert!((p.z + 0.125 * PI).abs() < 1e-12);
    }

    #[test]
    fn conch_apex_is_origin() {
        let conch = ConchSurface::default();
        for v in [-180.0, -45.0, 0.0, 72.5, 180.0] {
            assert_eq!(conch.point(0.0, v), DVec3::ZERO);
        }
    }

    #[test]
    fn conch_units_agree() {
        let deg = ConchSurface::default();
        let rad = ConchSurface {
            unit: AngleUnit::Radians,
            ..ConchSurface::default()
        };
        let p = deg.point(135.0, -30.0);
        let q = rad.point(deg2rad(135.0), deg2rad(-30.0));
        assert!((p - q).length() < 1e-12);
    }

    #[test]
    fn conch_finite_over_domain() {
        let conch = ConchSurface::default();
        let mut u = 0.0;
        while u <= 360.0 {
            let mut v = -180.0;
            while v <= 180.0 {
                assert!(conch.point(u, v).is_finite(), "non-finite at ({u}, {v})");
                v += 7.5;
            }
            u += 7.5;
        }
    }

    #[test]
    fn closures_are_equations() {
        let plane = |u: f64, v: f64| DVec3::new(u, v, 0.0);
        assert_eq!(plane.point(2.0, 3.0), DVec3::new(2.0, 3.0, 0.0));
    }

    #[test]
    fn built_kinds_are_finite() {
        for kind in SurfaceKind::ALL {
            let surface = kind.build(1.0, 0.4, 0.2, AngleUnit::Radians);
            assert!(surface.point(0.3, 0.2).is_finite(), "{}", kind.label());
        }
    }

    #[test]
    fn torus_stays_on_tube() {
        let torus = TorusSurface {
            major: 2.0,
            minor: 0.5,
            unit: AngleUnit::Radians,
        };
        for (u, v) in [(0.0, 0.0), (1.0, 2.0), (4.0, 5.5)] {
            let p = torus.point(u, v);
            let ring = (p.x * p.x + p.y * p.y).sqrt() - 2.0;
            assert!((ring * ring + p.z * p.z - 0.25).abs() < 1e-12);
        }
    }
}
