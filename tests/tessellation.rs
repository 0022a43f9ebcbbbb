use conch3d::math::engine::build_mesh;
use conch3d::math::presets::SURFACE_PRESETS;
use conch3d::math::{
    AngleUnit, ConchSurface, DegenerateNormals, MeshRequest, ParamDomain, SurfaceKind,
    TessellationConfig, TessellationMode, Tessellator, TriangleMesh,
};
use glam::Vec3;

fn tessellator(step: f64, mode: TessellationMode) -> Tessellator {
    Tessellator::new(TessellationConfig {
        step,
        mode,
        ..TessellationConfig::default()
    })
}

fn conch_mesh(step: f64, mode: TessellationMode) -> TriangleMesh {
    tessellator(step, mode).tessellate(&ConchSurface::default(), &ParamDomain::default())
}

fn triangle_positions(mesh: &TriangleMesh) -> Vec<[Vec3; 3]> {
    mesh.triangles()
        .map(|[a, b, c]| [mesh.position(a), mesh.position(b), mesh.position(c)])
        .collect()
}

#[test]
fn default_conch_has_expected_size() {
    let flat = conch_mesh(5.0, TessellationMode::Flat);
    assert_eq!(flat.triangle_count(), 72 * 72 * 2);
    assert_eq!(flat.triangle_count(), 10368);
    assert_eq!(flat.vertex_count(), 31104);
    assert_eq!(flat.normals.len(), flat.vertices.len());
    assert!(flat.indices.is_none());

    let indexed = conch_mesh(5.0, TessellationMode::Indexed);
    assert_eq!(indexed.vertex_count(), 73 * 73);
    assert_eq!(indexed.triangle_count(), 10368);
    assert!(indexed.indices_u16().is_some());
    indexed.validate().unwrap();
}

#[test]
fn flat_and_indexed_describe_the_same_triangles() {
    let flat = triangle_positions(&conch_mesh(10.0, TessellationMode::Flat));
    let indexed = triangle_positions(&conch_mesh(10.0, TessellationMode::Indexed));

    assert_eq!(flat.len(), indexed.len());
    for (i, (f, x)) in flat.iter().zip(&indexed).enumerate() {
        assert_eq!(f, x, "triangle {i} differs");
    }
}

#[test]
fn flat_and_indexed_share_normals() {
    let flat = conch_mesh(15.0, TessellationMode::Flat);
    let indexed = conch_mesh(15.0, TessellationMode::Indexed);

    for (tf, ti) in flat.triangles().zip(indexed.triangles()) {
        for k in 0..3 {
            assert_eq!(flat.normal(tf[k]), indexed.normal(ti[k]));
        }
    }
}

#[test]
fn tessellation_is_deterministic() {
    let first = conch_mesh(7.5, TessellationMode::Indexed);
    let second = conch_mesh(7.5, TessellationMode::Indexed);
    assert_eq!(first, second);
}

#[test]
fn normals_are_unit_or_zero() {
    let mesh = conch_mesh(5.0, TessellationMode::Indexed);
    let mut zero = 0;
    for i in 0..mesh.vertex_count() {
        let n = mesh.normal(i);
        assert!(n.is_finite(), "vertex {i} has non-finite normal");
        if n == Vec3::ZERO {
            zero += 1;
        } else {
            assert!((n.length() - 1.0).abs() < 1e-4, "vertex {i}: |n| = {}", n.length());
        }
    }
    // The apex row u = 0 collapses to a point.
    assert_eq!(zero, 73);
}

#[test]
fn propagate_keeps_nan_at_apex() {
    let mesh = Tessellator::new(TessellationConfig {
        step: 30.0,
        degenerate_normals: DegenerateNormals::Propagate,
        ..TessellationConfig::default()
    })
    .tessellate(&ConchSurface::default(), &ParamDomain::default());

    assert!(mesh.normal(0).is_nan());
    assert!(mesh.position(0).abs_diff_eq(Vec3::ZERO, 1e-6));
}

/// Each face normal must agree with the estimated normals at its corners.
fn assert_consistent_winding(mesh: &TriangleMesh) {
    let mut checked = 0;
    for tri in mesh.triangles() {
        let [p0, p1, p2] = tri.map(|i| mesh.position(i));
        let face = (p1 - p0).cross(p2 - p0);
        if face.length() < 1e-6 {
            continue;
        }
        let corners: Vec3 = tri.iter().map(|&i| mesh.normal(i)).sum();
        if !corners.is_finite() || tri.iter().any(|&i| mesh.normal(i) == Vec3::ZERO) {
            continue;
        }
        assert!(face.dot(corners) > 0.0, "triangle {tri:?} winds against its normals");
        checked += 1;
    }
    assert!(checked > 0);
}

#[test]
fn torus_winding_matches_normals() {
    let request = MeshRequest {
        kind: SurfaceKind::Torus,
        unit: AngleUnit::Degrees,
        scale: (1.0, 0.35, 0.0),
        domain: ParamDomain {
            u: (0.0, 360.0),
            v: (0.0, 360.0),
        },
        tessellation: TessellationConfig {
            step: 15.0,
            ..TessellationConfig::default()
        },
    };
    let surface = build_mesh(request).unwrap();
    assert_consistent_winding(&surface.mesh);
}

#[test]
fn conch_winding_matches_normals() {
    assert_consistent_winding(&conch_mesh(10.0, TessellationMode::Flat));
    assert_consistent_winding(&conch_mesh(10.0, TessellationMode::Indexed));
}

#[test]
fn radian_domain_matches_degree_domain() {
    let degrees = conch_mesh(10.0, TessellationMode::Indexed);

    let radians = tessellator(10.0_f64.to_radians(), TessellationMode::Indexed).tessellate(
        &ConchSurface {
            unit: AngleUnit::Radians,
            ..ConchSurface::default()
        },
        &ParamDomain {
            u: (0.0, 360.0_f64.to_radians()),
            v: (-180.0_f64.to_radians(), 180.0_f64.to_radians()),
        },
    );

    assert_eq!(degrees.vertex_count(), radians.vertex_count());
    for i in 0..degrees.vertex_count() {
        assert!(degrees.position(i).abs_diff_eq(radians.position(i), 1e-4));
    }
}

#[test]
fn radian_preset_grid() {
    let mesh = tessellator(0.1, TessellationMode::Flat).tessellate(
        &ConchSurface {
            unit: AngleUnit::Radians,
            ..ConchSurface::default()
        },
        &ParamDomain {
            u: (0.0, 2.0 * std::f64::consts::PI),
            v: (-std::f64::consts::PI, std::f64::consts::PI),
        },
    );
    // 63 samples per axis; the last line stops short of 2π.
    assert_eq!(mesh.triangle_count(), 62 * 62 * 2);
    assert!(mesh.vertices.iter().all(|c| c.is_finite()));
}

#[test]
fn single_row_domain_is_empty() {
    let mesh = tessellator(5.0, TessellationMode::Indexed).tessellate(
        &ConchSurface::default(),
        &ParamDomain {
            u: (0.0, 360.0),
            v: (10.0, 10.0),
        },
    );
    assert_eq!(mesh.triangle_count(), 0);
    assert_eq!(mesh.vertex_count(), 73);
    mesh.validate().unwrap();
}

#[test]
fn every_preset_builds() {
    for preset in SURFACE_PRESETS {
        let request = MeshRequest {
            kind: preset.kind,
            unit: preset.unit,
            scale: preset.scale,
            domain: preset.domain,
            tessellation: TessellationConfig {
                step: preset.step,
                ..TessellationConfig::default()
            },
        };
        let surface = build_mesh(request).unwrap_or_else(|e| panic!("{}: {e}", preset.name));
        assert!(surface.mesh.triangle_count() > 0, "{}", preset.name);
        assert!(surface.bounds.is_some(), "{}", preset.name);
    }
}

#[test]
fn oversized_grid_is_rejected() {
    let request = MeshRequest {
        kind: SurfaceKind::Conch,
        unit: AngleUnit::Degrees,
        scale: (0.25, 0.25, 0.125),
        domain: ParamDomain::default(),
        tessellation: TessellationConfig {
            step: 0.01,
            ..TessellationConfig::default()
        },
    };
    assert!(build_mesh(request).is_err());
}
