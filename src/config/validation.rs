//! Range checks for everything that reaches the tessellator or the GPU.

use crate::config::schema::AppConfig;
use crate::error::ConfigError;
use crate::math::tessellator::{ParamDomain, TessellationConfig, sample_count};

/// Upper bound on grid points so one mesh fits the renderer's buffers.
pub const MAX_GRID_POINTS: usize = 1_000_000;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    check_tessellation(&mut errors, &config.tessellation, &config.surface.domain);

    for (name, value) in [
        ("surface.a", config.surface.a),
        ("surface.b", config.surface.b),
        ("surface.c", config.surface.c),
    ] {
        if !value.is_finite() {
            errors.push(format!("{name} must be finite, got {value}"));
        }
    }

    let lighting = &config.lighting;
    validate_range_f32(&mut errors, "lighting.range", lighting.range, 0.5, 180.0);
    validate_range_f32(&mut errors, "lighting.focus", lighting.focus, 0.0, 128.0);
    validate_range_f32(&mut errors, "lighting.ambient", lighting.ambient, 0.0, 1.0);
    if lighting.direction.iter().all(|c| *c == 0.0) {
        errors.push("lighting.direction must not be the zero vector".into());
    }
    if lighting.position.iter().any(|c| !c.is_finite()) {
        errors.push("lighting.position must be finite".into());
    }
    for (i, c) in lighting.color.iter().enumerate() {
        validate_range_f32(&mut errors, &format!("lighting.color[{i}]"), *c, 0.0, 1.0);
    }

    let viewer = &config.viewer;
    if viewer.width == 0 || viewer.height == 0 {
        errors.push(format!(
            "viewer size must be non-zero, got {}x{}",
            viewer.width, viewer.height
        ));
    }

    finish(errors)
}

/// The subset of `validate` that guards a single tessellation request.
pub fn validate_request(
    tessellation: &TessellationConfig,
    domain: &ParamDomain,
) -> Result<(), ConfigError> {
    let mut errors = Vec::new();
    check_tessellation(&mut errors, tessellation, domain);
    finish(errors)
}

fn check_tessellation(errors: &mut Vec<String>, config: &TessellationConfig, domain: &ParamDomain) {
    let step_ok = config.step.is_finite() && config.step > 0.0;
    if !step_ok {
        errors.push(format!(
            "tessellation.step must be a positive number, got {}",
            config.step
        ));
    }
    if !(config.delta.is_finite() && config.delta > 0.0) {
        errors.push(format!(
            "tessellation.delta must be a positive number, got {}",
            config.delta
        ));
    } else if step_ok && config.delta >= config.step {
        errors.push(format!(
            "tessellation.delta ({}) must be smaller than tessellation.step ({})",
            config.delta, config.step
        ));
    }

    for (name, (min, max)) in [("surface.domain.u", domain.u), ("surface.domain.v", domain.v)] {
        if !(min.is_finite() && max.is_finite()) {
            errors.push(format!("{name} bounds must be finite"));
        } else if min >= max {
            errors.push(format!("{name} is empty: [{min}, {max}]"));
        }
    }

    if step_ok && errors.is_empty() {
        let points = sample_count(domain.u, config.step)
            .checked_mul(sample_count(domain.v, config.step))
            .filter(|&points| points <= MAX_GRID_POINTS);
        if points.is_none() {
            errors.push(format!(
                "tessellation.step {} yields more than {MAX_GRID_POINTS} grid points",
                config.step
            ));
        }
    }
}

fn validate_range_f32(errors: &mut Vec<String>, name: &str, value: f32, min: f32, max: f32) {
    if !(min..=max).contains(&value) {
        errors.push(format!("{name} must be between {min} and {max}, got {value}"));
    }
}

fn finish(errors: Vec<String>) -> Result<(), ConfigError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn rejects_non_positive_step() {
        let mut config = AppConfig::default();
        config.tessellation.step = 0.0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("tessellation.step"), "{err}");
    }

    #[test]
    fn rejects_nan_delta() {
        let mut config = AppConfig::default();
        config.tessellation.delta = f64::NAN;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn rejects_delta_as_large_as_step() {
        let mut config = AppConfig::default();
        config.tessellation.delta = 5.0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("smaller than"), "{err}");
    }

    #[test]
    fn rejects_empty_domain() {
        let domain = ParamDomain {
            u: (1.0, 1.0),
            v: (0.0, 1.0),
        };
        let err = validate_request(&TessellationConfig::default(), &domain)
            .unwrap_err()
            .to_string();
        assert!(err.contains("surface.domain.u"), "{err}");
    }

    #[test]
    fn rejects_oversized_grid() {
        let tessellation = TessellationConfig {
            step: 0.1,
            delta: 0.001,
            ..TessellationConfig::default()
        };
        // 3601 x 3601 samples.
        let err = validate_request(&tessellation, &ParamDomain::default())
            .unwrap_err()
            .to_string();
        assert!(err.contains("grid points"), "{err}");
    }

    #[test]
    fn tiny_step_is_an_error_not_an_overflow() {
        for step in [1e-12, 1e-300] {
            let tessellation = TessellationConfig {
                step,
                delta: step / 10.0,
                ..TessellationConfig::default()
            };
            let err = validate_request(&tessellation, &ParamDomain::default())
                .unwrap_err()
                .to_string();
            assert!(err.contains("grid points"), "{err}");
        }
    }

    #[test]
    fn collects_every_error() {
        let mut config = AppConfig::default();
        config.tessellation.step = -1.0;
        config.lighting.ambient = 2.0;
        config.viewer.width = 0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("tessellation.step"));
        assert!(err.contains("lighting.ambient"));
        assert!(err.contains("viewer size"));
    }
}
