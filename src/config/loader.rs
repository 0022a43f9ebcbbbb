//! TOML config file loading and creation.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::schema::AppConfig;
use crate::config::validation;
use crate::error::ConfigError;

/// Load config from a specific TOML file path.
///
/// Missing fields take their defaults. If the parsed config fails
/// validation, a warning is logged and the default config is returned.
pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;

    if let Err(e) = validation::validate(&config) {
        warn!("{e}");
        warn!("falling back to default config");
        return Ok(AppConfig::default());
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform config directory, writing a commented
/// default file on first run.
pub fn load_default() -> Result<AppConfig, ConfigError> {
    let path = default_config_path()?;

    if !path.exists() {
        info!("no config found at {}, creating default", path.display());
        create_default_config(&path)?;
        return Ok(AppConfig::default());
    }

    load_from_path(&path)
}

/// Explicit path when given, the platform default otherwise.
pub fn load(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => load_from_path(path),
        None => load_default(),
    }
}

/// `~/.config/conch3d/config.toml` on Linux, the platform equivalent elsewhere.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::Parse("could not determine config directory".into()))?;
    Ok(config_dir.join("conch3d").join("config.toml"))
}

pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, DEFAULT_CONFIG_TOML)?;
    info!("created default config at {}", path.display());
    Ok(())
}

const DEFAULT_CONFIG_TOML: &str = r#"# conch3d configuration
# Only override what you want to change -- missing fields use defaults.

[surface]
# kind = "conch"          # conch | sphere | torus | mobius
# unit = "degrees"        # degrees | radians
# a = 0.25
# b = 0.25
# c = 0.125
# domain = { u = [0.0, 360.0], v = [-180.0, 180.0] }

[tessellation]
# step = 5.0              # grid spacing, in surface units
# delta = 0.001           # finite-difference step for normals
# mode = "indexed"        # indexed | flat
# degenerate_normals = "zero"   # zero | propagate

[lighting]
# position = [-2.0, 2.0, 2.0]
# direction = [1.0, -1.0, -1.0]
# range = 35.0            # cone half-angle, degrees
# focus = 2.0             # falloff exponent
# ambient = 0.2
# color = [1.0, 1.0, 0.0, 1.0]

[viewer]
# width = 1280
# height = 800
# vsync = true
# background = [1.0, 1.0, 1.0, 1.0]
# show_panel = true
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tessellator::TessellationMode;

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(
            load_from_path(&path),
            Err(ConfigError::FileNotFound(p)) if p == path
        ));
    }

    #[test]
    fn loads_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tessellation]\nstep = 10.0\nmode = \"flat\"\n").unwrap();

        let config = load_from_path(&path).unwrap();
        assert_eq!(config.tessellation.step, 10.0);
        assert_eq!(config.tessellation.mode, TessellationMode::Flat);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tessellation]\nstep = -3.0\n").unwrap();

        assert_eq!(load_from_path(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tessellation\nstep = ").unwrap();

        assert!(matches!(load_from_path(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn default_template_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        create_default_config(&path).unwrap();

        assert_eq!(load(Some(&path)).unwrap(), AppConfig::default());
    }
}
