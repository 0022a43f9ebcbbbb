use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use conch3d::math::TessellationMode;

/// Conch 3D - tessellates parametric surfaces and renders them with a spotlight.
#[derive(Parser, Debug)]
#[command(name = "conch3d", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Start from a named surface preset, e.g. "Torus".
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Parameter step, in the surface's angle unit.
    #[arg(short, long)]
    pub step: Option<f64>,

    /// Mesh layout.
    #[arg(short, long, value_enum)]
    pub mode: Option<MeshMode>,

    /// Tessellate once, log the mesh statistics and exit without a window.
    #[arg(long)]
    pub headless: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshMode {
    Flat,
    Indexed,
}

impl From<MeshMode> for TessellationMode {
    fn from(mode: MeshMode) -> Self {
        match mode {
            MeshMode::Flat => TessellationMode::Flat,
            MeshMode::Indexed => TessellationMode::Indexed,
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = Args::try_parse_from([
            "conch3d", "--preset", "torus", "--step", "2.5", "--mode", "flat", "--headless",
        ])
        .unwrap();
        assert_eq!(args.preset.as_deref(), Some("torus"));
        assert_eq!(args.step, Some(2.5));
        assert_eq!(args.mode, Some(MeshMode::Flat));
        assert!(args.headless);
        assert!(args.config.is_none());
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(Args::try_parse_from(["conch3d", "--mode", "strip"]).is_err());
    }

    #[test]
    fn mode_maps_to_tessellation() {
        assert_eq!(TessellationMode::from(MeshMode::Indexed), TessellationMode::Indexed);
    }
}
