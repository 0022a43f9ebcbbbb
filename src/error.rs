use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    Parse(String),

    #[error("config validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Broken buffer-upload contract between the tessellator and the renderer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    #[error("vertex/normal length mismatch: {vertices} positions vs {normals} normals")]
    LengthMismatch { vertices: usize, normals: usize },

    #[error("buffer length {0} is not a multiple of 3")]
    NotTriples(usize),

    #[error("index {index} at position {position} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        index: u32,
        position: usize,
        vertex_count: usize,
    },

    #[error("{0} trailing entries do not form a whole triangle")]
    PartialTriangle(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter found")]
    NoAdapter,

    #[error("failed to acquire GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::Validation("tessellation.step must be > 0".into());
        assert_eq!(
            err.to_string(),
            "config validation error: tessellation.step must be > 0"
        );
    }

    #[test]
    fn mesh_error_display() {
        let err = MeshError::IndexOutOfRange {
            index: 9,
            position: 4,
            vertex_count: 4,
        };
        assert_eq!(
            err.to_string(),
            "index 9 at position 4 out of range for 4 vertices"
        );
    }

    #[test]
    fn viewer_error_from_config() {
        let err: ViewerError = ConfigError::Parse("bad".into()).into();
        assert!(matches!(err, ViewerError::Config(ConfigError::Parse(_))));
    }
}
