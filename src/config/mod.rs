pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{default_config_path, load, load_default, load_from_path};
pub use schema::{AppConfig, LightingConfig, SurfaceConfig, ViewerConfig};
pub use validation::validate;
