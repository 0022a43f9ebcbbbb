//! Parametric surface tessellation and the conch3d viewer's shared types.

pub mod config;
pub mod error;
pub mod math;

pub use error::{ConfigError, MeshError, ViewerError};
pub use math::{
    AngleUnit, ConchSurface, DegenerateNormals, NormalEstimator, ParamDomain, SurfaceEquation,
    TessellationConfig, TessellationMode, Tessellator, TriangleMesh,
};
