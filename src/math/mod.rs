pub mod engine;
pub mod mesh;
pub mod normal;
pub mod presets;
pub mod surface;
pub mod tessellator;

pub use engine::{MeshEngine, MeshRequest, MeshResult, SurfaceMesh};
pub use mesh::TriangleMesh;
pub use normal::NormalEstimator;
pub use presets::SURFACE_PRESETS;
pub use surface::{AngleUnit, ConchSurface, SurfaceEquation, SurfaceKind, deg2rad};
pub use tessellator::{
    DegenerateNormals, GridSize, ParamDomain, TessellationConfig, TessellationMode, Tessellator,
};
