pub mod panels;
pub mod state;
pub mod theme;

pub use panels::{UiActions, draw_help_overlay, draw_side_panel};
pub use state::{MeshStats, UiState};
pub use theme::apply_theme;
