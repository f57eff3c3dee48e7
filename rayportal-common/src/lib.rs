pub mod config;
pub mod direction;
pub mod render_params;
pub mod snapshot;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{GameConfig, DisplayConfig, RenderConfig, PlayerConfig, WorldConfig, PortalPairConfig, PortalEndConfig, RunConfig, InputMode, ScriptStep, OutputConfig};
pub use direction::CardinalDirection;
pub use render_params::RenderParams;
pub use snapshot::TickSnapshot;
pub use vecmath::{Vec2, cell_compensation};
