//! Portal-aware grid raycaster: world model, ray casting through linked
//! portals, column compositing, parallel frame rendering and player movement.

pub mod caster;
pub mod curves;
pub mod dispatcher;
pub mod game;
pub mod grid;
pub mod input;
pub mod player;
pub mod portal;
pub mod renderer;
pub mod traverser;
pub mod world;

// Re-export the types most callers need
pub use caster::{RayHit, WallCaster};
pub use dispatcher::{Camera, FrameBuffer, FrameDispatcher, FrameReport};
pub use game::PortalGame;
pub use grid::Grid;
pub use input::{InputSource, Intent, Momentum};
pub use player::{Movement, Player};
pub use portal::{Portal, PortalRegistry};
pub use renderer::ColumnRenderer;
pub use traverser::{PortalTraverser, RayChain};
pub use world::{World, WorldBuilder};
