use serde::{Serialize, Deserialize};

/// Player and render state recorded at a specific tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickSnapshot {
    /// The tick number (0 is the state before any input was applied).
    pub tick: u64,
    pub position_x: f64,
    pub position_y: f64,
    pub heading_x: f64,
    pub heading_y: f64,
    /// Movement outcome of this tick ("still", "walked", "slid", "teleported", "blocked").
    pub movement: String,
    /// Number of portal crossings taken by the player so far.
    pub teleports: u32,
    /// Longest ray chain of the rendered frame.
    pub deepest_chain: usize,
    /// Columns that looked through at least one portal.
    pub portal_columns: usize,
    /// Wall-clock time of the render pass in milliseconds.
    pub render_ms: f64,
}
