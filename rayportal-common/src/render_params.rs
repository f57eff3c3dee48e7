use serde::{Deserialize, Serialize};

/// Render parameters derived from the configuration, read by every render worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderParams {
    // Frame buffer
    pub width: usize,
    pub height: usize,

    // Ray casting
    pub max_portal_depth: usize,
    pub worker_threads: usize, // 0: one per available core

    // Shading
    pub ssao_strength: f64,
    pub half_circle_resolution: usize,
    pub ssao_resolution: usize,
}
