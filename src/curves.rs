/// A function over [0, 1] sampled at `resolution + 1` evenly spaced points.
///
/// Tables are filled completely when they are built and only read afterwards,
/// so render workers can share them without synchronisation.
#[derive(Debug, Clone)]
pub struct CurveTable {
    samples: Vec<f64>,
    resolution: usize,
}

impl CurveTable {
    pub fn build(resolution: usize, f: impl Fn(f64) -> f64) -> Self {
        let resolution = resolution.max(1);
        let samples = (0..=resolution).map(|i| f(i as f64 / resolution as f64)).collect();
        Self { samples, resolution }
    }

    /// Nearest lower sample at `t`; inputs outside [0, 1] are clamped.
    #[inline(always)]
    pub fn sample(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let idx = ((t * self.resolution as f64) as usize).min(self.resolution);
        self.samples[idx]
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }
}

/// Half-height of a unit-diameter circle, `sqrt(0.25 - (t - 0.5)^2)`.
pub fn half_circle(t: f64) -> f64 {
    (0.25 - (t - 0.5).powi(2)).max(0.0).sqrt()
}

/// Edge darkening weight, 1 at both ends of a wall span and ~0 in the middle.
pub fn edge_falloff(t: f64) -> f64 {
    ((t - 0.5) / 0.5).powi(10)
}

/// The two lookup curves the column renderer needs.
#[derive(Debug, Clone)]
pub struct Curves {
    pub half_circle: CurveTable,
    pub ssao: CurveTable,
}

impl Curves {
    pub fn new(half_circle_resolution: usize, ssao_resolution: usize) -> Self {
        Self {
            half_circle: CurveTable::build(half_circle_resolution, half_circle),
            ssao: CurveTable::build(ssao_resolution, edge_falloff),
        }
    }
}
