use crate::renderer::ColumnRenderer;
use crate::traverser::PortalTraverser;
use crate::world::World;
use anyhow::Result;
use log::{debug, trace};
use rayon::prelude::*;
use rayportal_common::{RenderParams, Vec2};
use std::sync::Arc;

/// Caller-owned pixel buffer, packed `0xAARRGGBB`, row-major
/// (`pixels[y * width + x]`).
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline(always)]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }
}

/// Eye of the renderer: where the player stands, where it looks and the
/// camera plane that spreads the columns across the field of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec2,
    pub heading: Vec2,
    pub plane: Vec2,
}

impl Camera {
    /// Ray direction for screen column `x`: the left edge looks along
    /// `heading - plane`, the right edge along `heading + plane`.
    #[inline(always)]
    pub fn ray_direction(&self, x: usize, width: usize) -> Vec2 {
        let camera_x = 2.0 * x as f64 / width as f64 - 1.0;
        self.heading + self.plane * camera_x
    }
}

/// Per-frame statistics gathered while casting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Longest ray chain of any column.
    pub deepest_chain: usize,
    /// Columns that looked through at least one portal.
    pub portal_columns: usize,
}

impl FrameReport {
    fn merge(self, other: FrameReport) -> FrameReport {
        FrameReport {
            deepest_chain: self.deepest_chain.max(other.deepest_chain),
            portal_columns: self.portal_columns + other.portal_columns,
        }
    }
}

/// Renders frames on a fixed pool of workers.
///
/// Screen columns are split into one contiguous range per worker. Workers
/// write into a column-major staging buffer, so each column is a disjoint
/// slice; the finished frame is transposed into the caller's buffer only
/// when every column succeeded.
pub struct FrameDispatcher {
    world: Arc<World>,
    renderer: ColumnRenderer,
    pool: rayon::ThreadPool,
    width: usize,
    height: usize,
    max_portal_depth: usize,
    columns_per_worker: usize,
    staging: Vec<u32>,
}

impl FrameDispatcher {
    /// Creates the worker pool and curve tables once; both are reused for
    /// every frame.
    pub fn new(world: Arc<World>, params: &RenderParams) -> Result<Self> {
        if params.width == 0 || params.height == 0 {
            anyhow::bail!("frame dimensions must be positive, got {}x{}.", params.width, params.height);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(params.worker_threads)
            .thread_name(|idx| format!("render-{}", idx))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to start render workers: {}", e))?;

        let workers = pool.current_num_threads().max(1);
        let columns_per_worker = params.width.div_ceil(workers);
        debug!(
            "Render pool: {} workers, {} columns each, {}x{} frame.",
            workers, columns_per_worker, params.width, params.height
        );

        Ok(Self {
            world,
            renderer: ColumnRenderer::new(params),
            pool,
            width: params.width,
            height: params.height,
            max_portal_depth: params.max_portal_depth,
            columns_per_worker,
            staging: vec![0; params.width * params.height],
        })
    }

    pub fn worker_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Casts and paints every column, blocking until all workers are done.
    ///
    /// On error the first failure is returned and `frame` is left as it was.
    pub fn render_frame(&mut self, camera: &Camera, frame: &mut FrameBuffer) -> Result<FrameReport> {
        if frame.width != self.width || frame.height != self.height {
            anyhow::bail!(
                "frame buffer is {}x{}, dispatcher renders {}x{}.",
                frame.width, frame.height, self.width, self.height
            );
        }

        let Self { world, renderer, pool, width, height, max_portal_depth, columns_per_worker, staging } = self;
        let (width, height, columns_per_worker) = (*width, *height, *columns_per_worker);
        let traverser = PortalTraverser::new(world.as_ref(), *max_portal_depth);
        let renderer = &*renderer;
        let player_cell = camera.position.cell();

        let report = pool.install(|| {
            let report = staging
                .par_chunks_mut(columns_per_worker * height)
                .enumerate()
                .map(|(chunk_idx, chunk)| {
                    let mut report = FrameReport::default();
                    for (offset, column) in chunk.chunks_mut(height).enumerate() {
                        let x = chunk_idx * columns_per_worker + offset;
                        let direction = camera.ray_direction(x, width);
                        let chain = traverser.cast_column(direction, camera.position, player_cell);
                        renderer.paint_column(&chain, column)?;
                        report.deepest_chain = report.deepest_chain.max(chain.len());
                        if chain.len() > 1 {
                            report.portal_columns += 1;
                        }
                    }
                    Ok::<_, anyhow::Error>(report)
                })
                .try_reduce(FrameReport::default, |a, b| Ok(a.merge(b)))?;

            let staging = &*staging;
            frame
                .pixels
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, pixel) in row.iter_mut().enumerate() {
                        *pixel = staging[x * height + y];
                    }
                });
            Ok::<_, anyhow::Error>(report)
        })?;

        trace!(
            "Frame done: deepest chain {}, {} portal columns.",
            report.deepest_chain, report.portal_columns
        );
        Ok(report)
    }
}
