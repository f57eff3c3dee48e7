use crate::dispatcher::{FrameBuffer, FrameDispatcher, FrameReport};
use crate::input::{InputSource, Intent, Momentum};
use crate::player::{Movement, Player};
use crate::world::World;
use anyhow::{Context, Result};
use log::{debug, info};
use rayportal_common::{GameConfig, RenderParams, TickSnapshot};
use std::sync::Arc;
use std::time::Instant;

/// Drives one game: input, movement and rendering, one tick at a time.
///
/// Movement always finishes before the render pass starts, and the render
/// pass only reads the world and a copy of the camera.
pub struct PortalGame {
    /// The configuration the game was built from.
    pub config: GameConfig,
    params: RenderParams,
    world: Arc<World>,
    player: Player,
    momentum: Momentum,
    input: InputSource,
    dispatcher: FrameDispatcher,
    frame: FrameBuffer,
    /// Ticks completed so far.
    current_tick: u64,
    teleports: u32,
    last_movement: Movement,
    last_report: FrameReport,
    last_render_ms: f64,
    /// Snapshots collected by `record_snapshot`.
    recorded_snapshots: Vec<TickSnapshot>,
}

impl PortalGame {
    /// Builds the world, places the player and starts the render workers.
    /// The first frame is rendered immediately so `frame()` is never blank.
    pub fn new(config: GameConfig) -> Result<Self> {
        let params = config.get_render_params();
        let world = Arc::new(World::from_config(&config).context("Failed to build world")?);
        let player = Player::from_config(world.clone(), &config.player)?;
        let dispatcher = FrameDispatcher::new(world.clone(), &params)?;
        let frame = FrameBuffer::new(params.width, params.height);

        let mut game = Self {
            momentum: Momentum::new(&config.run),
            input: InputSource::from_config(&config.run),
            config,
            params,
            world,
            player,
            dispatcher,
            frame,
            current_tick: 0,
            teleports: 0,
            last_movement: Movement::Still,
            last_report: FrameReport::default(),
            last_render_ms: 0.0,
            recorded_snapshots: Vec::new(),
        };
        game.render()?;
        Ok(game)
    }

    /// Advances one tick using the configured input source.
    pub fn tick(&mut self) -> Result<()> {
        let intent = self.input.next_intent();
        self.tick_with(intent)
    }

    /// Advances one tick with an explicit intent: accelerate, move, turn,
    /// damp, then render.
    pub fn tick_with(&mut self, intent: Intent) -> Result<()> {
        let (speed, degrees) = self.momentum.accelerate(intent);
        self.last_movement = self.player.advance(speed);
        if let Movement::Teleported(portal) = self.last_movement {
            self.teleports += 1;
            debug!(
                "Tick {}: player came out of ({}, {}) {}.",
                self.current_tick + 1, portal.cell_x, portal.cell_y, portal.direction
            );
        }
        self.player.rotate(degrees);
        self.momentum.damp();

        self.render()?;
        self.current_tick += 1;
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let start = Instant::now();
        let camera = self.player.camera();
        self.last_report = self
            .dispatcher
            .render_frame(&camera, &mut self.frame)
            .with_context(|| format!("Render failed at tick {}", self.current_tick))?;
        self.last_render_ms = start.elapsed().as_secs_f64() * 1000.0;
        Ok(())
    }

    /// Records the current player and render state.
    pub fn record_snapshot(&mut self) {
        let position = self.player.position();
        let heading = self.player.heading();
        self.recorded_snapshots.push(TickSnapshot {
            tick: self.current_tick,
            position_x: position.x,
            position_y: position.y,
            heading_x: heading.x,
            heading_y: heading.y,
            movement: self.last_movement.label().to_string(),
            teleports: self.teleports,
            deepest_chain: self.last_report.deepest_chain,
            portal_columns: self.last_report.portal_columns,
            render_ms: self.last_render_ms,
        });
    }

    pub fn get_recorded_snapshots(&self) -> &[TickSnapshot] {
        &self.recorded_snapshots
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    pub fn teleports(&self) -> u32 {
        self.teleports
    }

    pub fn last_report(&self) -> FrameReport {
        self.last_report
    }

    pub fn last_render_ms(&self) -> f64 {
        self.last_render_ms
    }

    pub fn log_summary(&self) {
        info!(
            "Tick {} | pos ({:.2}, {:.2}) | {} teleports | deepest chain {} | {} portal columns",
            self.current_tick,
            self.player.position().x,
            self.player.position().y,
            self.teleports,
            self.last_report.deepest_chain,
            self.last_report.portal_columns
        );
    }
}
