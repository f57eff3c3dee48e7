use serde::{Deserialize, Serialize};
use anyhow::Result;
use crate::direction::CardinalDirection;
use crate::render_params::RenderParams;
use std::path::Path;

// Frame buffer dimensions, fixed for the lifetime of a game
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
}

// Ray casting and compositing settings
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RenderConfig {
    #[serde(default = "default_max_portal_depth")]
    pub max_portal_depth: u32,
    /// Render workers; 0 means one per available core.
    #[serde(default)]
    pub worker_threads: usize,
    /// Strength of the wall edge darkening (0 disables it).
    #[serde(default = "default_ssao_strength")]
    pub ssao_strength: f64,
    #[serde(default = "default_half_circle_resolution")]
    pub half_circle_resolution: usize,
    #[serde(default = "default_ssao_resolution")]
    pub ssao_resolution: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            max_portal_depth: default_max_portal_depth(),
            worker_threads: 0,
            ssao_strength: default_ssao_strength(),
            half_circle_resolution: default_half_circle_resolution(),
            ssao_resolution: default_ssao_resolution(),
        }
    }
}

// Initial player state
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PlayerConfig {
    pub position: [f64; 2],
    pub heading: [f64; 2],
    pub camera_plane: [f64; 2],
    /// Multiplier applied to the movement look-ahead used for collision.
    #[serde(default = "default_hitbox_radius")]
    pub hitbox_radius: f64,
}

// Static map, `cells[y][x]`; 0 is passable, anything else is a wall
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct WorldConfig {
    pub cells: Vec<Vec<u8>>,
}

// One end of a portal pair: the wall cell and the face the portal sits on
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct PortalEndConfig {
    pub x: i32,
    pub y: i32,
    pub direction: CardinalDirection,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct PortalPairConfig {
    pub a: PortalEndConfig,
    pub b: PortalEndConfig,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Seeded random walk.
    Wander,
    /// Fixed list of steps, repeated when exhausted.
    Script,
}

/// One scripted input: `thrust` and `turn` are fed to the momentum
/// controller for `repeat` ticks.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ScriptStep {
    #[serde(default)]
    pub thrust: f64,
    #[serde(default)]
    pub turn: f64,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

// Game loop settings, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RunConfig {
    pub ticks: u32,
    #[serde(default = "default_record_interval_ticks")]
    pub record_interval_ticks: u32,
    #[serde(default = "default_input_mode")]
    pub input: InputMode,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub script: Vec<ScriptStep>,
    #[serde(default = "default_move_accel")]
    pub move_accel: f64,
    #[serde(default = "default_turn_accel")]
    pub turn_accel: f64,
    #[serde(default = "default_max_move_speed")]
    pub max_move_speed: f64,
    #[serde(default = "default_max_turn_speed")]
    pub max_turn_speed: f64,
    #[serde(default = "default_damping")]
    pub damping: f64,
}

// Configuration for output settings, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    #[serde(default)]
    pub save_stats: bool,
    pub format: Option<String>, // Output format: "json", "csv"
}

// Main game configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GameConfig {
    pub display: DisplayConfig,
    #[serde(default)]
    pub render: RenderConfig,
    pub player: PlayerConfig,
    pub world: WorldConfig,
    #[serde(default)]
    pub portals: Vec<PortalPairConfig>,
    pub run: RunConfig,
    pub output: OutputConfig,
}

impl GameConfig {
    /// Loads the game configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))
    }

    /// Parses and validates a configuration held in memory.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.display.width == 0 || self.display.height == 0 {
            anyhow::bail!("display width and height must be positive.");
        }
        if self.render.max_portal_depth == 0 {
            anyhow::bail!("max_portal_depth must be at least 1.");
        }
        if self.render.half_circle_resolution == 0 || self.render.ssao_resolution == 0 {
            anyhow::bail!("curve table resolutions must be positive.");
        }
        if !(0.0..=1.0).contains(&self.render.ssao_strength) {
            anyhow::bail!("ssao_strength must lie in [0, 1].");
        }
        if self.player.hitbox_radius < 1.0 {
            anyhow::bail!("hitbox_radius must be at least 1.0.");
        }
        if self.run.input == InputMode::Script && self.run.script.is_empty() {
            anyhow::bail!("input = \"script\" needs at least one [[run.script]] step.");
        }
        if !(0.0..=1.0).contains(&self.run.damping) {
            anyhow::bail!("damping must lie in [0, 1].");
        }
        match self.output.format.as_deref() {
            None | Some("json") | Some("csv") => {}
            Some(other) => anyhow::bail!("unknown output format '{}'.", other),
        }
        // Grid shape and portal placement are checked when the world is built.
        Ok(())
    }

    /// Converts the configuration into render parameters used at runtime.
    pub fn get_render_params(&self) -> RenderParams {
        RenderParams {
            width: self.display.width as usize,
            height: self.display.height as usize,
            max_portal_depth: self.render.max_portal_depth as usize,
            worker_threads: self.render.worker_threads,
            ssao_strength: self.render.ssao_strength,
            half_circle_resolution: self.render.half_circle_resolution,
            ssao_resolution: self.render.ssao_resolution,
        }
    }
}

fn default_max_portal_depth() -> u32 {
    8
}

fn default_ssao_strength() -> f64 {
    0.35
}

fn default_half_circle_resolution() -> usize {
    10_000
}

fn default_ssao_resolution() -> usize {
    500
}

fn default_hitbox_radius() -> f64 {
    2.0
}

fn default_repeat() -> u32 {
    1
}

fn default_record_interval_ticks() -> u32 {
    10
}

fn default_input_mode() -> InputMode {
    InputMode::Wander
}

fn default_move_accel() -> f64 {
    0.01
}

fn default_turn_accel() -> f64 {
    0.3
}

fn default_max_move_speed() -> f64 {
    0.10
}

fn default_max_turn_speed() -> f64 {
    3.0
}

fn default_damping() -> f64 {
    0.88
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
        [display]
        width = 64
        height = 48

        [player]
        position = [2.5, 2.5]
        heading = [-1.0, 0.0]
        camera_plane = [0.0, 0.66]

        [world]
        cells = [
            [1, 1, 1],
            [1, 0, 1],
            [1, 1, 1],
        ]

        [[portals]]
        a = { x = 0, y = 1, direction = "south" }
        b = { x = 2, y = 1, direction = "north" }

        [run]
        ticks = 10

        [output]
        base_filename = "test"
    "#;

    #[test]
    fn minimal_config_fills_defaults() {
        let config = GameConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.render.max_portal_depth, 8);
        assert_eq!(config.player.hitbox_radius, 2.0);
        assert_eq!(config.run.input, InputMode::Wander);
        assert_eq!(config.run.damping, 0.88);
        assert_eq!(config.portals.len(), 1);
        assert_eq!(config.portals[0].a.direction, CardinalDirection::South);

        let params = config.get_render_params();
        assert_eq!((params.width, params.height), (64, 48));
        assert_eq!(params.max_portal_depth, 8);
    }

    #[test]
    fn zero_portal_depth_is_rejected() {
        let text = MINIMAL.replace("[run]", "[render]\nmax_portal_depth = 0\n\n[run]");
        let err = GameConfig::from_toml_str(&text).unwrap_err();
        assert!(err.to_string().contains("max_portal_depth"));
    }

    #[test]
    fn unknown_output_format_is_rejected() {
        let text = MINIMAL.replace("base_filename = \"test\"", "base_filename = \"test\"\nformat = \"bincode\"");
        assert!(GameConfig::from_toml_str(&text).is_err());
    }

    #[test]
    fn script_mode_requires_steps() {
        let text = MINIMAL.replace("ticks = 10", "ticks = 10\ninput = \"script\"");
        assert!(GameConfig::from_toml_str(&text).is_err());

        let text = text.replace("[output]", "[[run.script]]\nthrust = 1.0\nrepeat = 5\n\n[output]");
        let config = GameConfig::from_toml_str(&text).unwrap();
        assert_eq!(config.run.script, vec![ScriptStep { thrust: 1.0, turn: 0.0, repeat: 5 }]);
    }

    #[test]
    fn load_reads_file_and_reports_path_on_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.world.cells.len(), 3);

        let err = GameConfig::load("does/not/exist.toml").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.toml"));
    }
}
