use rand::prelude::*;
use rayportal_common::{InputMode, RunConfig, ScriptStep};

/// Desired thrust and turn for one tick, each in [-1, 1]. Stands in for the
/// keys a player would be holding.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    pub thrust: f64,
    pub turn: f64,
}

/// Turns held input into smooth movement: each tick the intent accelerates
/// the velocities, which are clamped, applied, and then damped.
#[derive(Debug, Clone)]
pub struct Momentum {
    move_accel: f64,
    turn_accel: f64,
    max_move_speed: f64,
    max_turn_speed: f64,
    damping: f64,
    move_velocity: f64,
    turn_velocity: f64,
}

impl Momentum {
    pub fn new(run: &RunConfig) -> Self {
        Self {
            move_accel: run.move_accel,
            turn_accel: run.turn_accel,
            max_move_speed: run.max_move_speed,
            max_turn_speed: run.max_turn_speed,
            damping: run.damping,
            move_velocity: 0.0,
            turn_velocity: 0.0,
        }
    }

    /// Accelerates by `intent` and returns `(speed, degrees)` to apply this
    /// tick.
    pub fn accelerate(&mut self, intent: Intent) -> (f64, f64) {
        self.move_velocity = (self.move_velocity + intent.thrust * self.move_accel)
            .clamp(-self.max_move_speed, self.max_move_speed);
        self.turn_velocity = (self.turn_velocity + intent.turn * self.turn_accel)
            .clamp(-self.max_turn_speed, self.max_turn_speed);
        (self.move_velocity, self.turn_velocity)
    }

    /// Applied after the velocities were used for the tick.
    pub fn damp(&mut self) {
        self.move_velocity *= self.damping;
        self.turn_velocity *= self.damping;
    }

    pub fn velocities(&self) -> (f64, f64) {
        (self.move_velocity, self.turn_velocity)
    }
}

/// Where per-tick intents come from when no keyboard is attached.
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Seeded random walk: hold a random intent for a random number of ticks.
    Wander {
        rng: StdRng,
        current: Intent,
        remaining: u32,
    },
    /// Fixed steps, started over from the first once exhausted.
    Script {
        steps: Vec<ScriptStep>,
        index: usize,
        remaining: u32,
    },
}

impl InputSource {
    pub fn from_config(run: &RunConfig) -> Self {
        match run.input {
            InputMode::Wander => InputSource::Wander {
                rng: StdRng::seed_from_u64(run.seed),
                current: Intent::default(),
                remaining: 0,
            },
            InputMode::Script => InputSource::scripted(run.script.clone()),
        }
    }

    pub fn scripted(steps: Vec<ScriptStep>) -> Self {
        let remaining = steps.first().map_or(0, |step| step.repeat);
        InputSource::Script { steps, index: 0, remaining }
    }

    pub fn next_intent(&mut self) -> Intent {
        match self {
            InputSource::Wander { rng, current, remaining } => {
                if *remaining == 0 {
                    let thrust = if rng.random_bool(0.8) { 1.0 } else { -0.5 };
                    let turn = rng.random_range(-1..=1) as f64;
                    *current = Intent { thrust, turn };
                    *remaining = rng.random_range(10..40);
                }
                *remaining -= 1;
                *current
            }
            InputSource::Script { steps, index, remaining } => {
                if steps.is_empty() {
                    return Intent::default();
                }
                // Skip over zero-length steps without looping forever.
                let mut guard = steps.len();
                while *remaining == 0 && guard > 0 {
                    *index = (*index + 1) % steps.len();
                    *remaining = steps[*index].repeat;
                    guard -= 1;
                }
                if *remaining == 0 {
                    return Intent::default();
                }
                *remaining -= 1;
                let step = steps[*index];
                Intent { thrust: step.thrust, turn: step.turn }
            }
        }
    }
}
