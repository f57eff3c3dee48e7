use crate::dispatcher::Camera;
use crate::portal::Portal;
use crate::world::World;
use anyhow::Result;
use log::debug;
use rayportal_common::{cell_compensation, CardinalDirection, PlayerConfig, Vec2};
use std::sync::Arc;

/// What a call to [`Player::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Zero speed, nothing to do.
    Still,
    /// Ordinary collision-checked movement on at least one axis.
    Walked,
    /// Moved along one axis towards a portal face closer than the hitbox
    /// normally allows.
    Slid,
    /// Crossed into the given portal and came out of its partner.
    Teleported(Portal),
    /// Every axis was blocked.
    Blocked,
}

impl Movement {
    /// Short lowercase label used in snapshots.
    pub fn label(&self) -> &'static str {
        match self {
            Movement::Still => "still",
            Movement::Walked => "walked",
            Movement::Slid => "slid",
            Movement::Teleported(_) => "teleported",
            Movement::Blocked => "blocked",
        }
    }
}

/// The player: position, heading and camera plane, moved through the world
/// with the same portal transform the ray caster uses.
#[derive(Debug, Clone)]
pub struct Player {
    world: Arc<World>,
    position: Vec2,
    heading: Vec2,
    camera_plane: Vec2,
    hitbox_radius: f64,
}

impl Player {
    pub fn new(world: Arc<World>, position: Vec2, heading: Vec2, camera_plane: Vec2, hitbox_radius: f64) -> Result<Self> {
        if world.grid().is_solid_at(position) {
            anyhow::bail!("player cannot start inside a wall at ({}, {}).", position.x, position.y);
        }
        if heading.length() == 0.0 {
            anyhow::bail!("player heading must not be the zero vector.");
        }
        Ok(Self { world, position, heading, camera_plane, hitbox_radius })
    }

    pub fn from_config(world: Arc<World>, config: &PlayerConfig) -> Result<Self> {
        Self::new(
            world,
            config.position.into(),
            config.heading.into(),
            config.camera_plane.into(),
            config.hitbox_radius,
        )
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn heading(&self) -> Vec2 {
        self.heading
    }

    pub fn camera_plane(&self) -> Vec2 {
        self.camera_plane
    }

    pub fn camera(&self) -> Camera {
        Camera {
            position: self.position,
            heading: self.heading,
            plane: self.camera_plane,
        }
    }

    /// Turns heading and camera plane together.
    pub fn rotate(&mut self, degrees: f64) {
        if degrees == 0.0 {
            return;
        }
        self.heading = self.heading.rotate(degrees);
        self.camera_plane = self.camera_plane.rotate(degrees);
    }

    /// Moves `speed` cells along the heading (negative backs up).
    ///
    /// In order of preference: step through a portal whose face the move
    /// crosses, slide up to a portal face within hitbox range, or walk with
    /// per-axis collision against the grid.
    pub fn advance(&mut self, speed: f64) -> Movement {
        if speed == 0.0 {
            return Movement::Still;
        }

        let next = self.position + self.heading * speed;
        if let Some(crossing) = self.crossing(next) {
            let (next_x, next_y) = next.cell();
            if let Some(portal) = self.world.portals().lookup(next_x, next_y, crossing) {
                if self.walk_through(portal, crossing, speed) {
                    return Movement::Teleported(portal);
                }
            }
        }

        if self.slide_towards_portal(next, speed) {
            return Movement::Slid;
        }

        self.walk(speed)
    }

    /// Face crossed when moving from the current cell into the cell of
    /// `next`. The x axis wins when both change.
    fn crossing(&self, next: Vec2) -> Option<CardinalDirection> {
        let (cell_x, cell_y) = self.position.cell();
        let (next_x, next_y) = next.cell();
        Self::axis_crossing(0, next_x - cell_x).or_else(|| Self::axis_crossing(1, next_y - cell_y))
    }

    fn axis_crossing(side: u8, cell_delta: i32) -> Option<CardinalDirection> {
        if cell_delta == 0 {
            return None;
        }
        Some(CardinalDirection::from_travel(side, cell_delta as f64))
    }

    fn walk_through(&mut self, portal: Portal, crossing: CardinalDirection, speed: f64) -> bool {
        let grid = self.world.grid();
        let (cell_x, cell_y) = self.position.cell();
        let offset = self.position - Vec2::from_cell(cell_x, cell_y);

        let rotation = crossing.relationship_degrees(portal.direction);
        let heading = self.heading.rotate(rotation);
        let base = portal.cell_origin() + offset.rotate(rotation) + cell_compensation(rotation);
        let target = base + heading * speed;

        // Each axis only takes its step if the cell it lands in is open.
        let (target_x, target_y) = target.cell();
        let (base_x, base_y) = base.cell();
        let x = if grid.is_solid(target_x, base_y) { base.x } else { target.x };
        let y = if grid.is_solid(x.floor() as i32, target_y) { base.y } else { target.y };
        let landed = Vec2::new(x, y);
        if grid.is_solid_at(landed) {
            debug!(
                "Portal ({}, {}) {} blocked on the far side at ({}, {}).",
                portal.cell_x, portal.cell_y, portal.direction, base_x, base_y
            );
            return false;
        }

        debug!(
            "Teleported through {} face to ({}, {}) {}, rotated {} degrees.",
            crossing, portal.cell_x, portal.cell_y, portal.direction, rotation
        );
        self.position = landed;
        self.heading = heading;
        self.camera_plane = self.camera_plane.rotate(rotation);
        true
    }

    /// Lets the player close in on a portal face that the hitbox look-ahead
    /// already reaches, moving only along the axis that faces the portal.
    fn slide_towards_portal(&mut self, next: Vec2, speed: f64) -> bool {
        let reach = self.position + self.heading * (speed * self.hitbox_radius);
        let (cell_x, cell_y) = self.position.cell();
        let (reach_x, reach_y) = reach.cell();
        let portals = self.world.portals();

        let along_x = Self::axis_crossing(0, reach_x - cell_x)
            .and_then(|dir| portals.lookup(reach_x, cell_y, dir));
        let along_y = Self::axis_crossing(1, reach_y - cell_y)
            .and_then(|dir| portals.lookup(cell_x, reach_y, dir));

        let grid = self.world.grid();
        match (along_x, along_y) {
            (Some(_), None) if !grid.is_solid(next.x.floor() as i32, cell_y) => {
                self.position.x = next.x;
                true
            }
            (None, Some(_)) if !grid.is_solid(cell_x, next.y.floor() as i32) => {
                self.position.y = next.y;
                true
            }
            _ => false,
        }
    }

    /// Per-axis movement: an axis advances only when both the hitbox
    /// look-ahead cell and the destination cell on that axis are open.
    fn walk(&mut self, speed: f64) -> Movement {
        let grid = self.world.grid();
        let step = self.heading * speed;
        let reach = self.heading * (speed * self.hitbox_radius);
        let mut moved = false;

        let cell_y = self.position.y.floor() as i32;
        let ahead_x = (self.position.x + reach.x).floor() as i32;
        let dest_x = (self.position.x + step.x).floor() as i32;
        if step.x != 0.0 && !grid.is_solid(ahead_x, cell_y) && !grid.is_solid(dest_x, cell_y) {
            self.position.x += step.x;
            moved = true;
        }

        let cell_x = self.position.x.floor() as i32;
        let ahead_y = (self.position.y + reach.y).floor() as i32;
        let dest_y = (self.position.y + step.y).floor() as i32;
        if step.y != 0.0 && !grid.is_solid(cell_x, ahead_y) && !grid.is_solid(cell_x, dest_y) {
            self.position.y += step.y;
            moved = true;
        }

        if moved {
            Movement::Walked
        } else {
            Movement::Blocked
        }
    }
}
