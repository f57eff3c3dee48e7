use crate::grid::Grid;
use crate::portal::{Portal, PortalRegistry};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use rayportal_common::GameConfig;

/// The immutable world shared by movement and every render worker.
#[derive(Debug, Clone)]
pub struct World {
    grid: Grid,
    portals: PortalRegistry,
}

impl World {
    pub fn builder() -> WorldBuilder {
        WorldBuilder::default()
    }

    /// Builds the world described by the `[world]` and `[[portals]]` sections.
    pub fn from_config(config: &GameConfig) -> Result<Self> {
        let mut builder = World::builder();
        builder.load_grid(&config.world.cells)?;
        for (idx, pair) in config.portals.iter().enumerate() {
            builder
                .register_portal(
                    Portal::new(pair.a.x, pair.a.y, pair.a.direction),
                    Portal::new(pair.b.x, pair.b.y, pair.b.direction),
                )
                .with_context(|| format!("portal pair #{}", idx + 1))?;
        }
        builder.build()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn portals(&self) -> &PortalRegistry {
        &self.portals
    }
}

/// Collects the grid and portal pairs, validating each registration as it
/// happens so that configuration mistakes surface before the first frame.
#[derive(Debug, Default)]
pub struct WorldBuilder {
    grid: Option<Grid>,
    portals: PortalRegistry,
}

impl WorldBuilder {
    pub fn load_grid(&mut self, rows: &[Vec<u8>]) -> Result<&mut Self> {
        if !self.portals.is_empty() {
            anyhow::bail!("the grid must be loaded before portals are registered.");
        }
        let grid = Grid::from_rows(rows)?;
        info!("Loaded {}x{} grid.", grid.width(), grid.height());
        self.grid = Some(grid);
        Ok(self)
    }

    pub fn register_portal(&mut self, a: Portal, b: Portal) -> Result<&mut Self> {
        let grid = self
            .grid
            .as_ref()
            .context("cannot register a portal before a grid is loaded.")?;

        for end in [a, b] {
            if !grid.in_bounds(end.cell_x, end.cell_y) {
                anyhow::bail!(
                    "portal at ({}, {}) lies outside the {}x{} grid.",
                    end.cell_x, end.cell_y, grid.width(), grid.height()
                );
            }
        }

        self.portals.register(a, b)?;
        debug!(
            "Linked portal ({}, {}) {} <-> ({}, {}) {}.",
            a.cell_x, a.cell_y, a.direction, b.cell_x, b.cell_y, b.direction
        );
        Ok(self)
    }

    pub fn build(&mut self) -> Result<World> {
        let grid = self.grid.take().context("no grid was loaded.")?;
        let portals = std::mem::take(&mut self.portals);
        for (face, _) in portals.iter() {
            // Rays can still leave through such a face, they just never strike it.
            if !grid.is_solid(face.cell_x, face.cell_y) {
                warn!(
                    "portal at ({}, {}) {} is on a passable cell and only works as an exit.",
                    face.cell_x, face.cell_y, face.direction
                );
            }
            let (approach_x, approach_y) = face.approach_cell();
            if grid.is_solid(approach_x, approach_y) {
                warn!(
                    "portal at ({}, {}) {} faces a solid cell and can never be reached.",
                    face.cell_x, face.cell_y, face.direction
                );
            }
        }
        info!("World ready with {} portal pairs.", portals.len() / 2);
        Ok(World { grid, portals })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayportal_common::CardinalDirection::*;

    fn bordered(size: usize) -> Vec<Vec<u8>> {
        (0..size)
            .map(|y| {
                (0..size)
                    .map(|x| (x == 0 || y == 0 || x == size - 1 || y == size - 1) as u8)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn builds_world_with_linked_portals() {
        let world = World::builder()
            .load_grid(&bordered(15))
            .unwrap()
            .register_portal(Portal::new(0, 4, South), Portal::new(14, 10, North))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(world.portals().lookup(0, 4, South), Some(Portal::new(14, 10, North)));
        assert_eq!(world.grid().width(), 15);
    }

    #[test]
    fn portal_before_grid_is_a_configuration_error() {
        let mut builder = World::builder();
        let err = builder
            .register_portal(Portal::new(0, 4, South), Portal::new(14, 10, North))
            .unwrap_err();
        assert!(err.to_string().contains("before a grid"));
    }

    #[test]
    fn dangling_portals_are_rejected() {
        let mut builder = World::builder();
        builder.load_grid(&bordered(15)).unwrap();
        assert!(builder
            .register_portal(Portal::new(-1, 4, South), Portal::new(14, 10, North))
            .is_err());
        assert!(builder
            .register_portal(Portal::new(0, 4, South), Portal::new(15, 10, North))
            .is_err());
        assert!(builder.build().unwrap().portals().is_empty());
    }

    #[test]
    fn exit_on_an_open_cell_is_accepted() {
        let world = World::builder()
            .load_grid(&bordered(15))
            .unwrap()
            .register_portal(Portal::new(0, 4, South), Portal::new(5, 10, North))
            .unwrap()
            .build()
            .unwrap();
        assert!(!world.grid().is_solid(5, 10));
        assert_eq!(world.portals().lookup(5, 10, North), Some(Portal::new(0, 4, South)));
    }

    #[test]
    fn duplicate_registration_fails_fast() {
        let mut builder = World::builder();
        builder.load_grid(&bordered(15)).unwrap();
        builder
            .register_portal(Portal::new(0, 4, South), Portal::new(14, 10, North))
            .unwrap();
        assert!(builder
            .register_portal(Portal::new(0, 4, South), Portal::new(7, 0, West))
            .is_err());
    }

    #[test]
    fn build_without_grid_fails() {
        assert!(World::builder().build().is_err());
    }
}
