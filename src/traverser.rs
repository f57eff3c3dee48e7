use crate::caster::{RayHit, WallCaster};
use crate::world::World;
use log::trace;
use rayportal_common::{cell_compensation, Vec2};

/// Ordered wall hits for one screen column. Index 0 is the wall the camera
/// sees directly; every later hit lies one portal crossing further away.
pub type RayChain = Vec<RayHit>;

/// Re-casts a ray through linked portals until it meets an ordinary wall or
/// the chain reaches `max_depth` hits.
#[derive(Debug, Clone, Copy)]
pub struct PortalTraverser<'w> {
    world: &'w World,
    caster: WallCaster<'w>,
    max_depth: usize,
}

impl<'w> PortalTraverser<'w> {
    /// `max_depth` is clamped to at least 1; the first hit is always cast.
    pub fn new(world: &'w World, max_depth: usize) -> Self {
        Self {
            world,
            caster: WallCaster::new(world.grid()),
            max_depth: max_depth.max(1),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Casts one column's ray from the player and follows portals.
    ///
    /// The loop is bounded by the chain length, so a pair of portals facing
    /// each other (or any cycle) stops at `max_depth` and the last hit is
    /// drawn as a plain wall.
    pub fn cast_column(&self, direction: Vec2, position: Vec2, cell: (i32, i32)) -> RayChain {
        let mut chain = Vec::with_capacity(self.max_depth);
        chain.push(self.caster.cast_wall(direction, position, cell.0, cell.1));

        while chain.len() < self.max_depth {
            let Some(prior) = chain.last().copied() else { break };
            let Some(portal) = self
                .world
                .portals()
                .lookup(prior.cell_x, prior.cell_y, prior.hit_direction)
            else {
                break;
            };

            // Ray origin relative to the struck cell, pushed one cell along the
            // axis that was crossed so it sits on the far side of the face.
            let mut local = prior.origin - Vec2::from_cell(prior.cell_x, prior.cell_y);
            if prior.side == 0 {
                local.x += prior.step_x as f64;
            } else {
                local.y += prior.step_y as f64;
            }

            let rotation = prior.hit_direction.relationship_degrees(portal.direction);
            let origin = local.rotate(rotation) + cell_compensation(rotation) + portal.cell_origin();
            let direction = prior.direction.rotate(rotation);

            trace!(
                "ray through ({}, {}) {} -> ({}, {}) {}, rotated {} degrees",
                prior.cell_x, prior.cell_y, prior.hit_direction,
                portal.cell_x, portal.cell_y, portal.direction, rotation
            );
            chain.push(self.caster.cast_wall(direction, origin, portal.cell_x, portal.cell_y));
        }

        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::Portal;
    use rayportal_common::CardinalDirection::{self, *};

    fn bordered_world(pairs: &[(Portal, Portal)]) -> World {
        let rows: Vec<Vec<u8>> = (0..15)
            .map(|y| (0..15).map(|x| (x == 0 || y == 0 || x == 14 || y == 14) as u8).collect())
            .collect();
        let mut builder = World::builder();
        builder.load_grid(&rows).unwrap();
        for (a, b) in pairs {
            builder.register_portal(*a, *b).unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn plain_wall_gives_a_single_hit() {
        let world = bordered_world(&[(Portal::new(0, 4, South), Portal::new(5, 10, North))]);
        let chain = PortalTraverser::new(&world, 8).cast_column(Vec2::new(-1.0, 0.0), Vec2::new(2.0, 2.5), (2, 2));
        assert_eq!(chain.len(), 1);
        assert_eq!((chain[0].cell_x, chain[0].cell_y), (0, 2));
    }

    #[test]
    fn opposite_faces_continue_without_rotation() {
        let world = bordered_world(&[(Portal::new(0, 4, South), Portal::new(5, 10, North))]);
        let chain = PortalTraverser::new(&world, 8).cast_column(Vec2::new(-1.0, 0.0), Vec2::new(2.0, 4.5), (2, 4));
        assert_eq!(chain.len(), 2);

        let exit = chain[1];
        assert_eq!(exit.origin, Vec2::new(6.0, 10.5));
        assert_eq!(exit.direction, Vec2::new(-1.0, 0.0));
        assert_eq!((exit.cell_x, exit.cell_y), (0, 10));
        // One cell to the portal face, then four more to the border.
        assert_eq!(exit.distance, 5.0);
    }

    #[test]
    fn same_face_pair_turns_the_ray_around() {
        let world = bordered_world(&[(Portal::new(0, 4, South), Portal::new(10, 7, South))]);
        let chain = PortalTraverser::new(&world, 8).cast_column(Vec2::new(-1.0, 0.0), Vec2::new(2.0, 4.5), (2, 4));
        assert_eq!(chain.len(), 2);

        let exit = chain[1];
        assert_eq!(exit.direction, Vec2::new(1.0, 0.0));
        assert!(exit.origin.approx_eq(Vec2::new(10.0, 7.5), 1e-12));
        assert_eq!((exit.cell_x, exit.cell_y), (14, 7));
        assert_eq!(exit.hit_direction, North);
    }

    #[test]
    fn perpendicular_pair_rotates_direction() {
        // Entering the south face of (0, 4) and leaving the west face of (7, 0)
        // means travelling +y out of the top wall.
        let world = bordered_world(&[(Portal::new(0, 4, South), Portal::new(7, 0, West))]);
        let chain = PortalTraverser::new(&world, 8).cast_column(Vec2::new(-1.0, 0.0), Vec2::new(3.0, 4.25), (3, 4));
        assert_eq!(chain.len(), 2);

        let exit = chain[1];
        assert!(exit.direction.approx_eq(Vec2::new(0.0, 1.0), 1e-12));
        assert!(exit.origin.approx_eq(Vec2::new(7.25, -1.0), 1e-12));
        assert_eq!((exit.cell_x, exit.cell_y), (7, 14));
        assert_eq!(exit.hit_direction, East);
        // Two cells to the portal face, thirteen rows down to the far wall.
        assert!((exit.distance - 15.0).abs() < 1e-9);
        assert!((exit.wall_x - 0.25).abs() < 1e-12);
    }

    #[test]
    fn facing_portals_are_cut_off_at_max_depth() {
        // Both ends of the pair look at each other across the same corridor.
        let world = bordered_world(&[(Portal::new(0, 7, South), Portal::new(14, 7, North))]);
        for depth in 1..=12 {
            let traverser = PortalTraverser::new(&world, depth);
            for dir in [Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(-1.0, 0.01)] {
                let chain = traverser.cast_column(dir, Vec2::new(7.5, 7.5), (7, 7));
                assert!(chain.len() <= depth, "depth {depth} produced {}", chain.len());
            }
            let straight = traverser.cast_column(Vec2::new(-1.0, 0.0), Vec2::new(7.5, 7.5), (7, 7));
            assert_eq!(straight.len(), depth);
        }
    }

    #[test]
    fn zero_depth_still_casts_the_first_wall() {
        let world = bordered_world(&[]);
        let traverser = PortalTraverser::new(&world, 0);
        assert_eq!(traverser.max_depth(), 1);
        let chain = traverser.cast_column(Vec2::new(0.0, 1.0), Vec2::new(7.5, 7.5), (7, 7));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn each_hit_is_derived_from_the_previous_one() {
        let world = bordered_world(&[(Portal::new(0, 7, South), Portal::new(14, 7, North))]);
        let chain = PortalTraverser::new(&world, 4).cast_column(Vec2::new(-1.0, 0.0), Vec2::new(7.5, 7.5), (7, 7));
        for pair in chain.windows(2) {
            let (prior, next) = (pair[0], pair[1]);
            let portal = world
                .portals()
                .lookup(prior.cell_x, prior.cell_y, prior.hit_direction)
                .unwrap();
            let rotation = CardinalDirection::relationship_degrees(prior.hit_direction, portal.direction);
            assert_eq!(next.direction, prior.direction.rotate(rotation));
            // Each crossing adds one grid width of travel.
            assert!((next.distance - prior.distance - 13.0).abs() < 1e-9);
        }
    }
}
