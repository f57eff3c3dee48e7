use crate::grid::Grid;
use rayportal_common::{CardinalDirection, Vec2};

/// Result of marching one ray to the first solid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Solid cell that stopped the ray.
    pub cell_x: i32,
    pub cell_y: i32,
    /// Grid step direction on each axis (+1 or -1).
    pub step_x: i32,
    pub step_y: i32,
    /// Perpendicular distance from `origin` to the struck wall plane.
    pub distance: f64,
    /// 0 when the last step crossed an x boundary, 1 for a y boundary.
    pub side: u8,
    /// Fractional position of the hit along the struck face, in [0, 1).
    pub wall_x: f64,
    /// Where the ray started (possibly a virtual camera behind a portal).
    pub origin: Vec2,
    pub direction: Vec2,
    /// Face that was struck.
    pub hit_direction: CardinalDirection,
}

impl RayHit {
    /// World coordinates of the point where the ray met the wall, measured on
    /// the struck face. The floor projection interpolates from here back to
    /// `origin`.
    pub fn wall_point(&self) -> Vec2 {
        let (cell_x, cell_y) = (self.cell_x as f64, self.cell_y as f64);
        match (self.side, self.hit_direction) {
            (0, CardinalDirection::North) => Vec2::new(cell_x, cell_y + self.wall_x),
            (0, _) => Vec2::new(cell_x + 1.0, cell_y + self.wall_x),
            (_, CardinalDirection::East) => Vec2::new(cell_x + self.wall_x, cell_y),
            _ => Vec2::new(cell_x + self.wall_x, cell_y + 1.0),
        }
    }
}

/// Digital differential analysis against the static grid.
#[derive(Debug, Clone, Copy)]
pub struct WallCaster<'w> {
    grid: &'w Grid,
}

impl<'w> WallCaster<'w> {
    pub fn new(grid: &'w Grid) -> Self {
        Self { grid }
    }

    /// Marches from `origin` along `direction`, starting the walk in cell
    /// `(start_x, start_y)`. The origin does not have to lie inside the start
    /// cell: after a portal jump it is a virtual camera, and the side
    /// distances below still measure to the start cell's boundaries.
    ///
    /// Cells outside the grid are solid, so the march always terminates.
    pub fn cast_wall(&self, direction: Vec2, origin: Vec2, start_x: i32, start_y: i32) -> RayHit {
        let mut map_x = start_x;
        let mut map_y = start_y;

        // An axis with a zero component never advances.
        let delta_dist_x = if direction.x == 0.0 { f64::INFINITY } else { (1.0 / direction.x).abs() };
        let delta_dist_y = if direction.y == 0.0 { f64::INFINITY } else { (1.0 / direction.y).abs() };

        let (step_x, mut side_dist_x) = if direction.x == 0.0 {
            (1, f64::INFINITY)
        } else if direction.x < 0.0 {
            (-1, (origin.x - map_x as f64) * delta_dist_x)
        } else {
            (1, (map_x as f64 + 1.0 - origin.x) * delta_dist_x)
        };
        let (step_y, mut side_dist_y) = if direction.y == 0.0 {
            (1, f64::INFINITY)
        } else if direction.y < 0.0 {
            (-1, (origin.y - map_y as f64) * delta_dist_y)
        } else {
            (1, (map_y as f64 + 1.0 - origin.y) * delta_dist_y)
        };

        let side: u8 = loop {
            let side = if side_dist_x < side_dist_y {
                side_dist_x += delta_dist_x;
                map_x += step_x;
                0
            } else {
                side_dist_y += delta_dist_y;
                map_y += step_y;
                1
            };
            if self.grid.is_solid(map_x, map_y) {
                break side;
            }
        };

        let distance = if side == 0 {
            (map_x as f64 - origin.x + (1 - step_x) as f64 / 2.0) / direction.x
        } else {
            (map_y as f64 - origin.y + (1 - step_y) as f64 / 2.0) / direction.y
        };
        // An origin lying on the struck face yields -0.0 for negative steps.
        let distance = if distance <= 0.0 { 0.0 } else { distance };

        let hit_direction = if side == 0 {
            CardinalDirection::from_travel(0, direction.x)
        } else {
            CardinalDirection::from_travel(1, direction.y)
        };

        let along = if side == 0 {
            origin.y + distance * direction.y
        } else {
            origin.x + distance * direction.x
        };
        let wall_x = if along.is_finite() { along - along.floor() } else { 0.0 };

        RayHit {
            cell_x: map_x,
            cell_y: map_y,
            step_x,
            step_y,
            distance,
            side,
            wall_x,
            origin,
            direction,
            hit_direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CardinalDirection::*;

    fn bordered() -> Grid {
        let rows: Vec<Vec<u8>> = (0..15)
            .map(|y| (0..15).map(|x| (x == 0 || y == 0 || x == 14 || y == 14) as u8).collect())
            .collect();
        Grid::from_rows(&rows).unwrap()
    }

    #[test]
    fn axis_aligned_ray_hits_the_face_exactly() {
        let grid = bordered();
        let hit = WallCaster::new(&grid).cast_wall(Vec2::new(-1.0, 0.0), Vec2::new(2.0, 2.5), 2, 2);
        assert_eq!((hit.cell_x, hit.cell_y), (0, 2));
        assert_eq!(hit.side, 0);
        assert_eq!(hit.hit_direction, South);
        // The struck plane is the east face of cell 0, at x = 1.
        assert_eq!(hit.distance, 1.0);
        assert_eq!(hit.wall_x, 0.5);
        assert_eq!(hit.wall_point(), Vec2::new(1.0, 2.5));
    }

    #[test]
    fn each_travel_direction_maps_to_its_face() {
        let grid = bordered();
        let caster = WallCaster::new(&grid);
        let origin = Vec2::new(7.5, 7.5);
        let cases = [
            (Vec2::new(1.0, 0.0), (14, 7), North, 0),
            (Vec2::new(-1.0, 0.0), (0, 7), South, 0),
            (Vec2::new(0.0, 1.0), (7, 14), East, 1),
            (Vec2::new(0.0, -1.0), (7, 0), West, 1),
        ];
        for (direction, cell, face, side) in cases {
            let hit = caster.cast_wall(direction, origin, 7, 7);
            assert_eq!((hit.cell_x, hit.cell_y), cell);
            assert_eq!(hit.hit_direction, face);
            assert_eq!(hit.side, side);
            assert_eq!(hit.distance, 6.5);
            assert!(hit.distance.is_finite());
        }
    }

    #[test]
    fn distance_is_perpendicular_not_euclidean() {
        let grid = bordered();
        let hit = WallCaster::new(&grid).cast_wall(Vec2::new(-1.0, 0.5), Vec2::new(7.5, 7.5), 7, 7);
        assert_eq!(hit.side, 0);
        assert_eq!((hit.cell_x, hit.cell_y), (0, 10));
        assert_eq!(hit.distance, 6.5);
        assert_eq!(hit.wall_x, 0.75);
    }

    #[test]
    fn zero_vector_still_terminates_at_the_grid_edge() {
        let grid = Grid::from_rows(&[vec![0, 0, 0], vec![0, 0, 0]]).unwrap();
        let hit = WallCaster::new(&grid).cast_wall(Vec2::zero(), Vec2::new(1.5, 0.5), 1, 0);
        assert!(!grid.in_bounds(hit.cell_x, hit.cell_y));
        assert!(hit.distance.is_infinite());
        assert_eq!(hit.wall_x, 0.0);
    }

    #[test]
    fn origin_on_the_face_is_at_distance_zero() {
        let grid = bordered();
        let caster = WallCaster::new(&grid);
        for (direction, origin, start) in [
            (Vec2::new(-1.0, 0.0), Vec2::new(1.0, 2.5), (1, 2)),
            (Vec2::new(0.0, -1.0), Vec2::new(6.5, 1.0), (6, 1)),
            (Vec2::new(-1.0, 0.3), Vec2::new(1.0, 7.5), (1, 7)),
        ] {
            let hit = caster.cast_wall(direction, origin, start.0, start.1);
            assert_eq!(hit.distance, 0.0);
            assert!(hit.distance.is_sign_positive(), "{direction:?} from {origin:?}");
        }
    }

    #[test]
    fn virtual_origin_outside_the_start_cell() {
        let grid = bordered();
        // Camera sits one cell east of cell (5, 10); the march begins inside it.
        let hit = WallCaster::new(&grid).cast_wall(Vec2::new(-1.0, 0.0), Vec2::new(6.0, 10.5), 5, 10);
        assert_eq!((hit.cell_x, hit.cell_y), (0, 10));
        assert_eq!(hit.distance, 5.0);
    }
}
