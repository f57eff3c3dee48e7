use serde::{Deserialize, Serialize};
use std::fmt;

/// Which way a ray (or the player) was travelling when it struck a wall face.
///
/// The name identifies the face by the travel direction that hits it:
/// NORTH is struck travelling +x, EAST travelling +y, SOUTH travelling -x
/// and WEST travelling -y. The declaration order is the fixed cyclic order
/// used for rotation relationships.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardinalDirection {
    North,
    East,
    South,
    West,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::North,
        CardinalDirection::East,
        CardinalDirection::South,
        CardinalDirection::West,
    ];

    /// Position in the cyclic order N -> E -> S -> W.
    #[inline(always)]
    pub fn index(self) -> i32 {
        match self {
            CardinalDirection::North => 0,
            CardinalDirection::East => 1,
            CardinalDirection::South => 2,
            CardinalDirection::West => 3,
        }
    }

    pub fn opposite(self) -> Self {
        Self::ALL[((self.index() + 2) % 4) as usize]
    }

    /// Unit grid step of the travel direction that strikes this face.
    pub fn travel(self) -> (i32, i32) {
        match self {
            CardinalDirection::North => (1, 0),
            CardinalDirection::East => (0, 1),
            CardinalDirection::South => (-1, 0),
            CardinalDirection::West => (0, -1),
        }
    }

    /// Face struck by a grid step along one axis. `side` is 0 for an x-axis
    /// step and 1 for a y-axis step; `component` is the signed travel
    /// component on that axis.
    #[inline(always)]
    pub fn from_travel(side: u8, component: f64) -> Self {
        match (side, component >= 0.0) {
            (0, true) => CardinalDirection::North,
            (0, false) => CardinalDirection::South,
            (_, true) => CardinalDirection::East,
            (_, false) => CardinalDirection::West,
        }
    }

    /// Rotation in degrees that turns "travelling into face `self`" into
    /// "travelling out of face `other`".
    ///
    /// Same face gives 180, opposite faces give 0, and the two perpendicular
    /// relationships give -90 (towards the next face in cyclic order) and 90
    /// (towards the previous one), so the result is antisymmetric.
    pub fn relationship_degrees(self, other: CardinalDirection) -> f64 {
        let quarter_turns = (other.index() - self.index() + 2).rem_euclid(4);
        match quarter_turns {
            0 => 0.0,
            1 => 90.0,
            2 => 180.0,
            _ => -90.0,
        }
    }
}

impl fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardinalDirection::North => "north",
            CardinalDirection::East => "east",
            CardinalDirection::South => "south",
            CardinalDirection::West => "west",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vecmath::Vec2;

    #[test]
    fn same_face_is_half_turn() {
        for dir in CardinalDirection::ALL {
            assert_eq!(dir.relationship_degrees(dir), 180.0);
        }
    }

    #[test]
    fn opposite_faces_need_no_rotation() {
        for dir in CardinalDirection::ALL {
            assert_eq!(dir.relationship_degrees(dir.opposite()), 0.0);
        }
    }

    #[test]
    fn perpendicular_relationships_are_antisymmetric() {
        for a in CardinalDirection::ALL {
            for b in CardinalDirection::ALL {
                if a == b || a == b.opposite() {
                    continue;
                }
                let forward = a.relationship_degrees(b);
                assert!(forward == 90.0 || forward == -90.0);
                assert_eq!(forward, -b.relationship_degrees(a), "{a} -> {b}");
            }
        }
    }

    #[test]
    fn rotation_turns_entry_travel_into_exit_travel() {
        for entry in CardinalDirection::ALL {
            for exit in CardinalDirection::ALL {
                let (ex, ey) = entry.travel();
                let rotated = Vec2::new(ex as f64, ey as f64).rotate(entry.relationship_degrees(exit));
                let (ox, oy) = exit.opposite().travel();
                assert_eq!(rotated, Vec2::new(ox as f64, oy as f64), "{entry} -> {exit}");
            }
        }
    }

    #[test]
    fn travel_round_trips_through_from_travel() {
        for dir in CardinalDirection::ALL {
            let (tx, ty) = dir.travel();
            let side = if tx != 0 { 0 } else { 1 };
            let component = (if side == 0 { tx } else { ty }) as f64;
            assert_eq!(CardinalDirection::from_travel(side, component), dir);
        }
    }
}
