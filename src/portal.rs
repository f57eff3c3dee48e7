use anyhow::Result;
use rayportal_common::{CardinalDirection, Vec2};
use std::collections::HashMap;

/// A portal is a wall face: the solid cell it is painted on and the face
/// direction. It is a plain value; two portals are the same portal when the
/// triple matches.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Portal {
    pub cell_x: i32,
    pub cell_y: i32,
    pub direction: CardinalDirection,
}

impl Portal {
    pub fn new(cell_x: i32, cell_y: i32, direction: CardinalDirection) -> Self {
        Self { cell_x, cell_y, direction }
    }

    /// Origin corner of the portal's cell.
    pub fn cell_origin(&self) -> Vec2 {
        Vec2::from_cell(self.cell_x, self.cell_y)
    }

    /// The passable cell the face is seen from.
    pub fn approach_cell(&self) -> (i32, i32) {
        let (tx, ty) = self.direction.travel();
        (self.cell_x - tx, self.cell_y - ty)
    }
}

/// Symmetric lookup from a portal face to the face it is linked with.
///
/// Every registration inserts both directions, so each stored key has
/// exactly one counterpart that maps back to it.
#[derive(Debug, Clone, Default)]
pub struct PortalRegistry {
    links: HashMap<Portal, Portal>,
}

impl PortalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links `a` and `b` in both directions. Fails without modifying the
    /// registry if either face is already linked or if both ends are the
    /// same face.
    pub fn register(&mut self, a: Portal, b: Portal) -> Result<()> {
        if a == b {
            anyhow::bail!(
                "portal at ({}, {}) {} cannot be linked to itself.",
                a.cell_x, a.cell_y, a.direction
            );
        }
        for end in [a, b] {
            if let Some(existing) = self.links.get(&end) {
                anyhow::bail!(
                    "portal at ({}, {}) {} is already linked to ({}, {}) {}.",
                    end.cell_x, end.cell_y, end.direction,
                    existing.cell_x, existing.cell_y, existing.direction
                );
            }
        }
        self.links.insert(a, b);
        self.links.insert(b, a);
        Ok(())
    }

    /// Portal paired with the face `(cell_x, cell_y, direction)`, if any.
    #[inline(always)]
    pub fn lookup(&self, cell_x: i32, cell_y: i32, direction: CardinalDirection) -> Option<Portal> {
        self.links.get(&Portal::new(cell_x, cell_y, direction)).copied()
    }

    /// Number of registered faces (two per pair).
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Portal, &Portal)> {
        self.links.iter()
    }
}
