use anyhow::Result;
use rayportal_common::Vec2;

/// Static map of the world. Stored row-major, `cells[y * width + x]`.
/// 0 is passable, any other value is a wall (the value only picks a
/// cosmetic variant).
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Grid {
    /// Builds a grid from rows of cells (`rows[y][x]`).
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self> {
        let height = rows.len();
        if height == 0 {
            anyhow::bail!("grid has no rows.");
        }
        let width = rows[0].len();
        if width == 0 {
            anyhow::bail!("grid row 0 is empty.");
        }
        if let Some((y, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            anyhow::bail!("grid row {} has {} cells, expected {}.", y, row.len(), width);
        }

        let cells = rows.iter().flatten().copied().collect();
        Ok(Self { width, height, cells })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    pub fn in_bounds(&self, cell_x: i32, cell_y: i32) -> bool {
        cell_x >= 0 && cell_y >= 0 && (cell_x as usize) < self.width && (cell_y as usize) < self.height
    }

    /// Cell value, or `None` outside the grid.
    #[inline(always)]
    pub fn get(&self, cell_x: i32, cell_y: i32) -> Option<u8> {
        if !self.in_bounds(cell_x, cell_y) {
            return None;
        }
        self.cells.get(cell_y as usize * self.width + cell_x as usize).copied()
    }

    /// Cells outside the grid count as solid, so a ray or the player can
    /// never march off the map.
    #[inline(always)]
    pub fn is_solid(&self, cell_x: i32, cell_y: i32) -> bool {
        self.get(cell_x, cell_y).map_or(true, |value| value > 0)
    }

    /// Solidity of the cell containing `pos`.
    #[inline(always)]
    pub fn is_solid_at(&self, pos: Vec2) -> bool {
        let (cell_x, cell_y) = pos.cell();
        self.is_solid(cell_x, cell_y)
    }
}
