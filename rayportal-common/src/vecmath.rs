use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A simple 2D vector in grid units (one cell = 1.0).
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// Creates a new Vec2.
    #[inline(always)]
    pub fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    /// Creates a zero vector.
    #[inline(always)]
    pub fn zero() -> Self {
        Vec2 { x: 0.0, y: 0.0 }
    }

    /// Origin corner of the grid cell `(cell_x, cell_y)`.
    #[inline(always)]
    pub fn from_cell(cell_x: i32, cell_y: i32) -> Self {
        Vec2::new(cell_x as f64, cell_y as f64)
    }

    /// Rotates the vector counter-clockwise by `degrees`.
    ///
    /// Multiples of 90 degrees are applied as exact axis swaps so that
    /// repeated portal crossings do not accumulate rounding drift.
    pub fn rotate(self, degrees: f64) -> Self {
        if degrees % 90.0 == 0.0 {
            let quarter_turns = ((degrees / 90.0) as i64).rem_euclid(4);
            return match quarter_turns {
                0 => self,
                1 => Vec2::new(-self.y, self.x),
                2 => Vec2::new(-self.x, -self.y),
                _ => Vec2::new(self.y, -self.x),
            };
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Negates the x component.
    #[inline(always)]
    pub fn mirror_x(self) -> Self {
        Vec2::new(-self.x, self.y)
    }

    /// Negates the y component.
    #[inline(always)]
    pub fn mirror_y(self) -> Self {
        Vec2::new(self.x, -self.y)
    }

    /// Adds another vector to this vector.
    #[inline(always)]
    pub fn add(self, other: Vec2) -> Self {
        Vec2::new(self.x + other.x, self.y + other.y)
    }

    /// Subtracts another vector from this vector.
    #[inline(always)]
    pub fn sub(self, other: Vec2) -> Self {
        Vec2::new(self.x - other.x, self.y - other.y)
    }

    /// Scales the vector by a scalar value.
    #[inline(always)]
    pub fn scale(self, scalar: f64) -> Self {
        Vec2::new(self.x * scalar, self.y * scalar)
    }

    #[inline(always)]
    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[inline(always)]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Grid cell containing this point. Uses `floor`, so negative
    /// coordinates land in negative cells instead of collapsing onto 0.
    #[inline(always)]
    pub fn cell(self) -> (i32, i32) {
        (self.x.floor() as i32, self.y.floor() as i32)
    }

    /// Position relative to the origin corner of the cell containing it.
    #[inline(always)]
    pub fn fract(self) -> Self {
        Vec2::new(self.x - self.x.floor(), self.y - self.y.floor())
    }

    /// Component-wise closeness check, for tests and sanity assertions.
    pub fn approx_eq(self, other: Vec2, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Vec2::add(self, other)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Vec2::sub(self, other)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        self.scale(scalar)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Vec2::new(-self.x, -self.y)
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from(value: [f64; 2]) -> Self {
        Vec2::new(value[0], value[1])
    }
}

/// Translation that re-anchors a unit cell square after rotating it about
/// its origin corner by one of the portal rotations (0, 90, -90, 180).
pub fn cell_compensation(rotation_degrees: f64) -> Vec2 {
    if rotation_degrees == 180.0 || rotation_degrees == -180.0 {
        Vec2::new(1.0, 1.0)
    } else if rotation_degrees == 90.0 {
        Vec2::new(1.0, 0.0)
    } else if rotation_degrees == -90.0 {
        Vec2::new(0.0, 1.0)
    } else {
        Vec2::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_turns_are_exact() {
        let v = Vec2::new(-1.0, 0.0);
        assert_eq!(v.rotate(90.0), Vec2::new(0.0, -1.0));
        assert_eq!(v.rotate(-90.0), Vec2::new(0.0, 1.0));
        assert_eq!(v.rotate(180.0), Vec2::new(1.0, 0.0));
        assert_eq!(v.rotate(360.0), v);
        assert_eq!(v.rotate(90.0).rotate(-90.0), v);
    }

    #[test]
    fn arbitrary_rotation_preserves_length() {
        let v = Vec2::new(0.3, -0.7);
        let r = v.rotate(37.5);
        assert!((r.length() - v.length()).abs() < 1e-12);
        assert!(r.rotate(-37.5).approx_eq(v, 1e-12));
    }

    #[test]
    fn mirrors_negate_one_axis() {
        let v = Vec2::new(2.0, -3.0);
        assert_eq!(v.mirror_x(), Vec2::new(-2.0, -3.0));
        assert_eq!(v.mirror_y(), Vec2::new(2.0, 3.0));
    }

    #[test]
    fn cell_uses_floor_for_negative_coordinates() {
        assert_eq!(Vec2::new(-0.25, 3.75).cell(), (-1, 3));
        assert!(Vec2::new(-0.25, 3.75).fract().approx_eq(Vec2::new(0.75, 0.75), 1e-12));
    }

    #[test]
    fn compensation_keeps_rotated_unit_square_in_place() {
        let corners = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        ];
        for rotation in [0.0, 90.0, -90.0, 180.0] {
            for corner in corners {
                let moved = corner.rotate(rotation) + cell_compensation(rotation);
                assert!(
                    (0.0..=1.0).contains(&moved.x) && (0.0..=1.0).contains(&moved.y),
                    "rotation {rotation} moved {corner:?} to {moved:?}"
                );
            }
        }
    }
}
