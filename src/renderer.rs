use crate::caster::RayHit;
use crate::curves::Curves;
use anyhow::Result;
use rayportal_common::{CardinalDirection, RenderParams, Vec2};
use std::ops::Range;

/// Checkerboard floor colours, indexed by `(floor(x) + floor(y)) mod 2`.
pub const FLOOR_COLORS: [u32; 2] = [0xFFFF_FFFF, 0xFF33_3333];
/// Checkerboard ceiling colours, same indexing as the floor.
pub const CEILING_COLORS: [u32; 2] = [0xFF77_7777, 0xFFE2_E2E2];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Ceiling,
    Wall,
    Floor,
}

/// A run of rows in one column, owned by the chain hit at index `layer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub rows: Range<usize>,
    pub layer: usize,
    pub kind: SegmentKind,
}

/// Screen rows covered by a wall at a given distance.
///
/// The span is symmetric around the horizon, `start == height - end`, so
/// every floor row has a ceiling row mirrored at `height - 1 - y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallSpan {
    /// Projected wall height before clamping to the screen.
    pub line_height: i64,
    pub start: usize,
    pub end: usize,
}

/// Paints one screen column from a ray chain.
///
/// The nearest wall covers everything outside its portal aperture; inside
/// the aperture the next hit in the chain takes over, and so on until the
/// last hit, which is always drawn as an opaque wall. Ownership of every row
/// is resolved first so each pixel is written exactly once, then layers are
/// painted farthest first.
#[derive(Debug, Clone)]
pub struct ColumnRenderer {
    height: usize,
    ssao_strength: f64,
    curves: Curves,
}

impl ColumnRenderer {
    pub fn new(params: &RenderParams) -> Self {
        Self {
            height: params.height,
            ssao_strength: params.ssao_strength,
            curves: Curves::new(params.half_circle_resolution, params.ssao_resolution),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn wall_span(&self, distance: f64) -> WallSpan {
        let h = self.height as i64;
        // NaN becomes 0 and infinity saturates, neither panics. Zero of
        // either sign means the eye is on the face.
        let line_height = if distance <= 0.0 { i64::MAX } else { (self.height as f64 / distance) as i64 };
        let line_height = line_height.max(0);
        let end = (h.saturating_add(line_height).saturating_add(1) / 2).clamp((h + 1) / 2, h);
        WallSpan {
            line_height,
            start: (h - end) as usize,
            end: end as usize,
        }
    }

    /// Rows of a portal wall's span that show the scene behind it: a circle
    /// centred on the horizon whose half-height follows the hit's position
    /// along the face.
    fn aperture(&self, hit: &RayHit, span: WallSpan) -> Range<usize> {
        let center = self.height as f64 / 2.0;
        let radius = self.curves.half_circle.sample(hit.wall_x) * span.line_height as f64;
        let clamp = |v: f64| (v.round().max(0.0) as usize).clamp(span.start, span.end);
        clamp(center - radius)..clamp(center + radius)
    }

    /// Resolves which chain hit owns each row and reports the result as
    /// segments, farthest layer first.
    pub fn compose(&self, chain: &[RayHit], mut emit: impl FnMut(Segment)) {
        let Some(last) = chain.len().checked_sub(1) else { return };

        // windows[i]: rows still visible when looking through hits 0..i.
        let mut windows = Vec::with_capacity(chain.len());
        let mut spans = Vec::with_capacity(chain.len());
        let mut window = 0..self.height;
        for (i, hit) in chain.iter().enumerate() {
            let span = self.wall_span(hit.distance);
            windows.push(window.clone());
            spans.push(span);
            if i < last {
                window = intersect(&window, &self.aperture(hit, span));
            }
        }

        for layer in (0..chain.len()).rev() {
            let own = &windows[layer];
            let span = spans[layer];
            let mut classify = |rows: Range<usize>| {
                for (kind, part) in [
                    (SegmentKind::Ceiling, intersect(&rows, &(0..span.start))),
                    (SegmentKind::Wall, intersect(&rows, &(span.start..span.end))),
                    (SegmentKind::Floor, intersect(&rows, &(span.end..self.height))),
                ] {
                    if !part.is_empty() {
                        emit(Segment { rows: part, layer, kind });
                    }
                }
            };

            match windows.get(layer + 1) {
                Some(inner) if layer < last && !inner.is_empty() => {
                    classify(own.start..inner.start);
                    classify(inner.end..own.end);
                }
                _ => classify(own.clone()),
            }
        }
    }

    /// Paints the column for `chain` into `column`, which holds one pixel per
    /// screen row, top to bottom.
    pub fn paint_column(&self, chain: &[RayHit], column: &mut [u32]) -> Result<()> {
        if chain.is_empty() {
            anyhow::bail!("cannot paint a column from an empty ray chain.");
        }
        if column.len() != self.height {
            anyhow::bail!(
                "column buffer holds {} rows, expected {}.",
                column.len(),
                self.height
            );
        }

        self.compose(chain, |segment| {
            let hit = &chain[segment.layer];
            match segment.kind {
                SegmentKind::Wall => {
                    let span = self.wall_span(hit.distance);
                    for y in segment.rows {
                        column[y] = self.wall_color(hit, span, y);
                    }
                }
                SegmentKind::Floor => {
                    for y in segment.rows {
                        column[y] = FLOOR_COLORS[self.checker(hit, y)];
                    }
                }
                SegmentKind::Ceiling => {
                    for y in segment.rows {
                        column[y] = CEILING_COLORS[self.checker(hit, self.height - 1 - y)];
                    }
                }
            }
        });
        Ok(())
    }

    /// Flat directional colour, dimmed with distance and darkened towards the
    /// top and bottom edges of the wall.
    pub fn wall_color(&self, hit: &RayHit, span: WallSpan, y: usize) -> u32 {
        let base: i64 = if hit.side == 0 { 255 } else { 150 };
        let intensity = base.saturating_sub((2.0 * hit.distance) as i64).max(0) as f64;

        let t = if span.line_height > 0 {
            let top = (self.height as f64 - span.line_height as f64) / 2.0;
            (y as f64 - top) / span.line_height as f64
        } else {
            0.5
        };
        let value = (intensity * (1.0 - self.ssao_strength * self.curves.ssao.sample(t))) as u32;
        let value = value.min(255);

        let (r, g, b) = match hit.hit_direction {
            CardinalDirection::North => (0, 0, value),
            CardinalDirection::South => (0, value, 0),
            CardinalDirection::East => (value, 0, 0),
            CardinalDirection::West => (0, value, value),
        };
        0xFF00_0000 | (r << 16) | (g << 8) | b
    }

    /// Checkerboard index of the floor point seen at screen row `y` (a row
    /// below the horizon), interpolated between the wall hit and the origin.
    fn checker(&self, hit: &RayHit, y: usize) -> usize {
        let point = self.floor_point(hit, y);
        (point.x.floor() as i64 + point.y.floor() as i64).rem_euclid(2) as usize
    }

    pub fn floor_point(&self, hit: &RayHit, y: usize) -> Vec2 {
        let h = self.height as f64;
        let current_dist = h / (2.0 * y as f64 - h).max(1.0);
        let weight = current_dist / hit.distance;
        hit.wall_point() * weight + hit.origin * (1.0 - weight)
    }
}

fn intersect(a: &Range<usize>, b: &Range<usize>) -> Range<usize> {
    let start = a.start.max(b.start);
    let end = a.end.min(b.end).max(start);
    start..end
}
