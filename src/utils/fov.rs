//! # Field of View
//!
//! Symmetric shadowcasting over a [`Level`].
//!
//! The level is scanned in four quadrants, row by row outwards from the
//! viewer. Slopes are kept as exact integer fractions so results never depend
//! on floating point rounding. Floor tiles are only revealed when the viewer
//! would also be visible from them, which makes sight between floor tiles
//! symmetric.

use crate::{Level, Position};
use std::collections::HashSet;

/// A slope `num / den` with `den > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slope {
    num: i64,
    den: i64,
}

impl Slope {
    fn new(num: i64, den: i64) -> Self {
        Self { num, den }
    }

    /// Slope through the near-left corner of the tile at `(depth, col)`.
    fn of_tile(depth: i64, col: i64) -> Self {
        Self::new(2 * col - 1, 2 * depth)
    }
}

/// One row of a quadrant scan.
#[derive(Debug, Clone, Copy)]
struct Row {
    depth: i64,
    start: Slope,
    end: Slope,
}

impl Row {
    fn first() -> Self {
        Self {
            depth: 1,
            start: Slope::new(-1, 1),
            end: Slope::new(1, 1),
        }
    }

    fn next(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..*self
        }
    }

    /// Column range covered by this row, ties rounded towards the row's interior.
    fn columns(&self) -> std::ops::RangeInclusive<i64> {
        // floor(depth * start + 1/2)
        let min_col = (2 * self.depth * self.start.num + self.start.den).div_euclid(2 * self.start.den);
        // ceil(depth * end - 1/2)
        let max_col = -((self.end.den - 2 * self.depth * self.end.num).div_euclid(2 * self.end.den));
        min_col..=max_col
    }

    /// Whether a column lies inside the row's slopes, which is the symmetry condition.
    fn is_symmetric(&self, col: i64) -> bool {
        col * self.start.den >= self.depth * self.start.num
            && col * self.end.den <= self.depth * self.end.num
    }
}

#[derive(Debug, Clone, Copy)]
enum Quadrant {
    North,
    East,
    South,
    West,
}

impl Quadrant {
    const ALL: [Quadrant; 4] = [Quadrant::North, Quadrant::East, Quadrant::South, Quadrant::West];

    fn transform(self, origin: Position, depth: i64, col: i64) -> Position {
        let (depth, col) = (depth as i32, col as i32);
        match self {
            Quadrant::North => Position::new(origin.x + col, origin.y - depth),
            Quadrant::South => Position::new(origin.x + col, origin.y + depth),
            Quadrant::East => Position::new(origin.x + depth, origin.y + col),
            Quadrant::West => Position::new(origin.x - depth, origin.y + col),
        }
    }
}

/// Computes the set of positions visible from `origin`.
///
/// A position is in range when `dx² + dy² <= radius²`; a radius of 0 means
/// unlimited. The origin is always visible. Positions outside the level stop
/// light but are never reported. With `light_walls` the walls bounding the
/// visible area are reported as well.
///
/// # Examples
///
/// ```
/// use tombs::{compute_fov, Level, Position};
///
/// let level = Level::from_ascii(&[
///     "#######",
///     "#.....#",
///     "#..#..#",
///     "#######",
/// ]);
/// let visible = compute_fov(&level, Position::new(1, 1), 0, true);
/// assert!(visible.contains(&Position::new(5, 1)));
/// assert!(visible.contains(&Position::new(0, 0)));
/// ```
pub fn compute_fov(level: &Level, origin: Position, radius: u32, light_walls: bool) -> HashSet<Position> {
    let mut visible = HashSet::new();
    if level.is_valid_position(origin) {
        visible.insert(origin);
    }

    let radius_squared = radius as i64 * radius as i64;
    let in_range = |pos: Position| radius == 0 || pos.distance_squared(origin) <= radius_squared;
    let max_depth = if radius == 0 {
        level.width.max(level.height) as i64
    } else {
        radius as i64
    };

    for quadrant in Quadrant::ALL {
        let mut rows = vec![Row::first()];

        while let Some(mut row) = rows.pop() {
            if row.depth > max_depth {
                continue;
            }

            // None until the first tile of the row, then whether it was a wall
            let mut previous_was_wall: Option<bool> = None;

            for col in row.columns() {
                let pos = quadrant.transform(origin, row.depth, col);
                let is_wall = level.blocks_sight(pos);
                let revealable = level.is_valid_position(pos) && in_range(pos);

                if revealable && ((is_wall && light_walls) || row.is_symmetric(col)) {
                    visible.insert(pos);
                }

                match previous_was_wall {
                    Some(true) if !is_wall => {
                        row.start = Slope::of_tile(row.depth, col);
                    }
                    Some(false) if is_wall => {
                        let mut next_row = row.next();
                        next_row.end = Slope::of_tile(row.depth, col);
                        rows.push(next_row);
                    }
                    _ => {}
                }
                previous_was_wall = Some(is_wall);
            }

            if previous_was_wall == Some(false) {
                rows.push(row.next());
            }
        }
    }

    visible
}

/// The player's current field of view, recomputed lazily.
///
/// Callers mark the view dirty when the viewer moves or the level changes;
/// [`FieldOfView::refresh`] then recomputes it and marks every visible tile
/// explored.
#[derive(Debug, Clone)]
pub struct FieldOfView {
    pub radius: u32,
    pub light_walls: bool,
    visible: HashSet<Position>,
    dirty: bool,
}

impl FieldOfView {
    /// Creates an empty, dirty view.
    pub fn new(radius: u32, light_walls: bool) -> Self {
        Self {
            radius,
            light_walls,
            visible: HashSet::new(),
            dirty: true,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Recomputes the view if dirty. Returns whether anything was recomputed.
    pub fn refresh(&mut self, level: &mut Level, origin: Position) -> bool {
        if !self.dirty {
            return false;
        }
        self.visible = compute_fov(level, origin, self.radius, self.light_walls);
        for pos in &self.visible {
            level.mark_explored(*pos);
        }
        self.dirty = false;
        true
    }

    pub fn is_visible(&self, pos: Position) -> bool {
        self.visible.contains(&pos)
    }

    pub fn visible_positions(&self) -> &HashSet<Position> {
        &self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_room() -> Level {
        Level::from_ascii(&[
            "###########",
            "#.........#",
            "#.........#",
            "#.........#",
            "#.........#",
            "#.........#",
            "###########",
        ])
    }

    #[test]
    fn test_origin_always_visible() {
        let level = Level::new(5, 5);
        let visible = compute_fov(&level, Position::new(2, 2), 3, true);
        assert!(visible.contains(&Position::new(2, 2)));
    }

    #[test]
    fn test_open_room_fully_visible() {
        let level = open_room();
        let visible = compute_fov(&level, Position::new(5, 3), 0, true);
        for y in 0..7 {
            for x in 0..11 {
                assert!(visible.contains(&Position::new(x, y)), "({}, {}) hidden", x, y);
            }
        }
    }

    #[test]
    fn test_radius_limits_view() {
        let level = open_room();
        let origin = Position::new(1, 3);
        let visible = compute_fov(&level, origin, 3, true);
        assert!(visible.contains(&Position::new(4, 3)));
        assert!(!visible.contains(&Position::new(5, 3)));
        assert!(visible.iter().all(|pos| pos.distance_squared(origin) <= 9));
    }

    #[test]
    fn test_pillar_casts_shadow() {
        let level = Level::from_ascii(&[
            "#########",
            "#.......#",
            "#..#....#",
            "#.......#",
            "#########",
        ]);
        let visible = compute_fov(&level, Position::new(1, 2), 0, true);
        assert!(visible.contains(&Position::new(3, 2))); // The pillar itself
        assert!(!visible.contains(&Position::new(5, 2))); // Straight behind it
        assert!(visible.contains(&Position::new(5, 1)));
    }

    #[test]
    fn test_walls_hidden_without_light_walls() {
        let level = Level::from_ascii(&["#####", "#...#", "#####"]);
        let lit = compute_fov(&level, Position::new(1, 1), 0, true);
        let unlit = compute_fov(&level, Position::new(1, 1), 0, false);
        assert!(unlit.len() <= lit.len());
        assert!(unlit.contains(&Position::new(3, 1)));
    }

    #[test]
    fn test_out_of_bounds_never_reported() {
        let level = Level::from_ascii(&["...", "...", "..."]);
        let visible = compute_fov(&level, Position::new(0, 0), 0, true);
        assert!(visible.iter().all(|pos| level.is_valid_position(*pos)));
        assert_eq!(visible.len(), 9);
    }

    #[test]
    fn test_refresh_marks_explored_only_when_dirty() {
        let mut level = open_room();
        let mut fov = FieldOfView::new(2, true);
        assert!(fov.refresh(&mut level, Position::new(2, 2)));
        assert!(level.is_explored(Position::new(2, 2)));
        assert!(!level.is_explored(Position::new(8, 4)));
        assert!(!fov.is_dirty());

        // Clean view is left untouched even though the origin differs
        assert!(!fov.refresh(&mut level, Position::new(8, 4)));
        assert!(!fov.is_visible(Position::new(8, 4)));

        fov.mark_dirty();
        assert!(fov.refresh(&mut level, Position::new(8, 4)));
        assert!(fov.is_visible(Position::new(8, 4)));
        assert!(level.is_explored(Position::new(2, 2)));
    }
}
