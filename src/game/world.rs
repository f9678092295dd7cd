//! # World Representation
//!
//! Tiles and the fixed-size grid that makes up one dungeon level.

use crate::{Position, TombsError, TombsResult};
use serde::{Deserialize, Serialize};

/// A single map cell.
///
/// A tile that blocks movement also blocks sight unless explicitly overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Movement is impossible through this tile
    pub blocked: bool,
    /// Light does not pass through this tile
    pub blocks_sight: bool,
    /// The player has seen this tile at least once
    pub explored: bool,
}

impl Tile {
    /// Creates a tile; `blocks_sight` defaults to `blocked` when not given.
    ///
    /// # Examples
    ///
    /// ```
    /// use tombs::Tile;
    ///
    /// let wall = Tile::new(true, None);
    /// assert!(wall.blocks_sight);
    ///
    /// let glass = Tile::new(true, Some(false));
    /// assert!(glass.blocked && !glass.blocks_sight);
    /// ```
    pub fn new(blocked: bool, blocks_sight: Option<bool>) -> Self {
        Self {
            blocked,
            blocks_sight: blocks_sight.unwrap_or(blocked),
            explored: false,
        }
    }

    /// Solid rock.
    pub fn wall() -> Self {
        Self::new(true, None)
    }

    /// Open ground.
    pub fn floor() -> Self {
        Self::new(false, None)
    }

    /// Whether this tile is open ground.
    pub fn is_floor(&self) -> bool {
        !self.blocked && !self.blocks_sight
    }
}

/// The tile grid of one dungeon level.
///
/// Tiles are stored row-major: `tiles[y][x]`. Positions outside the grid are
/// treated as blocked, sight-blocking rock by every query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// Width of the level in tiles
    pub width: u32,
    /// Height of the level in tiles
    pub height: u32,
    /// Tile storage, indexed `[y][x]`
    pub tiles: Vec<Vec<Tile>>,
}

impl Level {
    /// Creates a level filled with walls.
    ///
    /// # Examples
    ///
    /// ```
    /// use tombs::{Level, Position};
    ///
    /// let level = Level::new(20, 10);
    /// assert!(level.is_blocked(Position::new(3, 3)));
    /// assert!(level.is_blocked(Position::new(-1, 3))); // Off the map
    /// ```
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tiles: vec![vec![Tile::wall(); width as usize]; height as usize],
        }
    }

    /// Builds a level from rows of text: `#` is wall, anything else is floor.
    ///
    /// Rows shorter than the longest one are padded with wall.
    ///
    /// ```
    /// use tombs::{Level, Position};
    ///
    /// let level = Level::from_ascii(&[
    ///     "#####",
    ///     "#...#",
    ///     "#####",
    /// ]);
    /// assert_eq!(level.width, 5);
    /// assert!(!level.is_blocked(Position::new(2, 1)));
    /// ```
    pub fn from_ascii(rows: &[&str]) -> Self {
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut level = Level::new(width as u32, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch != '#' {
                    level.tiles[y][x] = Tile::floor();
                }
            }
        }
        level
    }

    /// Checks whether a position lies inside the grid.
    pub fn is_valid_position(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// True when the tile rows match the declared width and height.
    pub fn is_well_formed(&self) -> bool {
        self.tiles.len() == self.height as usize
            && self.tiles.iter().all(|row| row.len() == self.width as usize)
    }

    /// Gets a tile by position.
    pub fn get_tile(&self, pos: Position) -> Option<&Tile> {
        if self.is_valid_position(pos) {
            Some(&self.tiles[pos.y as usize][pos.x as usize])
        } else {
            None
        }
    }

    /// Gets a mutable tile by position.
    pub fn get_tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        if self.is_valid_position(pos) {
            Some(&mut self.tiles[pos.y as usize][pos.x as usize])
        } else {
            None
        }
    }

    /// Replaces the tile at a position.
    pub fn set_tile(&mut self, pos: Position, tile: Tile) -> TombsResult<()> {
        let slot = self.get_tile_mut(pos).ok_or_else(|| {
            TombsError::InvalidState(format!("Position {:?} is outside the level", pos))
        })?;
        *slot = tile;
        Ok(())
    }

    /// Opens a tile for movement and sight, keeping its explored flag.
    pub fn carve(&mut self, pos: Position) {
        if let Some(tile) = self.get_tile_mut(pos) {
            tile.blocked = false;
            tile.blocks_sight = false;
        }
    }

    /// Whether movement onto this position is impossible because of terrain.
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.get_tile(pos).map(|tile| tile.blocked).unwrap_or(true)
    }

    /// Whether this position stops light.
    pub fn blocks_sight(&self, pos: Position) -> bool {
        self.get_tile(pos).map(|tile| tile.blocks_sight).unwrap_or(true)
    }

    /// Whether the player has ever seen this position.
    pub fn is_explored(&self, pos: Position) -> bool {
        self.get_tile(pos).map(|tile| tile.explored).unwrap_or(false)
    }

    /// Marks a position as seen. Explored flags are never cleared.
    pub fn mark_explored(&mut self, pos: Position) {
        if let Some(tile) = self.get_tile_mut(pos) {
            tile.explored = true;
        }
    }

    /// Iterates over every position that can be walked on.
    pub fn open_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.tiles.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, tile)| !tile.blocked)
                .map(move |(x, _)| Position::new(x as i32, y as i32))
        })
    }

    /// Number of explored tiles.
    pub fn explored_count(&self) -> usize {
        self.tiles
            .iter()
            .flat_map(|row| row.iter())
            .filter(|tile| tile.explored)
            .count()
    }
}
