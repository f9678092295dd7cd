//! # Generation Module
//!
//! Procedural content generation for dungeon levels and their inhabitants.
//!
//! A level is built by [`RoomCorridorGenerator`], which carves rooms and
//! tunnels and then asks the spawn tables in [`encounters`] and [`items`] to
//! populate each room. Everything is driven by a caller-supplied [`StdRng`] so
//! a seed reproduces the same dungeon.

pub mod dungeon;
pub mod encounters;
pub mod items;

pub use dungeon::*;
pub use encounters::*;
pub use items::*;

use crate::{config, Entity, EntityId, Level, Position, TombsError, TombsResult};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for procedural generation.
///
/// Loadable from JSON so a run can be reproduced from a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Level width in tiles
    pub width: u32,
    /// Level height in tiles
    pub height: u32,
    /// Minimum room size, walls included
    pub min_room_size: u32,
    /// Maximum room size, walls included
    pub max_room_size: u32,
    /// Number of room placement attempts per level
    pub max_rooms: u32,
    /// Player sight radius, 0 for unlimited
    pub fov_radius: u32,
}

impl GenerationConfig {
    /// Creates the standard configuration for a seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use tombs::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(1234);
    /// assert_eq!(config.width, 80);
    /// assert!(config.max_room_size >= config.min_room_size);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: config::DEFAULT_DUNGEON_WIDTH,
            height: config::DEFAULT_DUNGEON_HEIGHT,
            min_room_size: 6,
            max_room_size: 10,
            max_rooms: 30,
            fov_radius: config::TORCH_RADIUS,
        }
    }

    /// Creates a configuration for testing with smaller levels.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            width: 40,
            height: 25,
            min_room_size: 4,
            max_room_size: 8,
            max_rooms: 12,
            fov_radius: config::TORCH_RADIUS,
        }
    }

    /// Reads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> TombsResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: GenerationConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that rooms of the configured size can exist at all.
    pub fn validate(&self) -> TombsResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TombsError::GenerationFailed(
                "Level dimensions must be positive".to_string(),
            ));
        }
        if self.min_room_size == 0 || self.min_room_size > self.max_room_size {
            return Err(TombsError::GenerationFailed(format!(
                "Invalid room size range {}..={}",
                self.min_room_size, self.max_room_size
            )));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// A rectangular room used while carving a level.
///
/// The far edge is exclusive for the interior: a room spanning `x1..=x2`
/// has floor on `x1 + 1 .. x2`, leaving a wall on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Room {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Room {
    /// Creates a room from its top-left corner and size.
    ///
    /// # Examples
    ///
    /// ```
    /// use tombs::{Position, Room};
    ///
    /// let room = Room::new(5, 5, 10, 8);
    /// assert_eq!(room.center(), Position::new(10, 9));
    /// assert_eq!(room.interior().count(), 9 * 7);
    /// ```
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width as i32,
            y2: y + height as i32,
        }
    }

    /// Gets the center position of the room.
    pub fn center(&self) -> Position {
        Position::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    /// Checks if this room overlaps or touches another room.
    pub fn intersects(&self, other: &Room) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }

    /// Iterates over the floor positions carved for this room.
    pub fn interior(&self) -> impl Iterator<Item = Position> {
        let (x1, x2) = (self.x1, self.x2);
        ((self.y1 + 1)..self.y2).flat_map(move |y| ((x1 + 1)..x2).map(move |x| Position::new(x, y)))
    }
}

/// A freshly generated level and everything placed on it.
#[derive(Debug, Clone)]
pub struct GeneratedLevel {
    pub level: Level,
    /// Stairs first, then monsters and items in placement order
    pub entities: Vec<Entity>,
    pub player_start: Position,
    pub stairs_position: Position,
    pub stairs_id: EntityId,
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content for a dungeon depth.
    fn generate(&self, config: &GenerationConfig, depth: u32, rng: &mut StdRng) -> TombsResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> TombsResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}
