//! # Tombs
//!
//! A turn-based dungeon-crawler simulation engine.
//!
//! ## Architecture Overview
//!
//! Tombs owns the simulation and nothing else. Painting, input decoding and menus
//! belong to whoever drives the engine; they talk to it through a small surface:
//!
//! - **Game State**: [`GameState`] is the single world value threaded through every
//!   operation by exclusive reference
//! - **Entity Model**: plain [`Entity`] values carrying optional Fighter, AI, Item
//!   and Equipment components
//! - **Intents**: the driver submits one [`Intent`] per player action and receives a
//!   [`TurnOutcome`]
//! - **Generation**: room-and-tunnel levels populated from depth-scaled spawn tables
//! - **Utilities**: symmetric shadowcasting field of view and A* pathfinding
//!
//! ## Example
//!
//! ```
//! use tombs::{Direction, GameState, GenerationConfig, Intent, NoTarget};
//!
//! let mut game = GameState::new_game(GenerationConfig::for_testing(7)).unwrap();
//! let outcome = game.submit_intent(Intent::Move(Direction::North), &mut NoTarget).unwrap();
//! assert!(outcome.turn_consumed);
//! let snapshot = game.render_snapshot().unwrap();
//! assert_eq!(snapshot.depth, 1);
//! ```

pub mod game;
pub mod generation;
pub mod rendering;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use rendering::*;
pub use utils::*;

/// Core error type for the Tombs engine.
#[derive(thiserror::Error, Debug)]
pub enum TombsError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// No saved game exists at the requested location
    #[error("No saved game found")]
    SaveNotFound,

    /// Saved data exists but cannot be restored
    #[error("Corrupt save data: {0}")]
    CorruptSave(String),

    /// The player must pick a level-up bonus before doing anything else
    #[error("A level-up choice is pending")]
    LevelUpPending,
}

/// Result type used throughout the Tombs codebase.
pub type TombsResult<T> = Result<T, TombsError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine configuration constants.
pub mod config {
    /// Default dungeon width in tiles
    pub const DEFAULT_DUNGEON_WIDTH: u32 = 80;

    /// Default dungeon height in tiles
    pub const DEFAULT_DUNGEON_HEIGHT: u32 = 43;

    /// Inventory slots (one per letter of the alphabet)
    pub const INVENTORY_CAPACITY: usize = 26;

    /// Sight radius of the player
    pub const TORCH_RADIUS: u32 = 10;

    /// Whether wall tiles bounding the field of view are lit
    pub const FOV_LIGHT_WALLS: bool = true;

    /// Messages kept in the log before the oldest are dropped
    pub const MESSAGE_LOG_CAPACITY: usize = 100;

    /// Experience needed for level 2
    pub const LEVEL_UP_BASE: i32 = 200;

    /// Additional experience needed per level
    pub const LEVEL_UP_FACTOR: i32 = 150;

    /// Hit points restored by a healing potion
    pub const HEAL_AMOUNT: i32 = 40;

    /// Lightning bolt damage and reach
    pub const LIGHTNING_DAMAGE: i32 = 40;
    pub const LIGHTNING_RANGE: f64 = 5.0;

    /// Confusion duration and targeting reach
    pub const CONFUSE_NUM_TURNS: u32 = 10;
    pub const CONFUSE_RANGE: f64 = 8.0;

    /// Fireball blast radius and damage
    pub const FIREBALL_RADIUS: f64 = 3.0;
    pub const FIREBALL_DAMAGE: i32 = 25;
}
