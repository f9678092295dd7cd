//! # Rendering Module
//!
//! Read-only views of the game for front-ends, plus an ASCII renderer used by
//! the headless driver.
//!
//! The engine never draws anything itself. [`GameState::render_snapshot`](crate::GameState::render_snapshot)
//! captures what the player can see; [`AsciiDisplay`] turns that into text.

pub mod display;
pub mod snapshot;
pub mod ui;

pub use display::*;
pub use snapshot::*;
pub use ui::*;
