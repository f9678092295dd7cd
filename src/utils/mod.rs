//! # Utilities Module
//!
//! Field of view, pathfinding and the small amount of math the spawners need.

pub mod fov;
pub mod math;
pub mod pathfinding;

pub use fov::*;
pub use math::*;
pub use pathfinding::*;
