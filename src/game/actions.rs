//! # Actions
//!
//! Player intents, the outcome of resolving one, and the targeting seam
//! through which item effects ask the driver to pick a tile.
//!
//! The engine never waits on input. An effect that needs a target calls the
//! [`TargetSelector`] handed to [`GameState::submit_intent`](crate::GameState::submit_intent)
//! exactly once; a `None` answer or an unusable tile cancels the effect.

use crate::{Color, Direction, EntityId, Position};
use serde::{Deserialize, Serialize};

/// Stat bonus picked when the player gains a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatChoice {
    /// +20 max hp, healing by the same amount
    Constitution,
    /// +1 power
    Strength,
    /// +1 defence
    Agility,
}

/// Something the player wants to do this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Step in a direction, attacking whatever fighter stands there
    Move(Direction),
    /// Pass the turn
    Wait,
    /// Pick up an item on the player's tile
    PickUp,
    /// Use an inventory item; equipment is toggled instead
    UseItem(EntityId),
    /// Drop an inventory item on the player's tile
    DropItem(EntityId),
    /// Equip or unequip an inventory item
    EquipToggle(EntityId),
    /// Take the stairs the player is standing on
    DescendStairs,
    /// Resolve a pending level-up
    AllocateLevelUpStat(StatChoice),
}

/// How an intent resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionStatus {
    /// The action happened
    Done,
    /// Inventory is full
    Capacity,
    /// The action was attempted but had nothing to act on
    NoEffect,
    /// Targeting was declined or invalid; nothing changed
    Cancelled,
    /// The intent cannot apply in the current play state
    Ignored,
}

/// A line in the message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub color: Color,
}

impl Message {
    pub fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

/// Result of one call to `submit_intent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Whether monsters got to act
    pub turn_consumed: bool,
    pub status: ActionStatus,
    /// Messages raised while resolving the intent, oldest first
    pub notifications: Vec<Message>,
    /// The player is dead
    pub game_over: bool,
    /// The next intent must be `AllocateLevelUpStat`
    pub level_up_pending: bool,
}

/// What an effect wants the driver to pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// A tile holding a monster
    Monster,
    /// Any visible tile
    Tile,
}

/// A single targeting question put to the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetRequest {
    pub kind: TargetKind,
    /// Where the player stands
    pub origin: Position,
    /// Largest allowed distance from the origin, if any
    pub max_range: Option<f64>,
}

/// Supplies target tiles to item effects.
pub trait TargetSelector {
    /// Returns the chosen tile, or `None` to cancel.
    fn select(&mut self, request: &TargetRequest) -> Option<Position>;
}

impl<F> TargetSelector for F
where
    F: FnMut(&TargetRequest) -> Option<Position>,
{
    fn select(&mut self, request: &TargetRequest) -> Option<Position> {
        self(request)
    }
}

/// A selector that always cancels. Useful when no targeting UI exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTarget;

impl TargetSelector for NoTarget {
    fn select(&mut self, _request: &TargetRequest) -> Option<Position> {
        None
    }
}

/// A selector that always answers with the same tile.
#[derive(Debug, Clone, Copy)]
pub struct FixedTarget(pub Position);

impl TargetSelector for FixedTarget {
    fn select(&mut self, _request: &TargetRequest) -> Option<Position> {
        Some(self.0)
    }
}

/// Internal result of resolving a player action before monsters act.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ActionResult {
    pub consumed: bool,
    pub status: ActionStatus,
}

impl ActionResult {
    pub fn turn(status: ActionStatus) -> Self {
        Self {
            consumed: true,
            status,
        }
    }

    pub fn free(status: ActionStatus) -> Self {
        Self {
            consumed: false,
            status,
        }
    }
}
