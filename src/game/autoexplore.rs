//! # Autoexplore Module
//!
//! Debug autopilot that proposes the next player intent.
//!
//! Used by the headless driver to play a session without input. Priorities,
//! highest first: resolve a pending level-up, pick up items underfoot, attack
//! an adjacent monster, take the stairs when standing on them, otherwise walk
//! towards the stairs.

use crate::config::INVENTORY_CAPACITY;
use crate::{
    find_path, Direction, GameState, Intent, PlayState, Position, StatChoice, TombsResult,
};
use std::collections::HashSet;

/// Autoexplore state and functionality for debug mode.
#[derive(Debug, Clone)]
pub struct AutoexploreState {
    /// Whether autoexplore is currently enabled
    pub enabled: bool,
    /// Remaining steps of the path being followed, next step first
    pub current_path: Vec<Position>,
    /// Where the current path leads
    pub target: Option<Position>,
    /// Stat picked whenever a level-up is pending
    pub level_up_choice: StatChoice,
}

impl AutoexploreState {
    /// Creates a new, enabled autopilot.
    pub fn new() -> Self {
        Self {
            enabled: true,
            current_path: Vec::new(),
            target: None,
            level_up_choice: StatChoice::Constitution,
        }
    }

    /// Toggles autoexplore on/off.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        if !self.enabled {
            self.current_path.clear();
            self.target = None;
        }
        self.enabled
    }

    /// Gets the next intent to submit, or `None` when there is nothing to do.
    ///
    /// # Examples
    ///
    /// ```
    /// use tombs::{AutoexploreState, GameState, GenerationConfig, NoTarget};
    ///
    /// let mut game = GameState::new_game(GenerationConfig::for_testing(5)).unwrap();
    /// let mut autopilot = AutoexploreState::new();
    /// if let Some(intent) = autopilot.next_intent(&game).unwrap() {
    ///     game.submit_intent(intent, &mut NoTarget).unwrap();
    /// }
    /// ```
    pub fn next_intent(&mut self, game: &GameState) -> TombsResult<Option<Intent>> {
        if !self.enabled || game.play_state == PlayState::Dead {
            return Ok(None);
        }
        if game.level_up_pending()? {
            return Ok(Some(Intent::AllocateLevelUpStat(self.level_up_choice)));
        }

        let here = game.player_position()?;
        let item_here = game
            .entities
            .iter()
            .any(|entity| entity.item.is_some() && entity.position == here);
        if item_here && game.inventory.len() < INVENTORY_CAPACITY {
            return Ok(Some(Intent::PickUp));
        }

        if let Some(direction) = self.adjacent_monster(game, here) {
            self.current_path.clear();
            return Ok(Some(Intent::Move(direction)));
        }

        let stairs = game.stairs()?.position;
        if stairs == here {
            self.current_path.clear();
            self.target = None;
            return Ok(Some(Intent::DescendStairs));
        }

        Ok(Some(match self.step_towards(game, here, stairs) {
            Some(direction) => Intent::Move(direction),
            None => Intent::Wait,
        }))
    }

    fn adjacent_monster(&self, game: &GameState, here: Position) -> Option<Direction> {
        game.entities
            .iter()
            .filter(|entity| entity.id != game.player_id && entity.fighter.is_some())
            .find_map(|entity| Direction::from_delta(entity.position - here))
    }

    /// Follows the cached path, replanning when it no longer fits.
    fn step_towards(&mut self, game: &GameState, here: Position, goal: Position) -> Option<Direction> {
        let usable = self.target == Some(goal)
            && self
                .current_path
                .first()
                .map(|next| Direction::from_delta(*next - here).is_some() && !game.is_blocked(*next))
                .unwrap_or(false);

        if !usable {
            let obstacles: HashSet<Position> = game
                .entities
                .iter()
                .filter(|entity| entity.blocks && entity.id != game.player_id)
                .map(|entity| entity.position)
                .collect();
            let path = find_path(&game.level, &obstacles, here, goal)?;
            self.current_path = path.into_iter().skip(1).collect();
            self.target = Some(goal);
        }

        if self.current_path.is_empty() {
            return None;
        }
        let next = self.current_path.remove(0);
        Direction::from_delta(next - here)
    }
}

impl Default for AutoexploreState {
    fn default() -> Self {
        Self::new()
    }
}
