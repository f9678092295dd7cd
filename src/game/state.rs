//! # Game State Module
//!
//! Central game state management and the turn loop.
//!
//! [`GameState`] owns the current level, every entity on it, the player's
//! inventory and the message log. All mutation goes through `&mut self`
//! methods, so one intent is always fully resolved (player action, monster
//! turns, visibility) before the next can start.

use crate::config::{FOV_LIGHT_WALLS, MESSAGE_LOG_CAPACITY};
use crate::{
    ActionResult, ActionStatus, Color, Direction, Entity, EntityId, Equipment, FieldOfView,
    Fighter, GenerationConfig, Generator, Intent, ItemKind, Level, Message, Position,
    RoomCorridorGenerator, StatChoice, TargetSelector, TombsError, TombsResult, TurnOutcome,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Coarse state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayState {
    Playing,
    Dead,
}

/// Bounded log of game messages. The oldest message is dropped once full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
    messages: VecDeque<Message>,
    capacity: usize,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, message: Message) {
        if self.capacity == 0 {
            return;
        }
        while self.messages.len() >= self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// The newest `count` messages, oldest first.
    pub fn recent(&self, count: usize) -> Vec<&Message> {
        let skip = self.messages.len().saturating_sub(count);
        self.messages.iter().skip(skip).collect()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.back()
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(MESSAGE_LOG_CAPACITY)
    }
}

/// Central game state containing all simulation data.
///
/// Entities live in an ordered `Vec`; that order is the order monsters act
/// in and is preserved exactly through save and load.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Tiles of the current level
    pub level: Level,
    /// Everything on the map, in update order
    pub entities: Vec<Entity>,
    pub player_id: EntityId,
    pub stairs_id: EntityId,
    /// Carried items, in pickup order
    pub inventory: Vec<Entity>,
    /// Current dungeon depth, starting at 1
    pub depth: u32,
    pub messages: MessageLog,
    pub play_state: PlayState,
    /// Generation settings, reused for every new level
    pub config: GenerationConfig,
    /// Number of turns consumed so far
    pub turn_number: u64,
    /// Seed the session was started from
    pub rng_seed: u64,
    pub(crate) rng: StdRng,
    pub(crate) fov: FieldOfView,
    /// Messages raised while resolving the current intent
    pub(crate) notifications: Vec<Message>,
}

impl GameState {
    /// Starts a new game: generates depth 1, places the player with a dagger
    /// in hand and computes the initial field of view.
    ///
    /// # Examples
    ///
    /// ```
    /// use tombs::{GameState, GenerationConfig, PlayState};
    ///
    /// let game = GameState::new_game(GenerationConfig::for_testing(12345)).unwrap();
    /// assert_eq!(game.depth, 1);
    /// assert_eq!(game.play_state, PlayState::Playing);
    /// assert_eq!(game.inventory.len(), 1); // Starting dagger
    /// ```
    pub fn new_game(config: GenerationConfig) -> TombsResult<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let generated = RoomCorridorGenerator::new().generate(&config, 1, &mut rng)?;

        let player = Entity::player(generated.player_start);
        let mut entities = generated.entities;
        let player_index = entities.len().min(1);
        entities.insert(player_index, player.clone());

        let mut state = Self::assemble(
            generated.level,
            entities,
            player.id,
            generated.stairs_id,
            config,
            rng,
        );

        let mut dagger = ItemKind::Dagger.spawn(generated.player_start);
        if let Some(equipment) = dagger.equipment.as_mut() {
            equipment.is_equipped = true;
        }
        state.inventory.push(dagger);

        state.message(
            "Welcome stranger! Prepare to perish in the Tombs of the Ancient Kings.",
            Color::RED,
        );
        state.refresh_visibility()?;
        state.notifications.clear();

        info!(
            "New game started with seed {} ({} entities)",
            state.rng_seed,
            state.entities.len()
        );
        Ok(state)
    }

    /// Creates a game on a prepared level with just the stairs and the player.
    ///
    /// Further entities can be added with [`GameState::spawn`]. The inventory
    /// starts empty.
    ///
    /// ```
    /// use tombs::{Entity, GameState, GenerationConfig, Level, Position};
    ///
    /// let level = Level::from_ascii(&["#####", "#...#", "#####"]);
    /// let game = GameState::new_with_level(
    ///     level,
    ///     Entity::player(Position::new(1, 1)),
    ///     Entity::stairs(Position::new(3, 1)),
    ///     GenerationConfig::for_testing(1),
    /// )
    /// .unwrap();
    /// assert_eq!(game.entities.len(), 2);
    /// assert!(game.is_visible(Position::new(3, 1)));
    /// ```
    pub fn new_with_level(
        level: Level,
        player: Entity,
        stairs: Entity,
        config: GenerationConfig,
    ) -> TombsResult<Self> {
        if player.fighter.is_none() {
            return Err(TombsError::InvalidState(
                "The player entity needs a Fighter".to_string(),
            ));
        }
        let rng = StdRng::seed_from_u64(config.seed);
        let (player_id, stairs_id) = (player.id, stairs.id);
        let mut state = Self::assemble(level, vec![stairs, player], player_id, stairs_id, config, rng);
        state.refresh_visibility()?;
        Ok(state)
    }

    pub(crate) fn assemble(
        level: Level,
        entities: Vec<Entity>,
        player_id: EntityId,
        stairs_id: EntityId,
        config: GenerationConfig,
        rng: StdRng,
    ) -> Self {
        Self {
            level,
            entities,
            player_id,
            stairs_id,
            inventory: Vec::new(),
            depth: 1,
            messages: MessageLog::default(),
            play_state: PlayState::Playing,
            rng_seed: config.seed,
            fov: FieldOfView::new(config.fov_radius, FOV_LIGHT_WALLS),
            config,
            turn_number: 0,
            rng,
            notifications: Vec::new(),
        }
    }

    /// Adds an entity to the end of the update order.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.entities.push(entity);
        id
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    pub(crate) fn entity_or_err(&self, id: EntityId) -> TombsResult<&Entity> {
        self.entity(id)
            .ok_or_else(|| TombsError::InvalidState(format!("Entity {} does not exist", id)))
    }

    pub(crate) fn entity_mut_or_err(&mut self, id: EntityId) -> TombsResult<&mut Entity> {
        self.entity_mut(id)
            .ok_or_else(|| TombsError::InvalidState(format!("Entity {} does not exist", id)))
    }

    /// Gets the player entity.
    pub fn player(&self) -> TombsResult<&Entity> {
        self.entity_or_err(self.player_id)
    }

    pub fn player_mut(&mut self) -> TombsResult<&mut Entity> {
        let id = self.player_id;
        self.entity_mut_or_err(id)
    }

    pub fn player_position(&self) -> TombsResult<Position> {
        Ok(self.player()?.position)
    }

    /// Gets the player's Fighter component.
    pub fn player_fighter(&self) -> TombsResult<&Fighter> {
        self.player()?
            .fighter
            .as_ref()
            .ok_or_else(|| TombsError::InvalidState("Player has no Fighter".to_string()))
    }

    pub(crate) fn player_fighter_mut(&mut self) -> TombsResult<&mut Fighter> {
        self.player_mut()?
            .fighter
            .as_mut()
            .ok_or_else(|| TombsError::InvalidState("Player has no Fighter".to_string()))
    }

    /// The stairs entity of the current level.
    pub fn stairs(&self) -> TombsResult<&Entity> {
        self.entity_or_err(self.stairs_id)
    }

    /// Whether terrain or a blocking entity occupies a position.
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.level.is_blocked(pos)
            || self
                .entities
                .iter()
                .any(|entity| entity.blocks && entity.position == pos)
    }

    /// The first entity with a Fighter standing on a position.
    pub fn fighter_at(&self, pos: Position) -> Option<EntityId> {
        self.entities
            .iter()
            .find(|entity| entity.fighter.is_some() && entity.position == pos)
            .map(|entity| entity.id)
    }

    /// Moves an entity by a delta if the destination is free.
    ///
    /// Returns whether the entity moved. Moving into a wall, off the map or
    /// onto a blocking entity does nothing.
    pub fn attempt_move(&mut self, id: EntityId, delta: Position) -> bool {
        let Some(current) = self.entity(id).map(|entity| entity.position) else {
            return false;
        };
        let destination = current + delta;
        if self.is_blocked(destination) {
            return false;
        }
        match self.entity_mut(id) {
            Some(entity) => {
                entity.position = destination;
                true
            }
            None => false,
        }
    }

    /// Sums an equipment bonus over what the entity has equipped.
    ///
    /// Only the player carries an inventory, so other fighters get nothing.
    fn equipment_bonus(&self, id: EntityId, bonus: impl Fn(&Equipment) -> i32) -> i32 {
        if id != self.player_id {
            return 0;
        }
        self.inventory
            .iter()
            .filter_map(|item| item.equipment.as_ref())
            .filter(|equipment| equipment.is_equipped)
            .map(bonus)
            .sum()
    }

    /// Effective attack power: base plus equipment bonuses.
    pub fn power(&self, id: EntityId) -> Option<i32> {
        let base = self.entity(id)?.fighter.as_ref()?.base_power;
        Some(base + self.equipment_bonus(id, |e| e.power_bonus))
    }

    /// Effective defence: base plus equipment bonuses.
    pub fn defence(&self, id: EntityId) -> Option<i32> {
        let base = self.entity(id)?.fighter.as_ref()?.base_defence;
        Some(base + self.equipment_bonus(id, |e| e.defence_bonus))
    }

    /// Effective maximum hit points: base plus equipment bonuses.
    pub fn max_hp(&self, id: EntityId) -> Option<i32> {
        let base = self.entity(id)?.fighter.as_ref()?.base_max_hp;
        Some(base + self.equipment_bonus(id, |e| e.max_hp_bonus))
    }

    /// Restores hit points without exceeding the effective maximum.
    pub fn heal(&mut self, id: EntityId, amount: i32) -> TombsResult<()> {
        let max_hp = self.max_hp(id).unwrap_or(0);
        if let Some(fighter) = self.entity_mut_or_err(id)?.fighter.as_mut() {
            fighter.hp = (fighter.hp + amount).min(max_hp);
        }
        Ok(())
    }

    /// Whether the player can currently see a position.
    pub fn is_visible(&self, pos: Position) -> bool {
        self.fov.is_visible(pos)
    }

    /// Recomputes the field of view if the player moved since the last time.
    pub fn refresh_visibility(&mut self) -> TombsResult<bool> {
        let origin = self.player_position()?;
        Ok(self.fov.refresh(&mut self.level, origin))
    }

    /// Records a message in the log and in the current intent's notifications.
    pub fn message(&mut self, text: impl Into<String>, color: Color) {
        let message = Message::new(text, color);
        self.messages.push(message.clone());
        self.notifications.push(message);
    }

    /// Whether the player has enough experience for the next level.
    pub fn level_up_pending(&self) -> TombsResult<bool> {
        let fighter = self.player_fighter()?;
        Ok(fighter.xp >= fighter.level_up_threshold())
    }

    /// Resolves one player intent and lets the world react.
    ///
    /// Order within a turn: the player's action, then (if it consumed the
    /// turn) every AI-bearing entity in collection order, then visibility,
    /// then the level-up check.
    ///
    /// # Errors
    ///
    /// [`TombsError::LevelUpPending`] for any intent other than
    /// `AllocateLevelUpStat` while a level-up is pending, and
    /// [`TombsError::InvalidAction`] for inventory ids that are not carried or
    /// an allocation with nothing pending.
    pub fn submit_intent(
        &mut self,
        intent: Intent,
        targeting: &mut dyn TargetSelector,
    ) -> TombsResult<TurnOutcome> {
        self.notifications.clear();

        if self.play_state == PlayState::Dead {
            return Ok(self.finish(ActionResult::free(ActionStatus::Ignored), false));
        }

        let pending = self.level_up_pending()?;
        match intent {
            Intent::AllocateLevelUpStat(_) if !pending => {
                return Err(TombsError::InvalidAction(
                    "No level-up is pending".to_string(),
                ));
            }
            Intent::AllocateLevelUpStat(_) => {}
            _ if pending => return Err(TombsError::LevelUpPending),
            _ => {}
        }

        debug!("Turn {}: resolving {:?}", self.turn_number, intent);
        let result = match intent {
            Intent::Move(direction) => self.move_or_attack(direction)?,
            Intent::Wait => ActionResult::turn(ActionStatus::Done),
            Intent::PickUp => self.pick_up()?,
            Intent::UseItem(id) => self.use_item(id, targeting)?,
            Intent::DropItem(id) => self.drop_item(id)?,
            Intent::EquipToggle(id) => self.toggle_equip(id)?,
            Intent::DescendStairs => self.descend_stairs()?,
            Intent::AllocateLevelUpStat(choice) => self.allocate_level_up(choice)?,
        };

        if result.consumed {
            self.turn_number += 1;
            self.run_monster_turns()?;
        }
        self.refresh_visibility()?;

        let level_up_pending = self.play_state == PlayState::Playing && self.level_up_pending()?;
        if level_up_pending {
            let next_level = self.player_fighter()?.level + 1;
            self.message(
                format!(
                    "Your battle skills grow stronger! You reached level {}!",
                    next_level
                ),
                Color::YELLOW,
            );
        }

        Ok(self.finish(result, level_up_pending))
    }

    fn finish(&mut self, result: ActionResult, level_up_pending: bool) -> TurnOutcome {
        TurnOutcome {
            turn_consumed: result.consumed,
            status: result.status,
            notifications: std::mem::take(&mut self.notifications),
            game_over: self.play_state == PlayState::Dead,
            level_up_pending,
        }
    }

    /// Attacks a fighter on the destination tile, otherwise tries to step there.
    ///
    /// Bumping into a wall still spends the turn.
    fn move_or_attack(&mut self, direction: Direction) -> TombsResult<ActionResult> {
        let destination = self.player_position()? + direction.to_delta();
        match self.fighter_at(destination) {
            Some(target) => self.attack(self.player_id, target)?,
            None => {
                if self.attempt_move(self.player_id, direction.to_delta()) {
                    self.fov.mark_dirty();
                }
            }
        }
        Ok(ActionResult::turn(ActionStatus::Done))
    }

    fn descend_stairs(&mut self) -> TombsResult<ActionResult> {
        if self.stairs()?.position != self.player_position()? {
            self.message("There are no stairs here.", Color::WHITE);
            return Ok(ActionResult::free(ActionStatus::NoEffect));
        }
        self.next_level()?;
        Ok(ActionResult::free(ActionStatus::Done))
    }

    /// Rests, then generates the next depth and moves the player onto it.
    ///
    /// The player entity and inventory carry over; everything else on the
    /// old level is discarded.
    pub fn next_level(&mut self) -> TombsResult<()> {
        self.message(
            "You take a moment to rest, and recover your strength.",
            Color::LIGHT_VIOLET,
        );
        let half = self.max_hp(self.player_id).unwrap_or(0) / 2;
        self.heal(self.player_id, half)?;

        self.message(
            "After a rare moment of peace, you descend deeper into the heart of the dungeon...",
            Color::RED,
        );
        self.depth += 1;

        let generated =
            RoomCorridorGenerator::new().generate(&self.config, self.depth, &mut self.rng)?;
        let mut player = self.player()?.clone();
        player.position = generated.player_start;

        let mut entities = generated.entities;
        let player_index = entities.len().min(1);
        entities.insert(player_index, player);

        self.level = generated.level;
        self.entities = entities;
        self.stairs_id = generated.stairs_id;
        self.fov = FieldOfView::new(self.config.fov_radius, FOV_LIGHT_WALLS);
        self.refresh_visibility()?;

        info!("Player descended to depth {}", self.depth);
        Ok(())
    }

    fn allocate_level_up(&mut self, choice: StatChoice) -> TombsResult<ActionResult> {
        let fighter = self.player_fighter_mut()?;
        let threshold = fighter.level_up_threshold();
        fighter.xp -= threshold;
        fighter.level += 1;
        match choice {
            StatChoice::Constitution => {
                fighter.base_max_hp += 20;
                fighter.hp += 20;
            }
            StatChoice::Strength => fighter.base_power += 1,
            StatChoice::Agility => fighter.base_defence += 1,
        }
        let level = fighter.level;
        info!("Player reached level {} choosing {:?}", level, choice);
        Ok(ActionResult::free(ActionStatus::Done))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MonsterKind, NoTarget};

    fn corridor_game() -> GameState {
        let level = Level::from_ascii(&[
            "##########",
            "#........#",
            "#........#",
            "##########",
        ]);
        GameState::new_with_level(
            level,
            Entity::player(Position::new(1, 1)),
            Entity::stairs(Position::new(8, 2)),
            GenerationConfig::for_testing(5),
        )
        .unwrap()
    }

    #[test]
    fn test_message_log_is_bounded() {
        let mut log = MessageLog::new(3);
        for i in 0..5 {
            log.push(Message::new(format!("m{}", i), Color::WHITE));
        }
        assert_eq!(log.len(), 3);
        let texts: Vec<&str> = log.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["m2", "m3", "m4"]);
        assert_eq!(log.recent(2).len(), 2);
        assert_eq!(log.last().unwrap().text, "m4");
    }

    #[test]
    fn test_new_game_places_player_after_stairs() {
        let game = GameState::new_game(GenerationConfig::for_testing(77)).unwrap();
        assert_eq!(game.entities[0].id, game.stairs_id);
        assert_eq!(game.entities[1].id, game.player_id);
        assert!(game.inventory[0].is_equipped());
        assert_eq!(game.power(game.player_id), Some(4)); // 2 + dagger
        assert_eq!(game.messages.len(), 1);
        assert!(game.level.is_explored(game.player_position().unwrap()));
    }

    #[test]
    fn test_move_marks_visibility_dirty_and_refreshes() {
        let mut game = corridor_game();
        let outcome = game
            .submit_intent(Intent::Move(Direction::East), &mut NoTarget)
            .unwrap();
        assert!(outcome.turn_consumed);
        assert_eq!(game.player_position().unwrap(), Position::new(2, 1));
        assert!(!game.fov.is_dirty());
        assert_eq!(game.turn_number, 1);
    }

    #[test]
    fn test_bumping_wall_consumes_turn() {
        let mut game = corridor_game();
        let outcome = game
            .submit_intent(Intent::Move(Direction::North), &mut NoTarget)
            .unwrap();
        assert!(outcome.turn_consumed);
        assert_eq!(game.player_position().unwrap(), Position::new(1, 1));
    }

    #[test]
    fn test_cannot_walk_through_blocking_entities() {
        let mut game = corridor_game();
        let mut orc = MonsterKind::Orc.spawn(Position::new(2, 2));
        orc.ai = None;
        game.spawn(orc);
        assert!(!game.attempt_move(game.player_id, Position::new(1, 1)));
        assert!(game.attempt_move(game.player_id, Position::new(1, 0)));
    }

    #[test]
    fn test_descend_requires_stairs() {
        let mut game = corridor_game();
        let outcome = game
            .submit_intent(Intent::DescendStairs, &mut NoTarget)
            .unwrap();
        assert!(!outcome.turn_consumed);
        assert_eq!(outcome.status, ActionStatus::NoEffect);
        assert_eq!(game.depth, 1);
    }

    #[test]
    fn test_descend_heals_and_generates() {
        let mut game = corridor_game();
        game.player_fighter_mut().unwrap().hp = 10;
        let stairs_pos = game.stairs().unwrap().position;
        game.player_mut().unwrap().position = stairs_pos;
        let old_player = game.player_id;
        let old_stairs = game.stairs_id;

        let outcome = game
            .submit_intent(Intent::DescendStairs, &mut NoTarget)
            .unwrap();
        assert_eq!(outcome.status, ActionStatus::Done);
        assert_eq!(game.depth, 2);
        assert_eq!(game.player_id, old_player);
        assert_eq!(game.player_fighter().unwrap().hp, 60);
        assert_eq!(game.level.width, game.config.width);
        assert_ne!(game.stairs_id, old_stairs);
        assert_eq!(game.player_position().unwrap(), game.entities[1].position);
        assert_eq!(outcome.notifications.len(), 2);
    }

    #[test]
    fn test_level_up_blocks_other_intents() {
        let mut game = corridor_game();
        game.player_fighter_mut().unwrap().xp = 400;
        assert!(game.level_up_pending().unwrap());

        assert!(matches!(
            game.submit_intent(Intent::Wait, &mut NoTarget),
            Err(TombsError::LevelUpPending)
        ));

        game.submit_intent(Intent::AllocateLevelUpStat(StatChoice::Constitution), &mut NoTarget)
            .unwrap();
        let fighter = game.player_fighter().unwrap();
        assert_eq!(fighter.level, 2);
        assert_eq!(fighter.xp, 50);
        assert_eq!(fighter.base_max_hp, 120);
        assert_eq!(fighter.hp, 120);
        assert!(!game.level_up_pending().unwrap());

        assert!(matches!(
            game.submit_intent(Intent::AllocateLevelUpStat(StatChoice::Strength), &mut NoTarget),
            Err(TombsError::InvalidAction(_))
        ));
    }

    #[test]
    fn test_dead_player_intents_are_ignored() {
        let mut game = corridor_game();
        game.play_state = PlayState::Dead;
        let outcome = game
            .submit_intent(Intent::Move(Direction::East), &mut NoTarget)
            .unwrap();
        assert!(!outcome.turn_consumed);
        assert!(outcome.game_over);
        assert_eq!(outcome.status, ActionStatus::Ignored);
        assert_eq!(game.player_position().unwrap(), Position::new(1, 1));
    }
}
