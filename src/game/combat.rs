//! # Combat
//!
//! Melee resolution, damage and death.
//!
//! Damage is `power - defence` with no randomness. A hit that would do zero
//! or less is reported as having no effect. Deaths fire exactly once: a dead
//! monster loses its Fighter and so can never die again, and the player's
//! death is guarded by the play state.

use crate::{Color, DeathKind, EntityId, GameState, PlayState, RenderOrder, TombsError, TombsResult};
use log::{debug, info};

/// Upper-cases the first letter of a name for the start of a sentence.
///
/// ```
/// use tombs::capitalize;
///
/// assert_eq!(capitalize("orc"), "Orc");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl GameState {
    /// Resolves a melee attack between two fighters.
    pub fn attack(&mut self, attacker: EntityId, target: EntityId) -> TombsResult<()> {
        let power = self.power(attacker).ok_or_else(|| {
            TombsError::InvalidAction(format!("Entity {} cannot attack", attacker))
        })?;
        let defence = self.defence(target).ok_or_else(|| {
            TombsError::InvalidAction(format!("Entity {} cannot be attacked", target))
        })?;
        let attacker_name = capitalize(&self.entity_or_err(attacker)?.name);
        let target_name = self.entity_or_err(target)?.name.clone();

        let damage = power - defence;
        if damage > 0 {
            self.message(
                format!("{} attacks {} for {} hit points.", attacker_name, target_name, damage),
                Color::WHITE,
            );
            self.take_damage(target, damage)?;
        } else {
            self.message(
                format!("{} attacks {} but it has no effect!", attacker_name, target_name),
                Color::WHITE,
            );
        }
        Ok(())
    }

    /// Applies damage to a fighter. Returns whether the hit killed it.
    ///
    /// Non-positive damage and entities without a Fighter are ignored.
    pub fn take_damage(&mut self, id: EntityId, damage: i32) -> TombsResult<bool> {
        if damage <= 0 {
            return Ok(false);
        }
        let entity = self.entity_mut_or_err(id)?;
        let Some(fighter) = entity.fighter.as_mut() else {
            return Ok(false);
        };
        fighter.hp -= damage;
        debug!("{} takes {} damage ({} hp left)", entity.name, damage, fighter.hp);

        if fighter.hp > 0 {
            return Ok(false);
        }
        let death = fighter.death;
        match death {
            DeathKind::Player => self.player_death(id)?,
            DeathKind::Monster => self.monster_death(id)?,
        }
        Ok(true)
    }

    fn player_death(&mut self, id: EntityId) -> TombsResult<()> {
        if self.play_state == PlayState::Dead {
            return Ok(());
        }
        self.message("You died!", Color::RED);
        self.play_state = PlayState::Dead;

        let player = self.entity_mut_or_err(id)?;
        player.glyph = '%';
        player.color = Color::DARK_RED;
        info!("Player died on turn {}", self.turn_number);
        Ok(())
    }

    /// Turns a monster into inert remains and awards its experience.
    fn monster_death(&mut self, id: EntityId) -> TombsResult<()> {
        let monster = self.entity_mut_or_err(id)?;
        let xp = monster.fighter.take().map(|fighter| fighter.xp).unwrap_or(0);
        let name = monster.name.clone();

        monster.glyph = '%';
        monster.color = Color::DARK_RED;
        monster.blocks = false;
        monster.ai = None;
        monster.name = format!("remains of {}", name);
        monster.render_order = RenderOrder::Corpse;

        self.message(
            format!("{} is dead! You gain {} experience points.", capitalize(&name), xp),
            Color::ORANGE,
        );
        if let Some(fighter) = self.player_mut()?.fighter.as_mut() {
            fighter.xp += xp;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ai, Entity, Fighter, GenerationConfig, Level, MonsterKind, Position};

    fn arena() -> GameState {
        let level = Level::from_ascii(&["#######", "#.....#", "#.....#", "#######"]);
        GameState::new_with_level(
            level,
            Entity::player(Position::new(1, 1)),
            Entity::stairs(Position::new(5, 2)),
            GenerationConfig::for_testing(3),
        )
        .unwrap()
    }

    #[test]
    fn test_monster_death_transition() {
        let mut game = arena();
        let orc = game.spawn(MonsterKind::Orc.spawn(Position::new(2, 1)));

        assert!(game.take_damage(orc, 25).unwrap());
        let remains = game.entity(orc).unwrap();
        assert_eq!(remains.name, "remains of orc");
        assert_eq!(remains.glyph, '%');
        assert!(!remains.blocks);
        assert!(remains.fighter.is_none());
        assert!(remains.ai.is_none());
        assert_eq!(remains.render_order, RenderOrder::Corpse);
        assert_eq!(game.player_fighter().unwrap().xp, 35);

        // Remains cannot die again
        assert!(!game.take_damage(orc, 25).unwrap());
        assert_eq!(game.player_fighter().unwrap().xp, 35);
    }

    #[test]
    fn test_zero_damage_is_ignored() {
        let mut game = arena();
        let orc = game.spawn(MonsterKind::Orc.spawn(Position::new(2, 1)));
        assert!(!game.take_damage(orc, 0).unwrap());
        assert_eq!(game.entity(orc).unwrap().fighter.as_ref().unwrap().hp, 20);
    }

    #[test]
    fn test_player_death_fires_once() {
        let mut game = arena();
        let player = game.player_id;
        assert!(game.take_damage(player, 150).unwrap());
        assert_eq!(game.play_state, PlayState::Dead);
        assert_eq!(game.player().unwrap().glyph, '%');
        // Stats stay readable
        assert_eq!(game.player_fighter().unwrap().hp, -50);

        let deaths_logged = game.messages.iter().filter(|m| m.text == "You died!").count();
        game.take_damage(player, 5).unwrap();
        let after = game.messages.iter().filter(|m| m.text == "You died!").count();
        assert_eq!(deaths_logged, 1);
        assert_eq!(after, 1);
    }

    #[test]
    fn test_attack_messages() {
        let mut game = arena();
        let dummy = Entity::new(Position::new(2, 1), 'd', "dummy", Color::WHITE)
            .blocking()
            .with_fighter(Fighter::new(10, 5, 0, 0, DeathKind::Monster))
            .with_ai(Ai::Basic);
        let dummy = game.spawn(dummy);

        game.attack(game.player_id, dummy).unwrap();
        assert_eq!(
            game.messages.last().unwrap().text,
            "Player attacks dummy but it has no effect!"
        );
    }
}
