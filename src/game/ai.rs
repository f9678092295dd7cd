//! # Monster AI
//!
//! Turn scheduling for AI-bearing entities.
//!
//! A basic monster only acts while the player can see it. When it is two or
//! more tiles away it walks the A* path towards the player, otherwise it
//! attacks. A confused monster stumbles in a random direction until the
//! confusion runs out and its previous behavior comes back.

use crate::{next_step, Ai, Color, EntityId, GameState, Position, TombsResult};
use log::debug;
use rand::Rng;
use std::collections::HashSet;

impl GameState {
    /// Gives every AI-bearing entity one turn, in collection order.
    pub(crate) fn run_monster_turns(&mut self) -> TombsResult<()> {
        let actors: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|entity| entity.ai.is_some())
            .map(|entity| entity.id)
            .collect();

        for id in actors {
            self.take_turn(id)?;
        }
        Ok(())
    }

    /// Runs one entity's AI. Entities without an AI do nothing.
    pub fn take_turn(&mut self, id: EntityId) -> TombsResult<()> {
        let Some(ai) = self.entity(id).and_then(|entity| entity.ai.clone()) else {
            return Ok(());
        };
        match ai {
            Ai::Basic => self.basic_turn(id),
            Ai::Confused {
                remaining,
                previous,
            } => self.confused_turn(id, remaining, *previous),
        }
    }

    fn basic_turn(&mut self, id: EntityId) -> TombsResult<()> {
        let monster = self.entity_or_err(id)?;
        if !self.is_visible(monster.position) {
            return Ok(());
        }

        let player = self.player()?;
        let (distance, player_position, player_alive) =
            (monster.distance_to(player), player.position, player.is_alive());
        if distance >= 2.0 {
            self.move_astar(id, player_position);
        } else if player_alive {
            self.attack(id, self.player_id)?;
        }
        Ok(())
    }

    /// Steps an entity towards a target, routing around other blockers.
    pub fn move_astar(&mut self, id: EntityId, target: Position) -> bool {
        let Some(from) = self.entity(id).map(|entity| entity.position) else {
            return false;
        };
        let obstacles: HashSet<Position> = self
            .entities
            .iter()
            .filter(|entity| entity.blocks && entity.id != id && entity.position != target)
            .map(|entity| entity.position)
            .collect();

        let step = next_step(&self.level, &obstacles, from, target);
        self.attempt_move(id, step)
    }

    fn confused_turn(&mut self, id: EntityId, remaining: u32, previous: Ai) -> TombsResult<()> {
        if remaining > 0 {
            let step = Position::new(self.rng.gen_range(-1..=1), self.rng.gen_range(-1..=1));
            self.attempt_move(id, step);
            self.entity_mut_or_err(id)?.ai = Some(Ai::confused(previous, remaining - 1));
        } else {
            let entity = self.entity_mut_or_err(id)?;
            entity.ai = Some(previous);
            let name = entity.name.clone();
            debug!("{} recovered from confusion", name);
            self.message(format!("The {} is no longer confused!", name), Color::RED);
        }
        Ok(())
    }
}
