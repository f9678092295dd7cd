//! # Persistence
//!
//! Save and load of the complete world state as JSON.
//!
//! Everything the simulation needs to continue is written out: the level with
//! its explored flags, the ordered entity collection, the player and stairs
//! ids, the inventory, depth, message log and play state, plus the generation
//! config, turn number and seed. The field of view is working state and is
//! rebuilt on load.

use crate::config::FOV_LIGHT_WALLS;
use crate::{
    Entity, EntityId, FieldOfView, GameState, GenerationConfig, Level, MessageLog, PlayState,
    TombsError, TombsResult,
};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;

/// Version tag written into every save.
pub const SAVE_FORMAT_VERSION: u32 = 1;

/// On-disk shape of a saved game.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SaveData {
    version: u32,
    level: Level,
    entities: Vec<Entity>,
    player_id: EntityId,
    stairs_id: EntityId,
    inventory: Vec<Entity>,
    depth: u32,
    messages: MessageLog,
    play_state: PlayState,
    config: GenerationConfig,
    turn_number: u64,
    rng_seed: u64,
}

impl GameState {
    /// Serializes the world into an opaque blob.
    ///
    /// # Examples
    ///
    /// ```
    /// use tombs::{GameState, GenerationConfig};
    ///
    /// let game = GameState::new_game(GenerationConfig::for_testing(11)).unwrap();
    /// let bytes = game.save().unwrap();
    /// let restored = GameState::load(&bytes).unwrap();
    /// assert_eq!(restored.entities, game.entities);
    /// assert_eq!(restored.player_id, game.player_id);
    /// ```
    pub fn save(&self) -> TombsResult<Vec<u8>> {
        let data = SaveData {
            version: SAVE_FORMAT_VERSION,
            level: self.level.clone(),
            entities: self.entities.clone(),
            player_id: self.player_id,
            stairs_id: self.stairs_id,
            inventory: self.inventory.clone(),
            depth: self.depth,
            messages: self.messages.clone(),
            play_state: self.play_state,
            config: self.config.clone(),
            turn_number: self.turn_number,
            rng_seed: self.rng_seed,
        };
        Ok(serde_json::to_vec(&data)?)
    }

    /// Restores a world from a blob produced by [`GameState::save`].
    ///
    /// The random number generator is re-seeded from the session seed and the
    /// turn number, so a loaded game is deterministic but does not replay the
    /// exact stream of the session that saved it.
    pub fn load(bytes: &[u8]) -> TombsResult<Self> {
        let data: SaveData = serde_json::from_slice(bytes)
            .map_err(|e| TombsError::CorruptSave(e.to_string()))?;

        if data.version != SAVE_FORMAT_VERSION {
            return Err(TombsError::CorruptSave(format!(
                "Unsupported save version {}",
                data.version
            )));
        }
        if !data.level.is_well_formed() {
            return Err(TombsError::CorruptSave(format!(
                "Level grid does not match its {}x{} size",
                data.level.width, data.level.height
            )));
        }
        let has = |id: EntityId| data.entities.iter().any(|entity| entity.id == id);
        if !has(data.player_id) {
            return Err(TombsError::CorruptSave("Player entity is missing".to_string()));
        }
        if !has(data.stairs_id) {
            return Err(TombsError::CorruptSave("Stairs entity is missing".to_string()));
        }

        let rng = StdRng::seed_from_u64(data.rng_seed.wrapping_add(data.turn_number));
        let mut state = Self::assemble(
            data.level,
            data.entities,
            data.player_id,
            data.stairs_id,
            data.config,
            rng,
        );
        state.inventory = data.inventory;
        state.depth = data.depth;
        state.messages = data.messages;
        state.play_state = data.play_state;
        state.turn_number = data.turn_number;
        state.rng_seed = data.rng_seed;
        state.fov = FieldOfView::new(state.config.fov_radius, FOV_LIGHT_WALLS);
        state.refresh_visibility()?;

        info!(
            "Loaded game at depth {} on turn {}",
            state.depth, state.turn_number
        );
        Ok(state)
    }

    /// Writes a save to a file, replacing any existing one.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> TombsResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.save()?)?;
        info!("Saved game to {}", path.display());
        Ok(())
    }

    /// Loads a save from a file.
    ///
    /// A missing file is [`TombsError::SaveNotFound`].
    pub fn load_from_file(path: impl AsRef<Path>) -> TombsResult<Self> {
        let path = path.as_ref();
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(TombsError::SaveNotFound),
            Err(e) => return Err(e.into()),
        };
        info!("Loading game from {}", path.display());
        Self::load(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, Intent, NoTarget};

    #[test]
    fn test_round_trip_preserves_world() {
        let mut game = GameState::new_game(GenerationConfig::for_testing(21)).unwrap();
        game.submit_intent(Intent::Wait, &mut NoTarget).unwrap();
        game.submit_intent(Intent::Move(Direction::East), &mut NoTarget)
            .unwrap();

        let restored = GameState::load(&game.save().unwrap()).unwrap();
        assert_eq!(restored.level, game.level);
        assert_eq!(restored.entities, game.entities);
        assert_eq!(restored.inventory, game.inventory);
        assert_eq!(restored.messages, game.messages);
        assert_eq!(restored.turn_number, game.turn_number);
        assert_eq!(restored.stairs_id, game.stairs_id);
        assert_eq!(
            restored.fov.visible_positions(),
            game.fov.visible_positions()
        );
    }

    #[test]
    fn test_garbage_is_corrupt() {
        assert!(matches!(
            GameState::load(b"not a save"),
            Err(TombsError::CorruptSave(_))
        ));
    }

    #[test]
    fn test_missing_player_is_corrupt() {
        let mut game = GameState::new_game(GenerationConfig::for_testing(21)).unwrap();
        let player_id = game.player_id;
        game.entities.retain(|entity| entity.id != player_id);
        assert!(matches!(
            GameState::load(&game.save().unwrap()),
            Err(TombsError::CorruptSave(_))
        ));
    }

    #[test]
    fn test_truncated_level_grid_is_corrupt() {
        let game = GameState::new_game(GenerationConfig::for_testing(21)).unwrap();
        let mut value: serde_json::Value = serde_json::from_slice(&game.save().unwrap()).unwrap();
        value["level"]["tiles"].as_array_mut().unwrap().truncate(1);
        let bytes = serde_json::to_vec(&value).unwrap();
        assert!(matches!(
            GameState::load(&bytes),
            Err(TombsError::CorruptSave(_))
        ));

        let mut value: serde_json::Value = serde_json::from_slice(&game.save().unwrap()).unwrap();
        value["level"]["tiles"][3].as_array_mut().unwrap().pop();
        let bytes = serde_json::to_vec(&value).unwrap();
        assert!(matches!(
            GameState::load(&bytes),
            Err(TombsError::CorruptSave(_))
        ));
    }

    #[test]
    fn test_wrong_version_is_corrupt() {
        let game = GameState::new_game(GenerationConfig::for_testing(21)).unwrap();
        let mut value: serde_json::Value = serde_json::from_slice(&game.save().unwrap()).unwrap();
        value["version"] = serde_json::json!(99);
        let bytes = serde_json::to_vec(&value).unwrap();
        assert!(matches!(
            GameState::load(&bytes),
            Err(TombsError::CorruptSave(_))
        ));
    }
}
