//! Integration tests for saving and restoring a session.

use tempfile::TempDir;
use tombs::{
    Ai, Direction, GameState, GenerationConfig, Intent, ItemKind, MonsterKind, NoTarget,
    Position, TombsError, TombsResult,
};

fn game_with_history() -> TombsResult<GameState> {
    let mut game = GameState::new_game(GenerationConfig::for_testing(2468))?;
    for direction in [Direction::North, Direction::East, Direction::South] {
        game.submit_intent(Intent::Move(direction), &mut NoTarget)?;
    }
    Ok(game)
}

#[test]
fn test_confused_monster_survives_round_trip() -> TombsResult<()> {
    let mut game = game_with_history()?;
    let mut orc = MonsterKind::Orc.spawn(Position::new(1, 1));
    orc.ai = Some(Ai::confused(Ai::Basic, 3));
    let orc = game.spawn(orc);

    let restored = GameState::load(&game.save()?)?;
    assert_eq!(
        restored.entity(orc).and_then(|entity| entity.ai.clone()),
        Some(Ai::confused(Ai::Basic, 3))
    );
    // Collection order is the update order and must not change
    let ids: Vec<_> = game.entities.iter().map(|entity| entity.id).collect();
    let restored_ids: Vec<_> = restored.entities.iter().map(|entity| entity.id).collect();
    assert_eq!(ids, restored_ids);
    Ok(())
}

#[test]
fn test_everything_persisted_comes_back() -> TombsResult<()> {
    let mut game = game_with_history()?;
    game.inventory.push(ItemKind::ConfusionScroll.spawn(Position::origin()));
    game.depth = 3;

    let restored = GameState::load(&game.save()?)?;
    assert_eq!(restored.level, game.level);
    assert_eq!(restored.entities, game.entities);
    assert_eq!(restored.inventory, game.inventory);
    assert_eq!(restored.player_id, game.player_id);
    assert_eq!(restored.stairs_id, game.stairs_id);
    assert_eq!(restored.depth, 3);
    assert_eq!(restored.messages, game.messages);
    assert_eq!(restored.play_state, game.play_state);
    assert_eq!(restored.config, game.config);
    assert_eq!(restored.turn_number, game.turn_number);
    assert_eq!(restored.rng_seed, game.rng_seed);
    assert!(restored.is_visible(restored.player_position()?));
    Ok(())
}

#[test]
fn test_loaded_games_are_deterministic() -> TombsResult<()> {
    let game = game_with_history()?;
    let bytes = game.save()?;
    let mut a = GameState::load(&bytes)?;
    let mut b = GameState::load(&bytes)?;

    for direction in [Direction::West, Direction::West, Direction::North] {
        a.submit_intent(Intent::Move(direction), &mut NoTarget)?;
        b.submit_intent(Intent::Move(direction), &mut NoTarget)?;
    }
    assert_eq!(a.entities, b.entities);
    assert_eq!(a.messages, b.messages);
    Ok(())
}

#[test]
fn test_file_round_trip() -> TombsResult<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("tombs.sav");
    let game = game_with_history()?;

    game.save_to_file(&path)?;
    let restored = GameState::load_from_file(&path)?;
    assert_eq!(restored.entities, game.entities);
    Ok(())
}

#[test]
fn test_missing_file_is_not_found() -> TombsResult<()> {
    let dir = TempDir::new()?;
    let result = GameState::load_from_file(dir.path().join("nothing.sav"));
    assert!(matches!(result, Err(TombsError::SaveNotFound)));
    Ok(())
}

#[test]
fn test_truncated_file_is_corrupt() -> TombsResult<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("broken.sav");
    let bytes = game_with_history()?.save()?;
    std::fs::write(&path, &bytes[..bytes.len() / 2])?;

    let result = GameState::load_from_file(&path);
    assert!(matches!(result, Err(TombsError::CorruptSave(_))));
    Ok(())
}
