//! Integration tests for turn resolution: combat, progression, inventory and
//! monster movement.

use std::collections::HashSet;
use tombs::{
    next_step, step_towards, ActionStatus, Color, DeathKind, Direction, Entity, EntityId,
    Equipment, Fighter, GameState, GenerationConfig, Intent, ItemKind, Level, MonsterKind,
    NoTarget, PlayState, Position, Slot, TombsResult,
};

fn arena() -> GameState {
    let level = Level::from_ascii(&[
        "##########",
        "#........#",
        "#........#",
        "#........#",
        "##########",
    ]);
    GameState::new_with_level(
        level,
        Entity::player(Position::new(2, 2)),
        Entity::stairs(Position::new(8, 3)),
        GenerationConfig::for_testing(17),
    )
    .unwrap()
}

fn dummy(game: &mut GameState, pos: Position, defence: i32, power: i32) -> EntityId {
    let entity = Entity::new(pos, 'd', "dummy", Color::WHITE)
        .blocking()
        .with_fighter(Fighter::new(30, defence, power, 10, DeathKind::Monster));
    game.spawn(entity)
}

fn hp(game: &GameState, id: EntityId) -> i32 {
    game.entity(id).unwrap().fighter.as_ref().unwrap().hp
}

#[test]
fn test_damage_is_power_minus_defence() -> TombsResult<()> {
    let mut game = arena();
    let attacker = dummy(&mut game, Position::new(5, 1), 0, 5);
    let defender = dummy(&mut game, Position::new(6, 1), 2, 0);

    game.attack(attacker, defender)?;
    assert_eq!(hp(&game, defender), 27);
    assert_eq!(
        game.messages.last().unwrap().text,
        "Dummy attacks dummy for 3 hit points."
    );
    Ok(())
}

#[test]
fn test_weak_attack_has_no_effect() -> TombsResult<()> {
    let mut game = arena();
    let attacker = dummy(&mut game, Position::new(5, 1), 0, 2);
    let defender = dummy(&mut game, Position::new(6, 1), 5, 0);

    game.attack(attacker, defender)?;
    assert_eq!(hp(&game, defender), 30);
    assert!(game.messages.last().unwrap().text.ends_with("but it has no effect!"));
    Ok(())
}

#[test]
fn test_experience_is_awarded_once() -> TombsResult<()> {
    let mut game = arena();
    game.player_fighter_mut_for_tests().base_power = 20;
    let orc = game.spawn(MonsterKind::Orc.spawn(Position::new(3, 2)));

    let outcome = game.submit_intent(Intent::Move(Direction::East), &mut NoTarget)?;
    assert!(outcome.turn_consumed);
    assert_eq!(game.entity(orc).unwrap().name, "remains of orc");
    assert_eq!(game.player_fighter()?.xp, 35);

    // The remains no longer fight, so the player walks onto them
    game.submit_intent(Intent::Move(Direction::East), &mut NoTarget)?;
    assert_eq!(game.player_position()?, Position::new(3, 2));
    assert_eq!(game.player_fighter()?.xp, 35);
    Ok(())
}

#[test]
fn test_level_up_is_announced_and_enforced() -> TombsResult<()> {
    let mut game = arena();
    game.player_fighter_mut_for_tests().base_power = 20;
    game.player_fighter_mut_for_tests().xp = 340;
    game.spawn(MonsterKind::Orc.spawn(Position::new(3, 2)));

    let outcome = game.submit_intent(Intent::Move(Direction::East), &mut NoTarget)?;
    assert!(outcome.level_up_pending);
    assert_eq!(
        outcome.notifications.last().unwrap().text,
        "Your battle skills grow stronger! You reached level 2!"
    );
    assert!(game.submit_intent(Intent::Wait, &mut NoTarget).is_err());

    let outcome = game.submit_intent(
        Intent::AllocateLevelUpStat(tombs::StatChoice::Agility),
        &mut NoTarget,
    )?;
    assert!(!outcome.level_up_pending);
    assert_eq!(game.defence(game.player_id), Some(2));
    assert_eq!(game.player_fighter()?.xp, 25);
    Ok(())
}

#[test]
fn test_inventory_capacity() -> TombsResult<()> {
    let mut game = arena();
    let here = game.player_position()?;
    for _ in 0..26 {
        game.inventory.push(ItemKind::HealingPotion.spawn(here));
    }
    let extra = game.spawn(ItemKind::HealingPotion.spawn(here));

    let outcome = game.submit_intent(Intent::PickUp, &mut NoTarget)?;
    assert_eq!(outcome.status, ActionStatus::Capacity);
    assert_eq!(game.inventory.len(), 26);
    assert!(game.entity(extra).is_some());
    assert_eq!(
        outcome.notifications[0].text,
        "Your inventory is full, cannot pick up healing potion."
    );
    Ok(())
}

#[test]
fn test_derived_stats_follow_equipment() -> TombsResult<()> {
    let mut game = arena();
    game.player_fighter_mut_for_tests().base_power = 4;

    let sword = ItemKind::Sword.spawn(Position::origin());
    let sword_id = sword.id;
    let ring = Entity::new(Position::origin(), '=', "ring", Color::YELLOW)
        .with_equipment(Equipment::new(Slot::LeftHand).with_power(1));
    let ring_id = ring.id;
    game.inventory.push(sword);
    game.inventory.push(ring);

    game.submit_intent(Intent::EquipToggle(sword_id), &mut NoTarget)?;
    game.submit_intent(Intent::EquipToggle(ring_id), &mut NoTarget)?;
    assert_eq!(game.power(game.player_id), Some(8));

    game.submit_intent(Intent::UseItem(sword_id), &mut NoTarget)?;
    assert_eq!(game.power(game.player_id), Some(5));
    Ok(())
}

#[test]
fn test_monsters_act_in_collection_order() -> TombsResult<()> {
    let mut game = arena();
    let mut first = MonsterKind::Orc.spawn(Position::new(3, 2));
    first.name = "first orc".to_string();
    let mut second = MonsterKind::Orc.spawn(Position::new(1, 2));
    second.name = "second orc".to_string();
    game.spawn(first);
    game.spawn(second);

    let outcome = game.submit_intent(Intent::Wait, &mut NoTarget)?;
    let texts: Vec<&str> = outcome
        .notifications
        .iter()
        .map(|message| message.text.as_str())
        .collect();
    assert_eq!(
        texts,
        vec![
            "First orc attacks player for 3 hit points.",
            "Second orc attacks player for 3 hit points.",
        ]
    );
    assert_eq!(game.player_fighter()?.hp, 94);
    Ok(())
}

#[test]
fn test_free_actions_do_not_wake_monsters() -> TombsResult<()> {
    let mut game = arena();
    game.spawn(MonsterKind::Orc.spawn(Position::new(3, 2)));

    let outcome = game.submit_intent(Intent::PickUp, &mut NoTarget)?;
    assert!(!outcome.turn_consumed);
    assert_eq!(game.player_fighter()?.hp, 100);
    assert_eq!(game.turn_number, 0);
    Ok(())
}

#[test]
fn test_death_ends_the_game() -> TombsResult<()> {
    let mut game = arena();
    game.player_fighter_mut_for_tests().hp = 2;
    game.spawn(MonsterKind::Troll.spawn(Position::new(3, 2)));

    let outcome = game.submit_intent(Intent::Wait, &mut NoTarget)?;
    assert!(outcome.game_over);
    assert_eq!(game.play_state, PlayState::Dead);
    assert!(outcome
        .notifications
        .iter()
        .any(|message| message.text == "You died!"));

    let outcome = game.submit_intent(Intent::Move(Direction::West), &mut NoTarget)?;
    assert_eq!(outcome.status, ActionStatus::Ignored);
    assert_eq!(game.turn_number, 1);
    Ok(())
}

#[test]
fn test_pathfinder_falls_back_to_steering() {
    // A wall splits the room; the only way round is a long detour
    let mut rows = vec!["#".repeat(40)];
    rows.push(format!("#{}#", ".".repeat(38)));
    rows.push(format!("{}.#", "#".repeat(38)));
    rows.push(format!("#{}#", ".".repeat(38)));
    rows.push("#".repeat(40));
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let level = Level::from_ascii(&rows);

    let from = Position::new(2, 1);
    let to = Position::new(3, 3);
    let step = next_step(&level, &HashSet::new(), from, to);
    assert_eq!(step, step_towards(from, to));
    assert_eq!(step, Position::new(0, 1));

    // Nearby goals still follow the path
    let step = next_step(&level, &HashSet::new(), Position::new(35, 1), Position::new(35, 3));
    assert_eq!(step, Position::new(1, 0));
}

/// Test-only access to the player's Fighter.
trait FighterAccess {
    fn player_fighter_mut_for_tests(&mut self) -> &mut Fighter;
}

impl FighterAccess for GameState {
    fn player_fighter_mut_for_tests(&mut self) -> &mut Fighter {
        self.player_mut().unwrap().fighter.as_mut().unwrap()
    }
}
