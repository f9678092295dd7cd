//! # Encounter Generation
//!
//! Monster kinds, their depth-scaled spawn weights, and per-room placement.

use crate::{
    weighted_choice_index, Ai, Color, DeathKind, DepthTable, Entity, Fighter, Level, Position,
    Room, SpawnWeight,
};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

/// Upper bound on monsters rolled per room, by depth.
pub const MAX_MONSTERS_PER_ROOM: DepthTable = DepthTable(&[(2, 1), (3, 4), (5, 6)]);

/// Monsters that can be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonsterKind {
    Orc,
    Troll,
}

impl MonsterKind {
    pub const ALL: [MonsterKind; 2] = [MonsterKind::Orc, MonsterKind::Troll];

    /// How often this kind is picked relative to the others.
    pub fn spawn_weight(self) -> SpawnWeight {
        match self {
            MonsterKind::Orc => SpawnWeight::Fixed(80),
            MonsterKind::Troll => SpawnWeight::Scaled(DepthTable(&[(15, 3), (30, 5), (60, 7)])),
        }
    }

    /// Builds a monster of this kind at a position.
    ///
    /// # Examples
    ///
    /// ```
    /// use tombs::{MonsterKind, Position};
    ///
    /// let orc = MonsterKind::Orc.spawn(Position::new(4, 4));
    /// assert_eq!(orc.glyph, 'o');
    /// assert_eq!(orc.fighter.unwrap().xp, 35);
    /// ```
    pub fn spawn(self, position: Position) -> Entity {
        let (glyph, name, color, fighter) = match self {
            MonsterKind::Orc => (
                'o',
                "orc",
                Color::DESATURATED_GREEN,
                Fighter::new(20, 0, 4, 35, DeathKind::Monster),
            ),
            MonsterKind::Troll => (
                'T',
                "troll",
                Color::DARKER_GREEN,
                Fighter::new(30, 2, 8, 100, DeathKind::Monster),
            ),
        };
        Entity::new(position, glyph, name, color)
            .blocking()
            .with_fighter(fighter)
            .with_ai(Ai::Basic)
    }
}

/// Picks a monster kind for a depth by weighted random choice.
pub fn choose_monster(depth: u32, rng: &mut StdRng) -> Option<MonsterKind> {
    let weights: Vec<u32> = MonsterKind::ALL
        .iter()
        .map(|kind| kind.spawn_weight().at_depth(depth))
        .collect();
    weighted_choice_index(&weights, rng).map(|index| MonsterKind::ALL[index])
}

/// A uniformly random interior tile of a room, if it has any.
pub(crate) fn random_interior(room: &Room, rng: &mut StdRng) -> Option<Position> {
    if room.x2 - room.x1 < 2 || room.y2 - room.y1 < 2 {
        return None;
    }
    Some(Position::new(
        rng.gen_range(room.x1 + 1..room.x2),
        rng.gen_range(room.y1 + 1..room.y2),
    ))
}

/// Whether a spawn point is free: open terrain, not the player start and not
/// under another blocking entity.
pub(crate) fn is_free_spawn(
    level: &Level,
    entities: &[Entity],
    player_start: Position,
    pos: Position,
) -> bool {
    !level.is_blocked(pos)
        && pos != player_start
        && !entities.iter().any(|entity| entity.blocks && entity.position == pos)
}

/// Rolls and places monsters for one room.
///
/// Each roll picks a random interior tile; occupied tiles are skipped rather
/// than re-rolled, so rooms often end up with fewer than the rolled count.
pub fn place_monsters(
    room: &Room,
    depth: u32,
    level: &Level,
    entities: &mut Vec<Entity>,
    player_start: Position,
    rng: &mut StdRng,
) {
    let count = rng.gen_range(0..=MAX_MONSTERS_PER_ROOM.value_at(depth));
    for _ in 0..count {
        let Some(pos) = random_interior(room, rng) else {
            continue;
        };
        if !is_free_spawn(level, entities, player_start, pos) {
            continue;
        }
        if let Some(kind) = choose_monster(depth, rng) {
            debug!("Spawning {:?} at {:?}", kind, pos);
            entities.push(kind.spawn(pos));
        }
    }
}
