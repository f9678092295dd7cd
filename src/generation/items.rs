//! # Item Generation
//!
//! Item kinds, their spawn weights and per-room placement.

use crate::generation::encounters::{is_free_spawn, random_interior};
use crate::{
    weighted_choice_index, Color, DepthTable, Entity, Equipment, Item, ItemEffect, Level,
    Position, Room, Slot, SpawnWeight,
};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

/// Upper bound on items rolled per room, by depth.
pub const MAX_ITEMS_PER_ROOM: DepthTable = DepthTable(&[(1, 1), (2, 4)]);

/// Items that can be generated or handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    HealingPotion,
    LightningScroll,
    FireballScroll,
    ConfusionScroll,
    Sword,
    Shield,
    /// Starting weapon; never generated
    Dagger,
}

impl ItemKind {
    /// Kinds that appear on the dungeon floor.
    pub const SPAWNABLE: [ItemKind; 6] = [
        ItemKind::HealingPotion,
        ItemKind::LightningScroll,
        ItemKind::FireballScroll,
        ItemKind::ConfusionScroll,
        ItemKind::Sword,
        ItemKind::Shield,
    ];

    pub fn spawn_weight(self) -> SpawnWeight {
        match self {
            ItemKind::HealingPotion => SpawnWeight::Fixed(35),
            ItemKind::LightningScroll => SpawnWeight::Scaled(DepthTable(&[(25, 4)])),
            ItemKind::FireballScroll => SpawnWeight::Scaled(DepthTable(&[(25, 6)])),
            ItemKind::ConfusionScroll => SpawnWeight::Scaled(DepthTable(&[(10, 2)])),
            ItemKind::Sword => SpawnWeight::Scaled(DepthTable(&[(5, 4)])),
            ItemKind::Shield => SpawnWeight::Scaled(DepthTable(&[(15, 8)])),
            ItemKind::Dagger => SpawnWeight::Fixed(0),
        }
    }

    /// Builds an item of this kind at a position.
    ///
    /// ```
    /// use tombs::{ItemEffect, ItemKind, Position};
    ///
    /// let potion = ItemKind::HealingPotion.spawn(Position::new(2, 2));
    /// assert_eq!(potion.item.unwrap().effect, Some(ItemEffect::Heal));
    ///
    /// let sword = ItemKind::Sword.spawn(Position::new(2, 2));
    /// assert!(sword.always_visible);
    /// assert_eq!(sword.equipment.unwrap().power_bonus, 3);
    /// ```
    pub fn spawn(self, position: Position) -> Entity {
        let scroll = |name: &str, effect: ItemEffect| {
            Entity::new(position, '#', name, Color::LIGHT_YELLOW).with_item(Item {
                effect: Some(effect),
            })
        };

        let item = match self {
            ItemKind::HealingPotion => Entity::new(position, '!', "healing potion", Color::VIOLET)
                .with_item(Item {
                    effect: Some(ItemEffect::Heal),
                }),
            ItemKind::LightningScroll => scroll("scroll of lightning bolt", ItemEffect::Lightning),
            ItemKind::FireballScroll => scroll("scroll of fireball", ItemEffect::Fireball),
            ItemKind::ConfusionScroll => scroll("scroll of confusion", ItemEffect::Confuse),
            ItemKind::Sword => Entity::new(position, '/', "sword", Color::SKY)
                .with_equipment(Equipment::new(Slot::RightHand).with_power(3)),
            ItemKind::Shield => Entity::new(position, '[', "shield", Color::DARKER_ORANGE)
                .with_equipment(Equipment::new(Slot::LeftHand).with_defence(1)),
            ItemKind::Dagger => Entity::new(position, '-', "dagger", Color::SKY)
                .with_equipment(Equipment::new(Slot::RightHand).with_power(2)),
        };
        // Floor loot stays on the map once its tile has been seen
        item.always_visible()
    }
}

/// Picks an item kind for a depth by weighted random choice.
pub fn choose_item(depth: u32, rng: &mut StdRng) -> Option<ItemKind> {
    let weights: Vec<u32> = ItemKind::SPAWNABLE
        .iter()
        .map(|kind| kind.spawn_weight().at_depth(depth))
        .collect();
    weighted_choice_index(&weights, rng).map(|index| ItemKind::SPAWNABLE[index])
}

/// Rolls and places items for one room.
pub fn place_items(
    room: &Room,
    depth: u32,
    level: &Level,
    entities: &mut Vec<Entity>,
    player_start: Position,
    rng: &mut StdRng,
) {
    let count = rng.gen_range(0..=MAX_ITEMS_PER_ROOM.value_at(depth));
    for _ in 0..count {
        let Some(pos) = random_interior(room, rng) else {
            continue;
        };
        if !is_free_spawn(level, entities, player_start, pos) {
            continue;
        }
        if let Some(kind) = choose_item(depth, rng) {
            debug!("Placing {:?} at {:?}", kind, pos);
            entities.push(kind.spawn(pos));
        }
    }
}
