//! # Entity System
//!
//! Every object in a level, from the player to a dropped scroll, is a plain
//! [`Entity`] value. Behavior is attached through optional components:
//!
//! - [`Fighter`]: hit points and combat stats
//! - [`Ai`]: autonomous turn-taking
//! - [`Item`]: can be picked up and used
//! - [`Equipment`]: can be worn in a slot for stat bonuses
//!
//! Components never point back at their owner; operations that need both take
//! the entity's [`EntityId`] and look it up in the game state.

use crate::{config, new_entity_id, Color, EntityId, Position};
use serde::{Deserialize, Serialize};

/// Draw layer of an entity. Lower layers are drawn first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RenderOrder {
    Stairs,
    Corpse,
    Item,
    Actor,
}

/// What happens when a fighter's hit points run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathKind {
    /// Game over
    Player,
    /// Becomes inert remains and awards experience
    Monster,
}

/// Combat component.
///
/// `hp`, `xp` and the base stats live here; the effective power, defence and
/// max hp also include equipment bonuses and are computed by the game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fighter {
    pub base_max_hp: i32,
    pub hp: i32,
    pub base_defence: i32,
    pub base_power: i32,
    /// Experience awarded on death for monsters, accumulated experience for the player
    pub xp: i32,
    pub level: u32,
    pub death: DeathKind,
}

impl Fighter {
    /// Creates a fighter at full health, level 1.
    pub fn new(hp: i32, defence: i32, power: i32, xp: i32, death: DeathKind) -> Self {
        Self {
            base_max_hp: hp,
            hp,
            base_defence: defence,
            base_power: power,
            xp,
            level: 1,
            death,
        }
    }

    /// Whether this fighter is still standing.
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Experience required to reach the next level.
    ///
    /// ```
    /// use tombs::{DeathKind, Fighter};
    ///
    /// let fighter = Fighter::new(100, 1, 2, 0, DeathKind::Player);
    /// assert_eq!(fighter.level_up_threshold(), 350);
    /// ```
    pub fn level_up_threshold(&self) -> i32 {
        config::LEVEL_UP_BASE + self.level as i32 * config::LEVEL_UP_FACTOR
    }
}

/// Monster behavior.
///
/// Confusion holds on to the behavior it displaced and hands it back once it
/// wears off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ai {
    /// Chase the player while visible and attack when adjacent
    Basic,
    /// Stumble randomly for a number of turns
    Confused { remaining: u32, previous: Box<Ai> },
}

impl Ai {
    /// Wraps an existing behavior in confusion.
    pub fn confused(previous: Ai, turns: u32) -> Self {
        Ai::Confused {
            remaining: turns,
            previous: Box::new(previous),
        }
    }
}

/// What using an item does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemEffect {
    /// Restore hit points to the user
    Heal,
    /// Strike the closest visible monster in range
    Lightning,
    /// Confuse a chosen visible monster
    Confuse,
    /// Damage every fighter around a chosen visible tile
    Fireball,
}

/// Marks an entity as something that can be carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Item {
    pub effect: Option<ItemEffect>,
}

/// Equipment slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    RightHand,
    LeftHand,
}

impl Slot {
    pub fn label(self) -> &'static str {
        match self {
            Slot::RightHand => "right hand",
            Slot::LeftHand => "left hand",
        }
    }
}

/// Wearable component granting stat bonuses while equipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub slot: Slot,
    pub power_bonus: i32,
    pub defence_bonus: i32,
    pub max_hp_bonus: i32,
    pub is_equipped: bool,
}

impl Equipment {
    /// Creates unequipped equipment for a slot with no bonuses.
    pub fn new(slot: Slot) -> Self {
        Self {
            slot,
            power_bonus: 0,
            defence_bonus: 0,
            max_hp_bonus: 0,
            is_equipped: false,
        }
    }

    pub fn with_power(mut self, bonus: i32) -> Self {
        self.power_bonus = bonus;
        self
    }

    pub fn with_defence(mut self, bonus: i32) -> Self {
        self.defence_bonus = bonus;
        self
    }
}

/// A thing in the dungeon.
///
/// # Examples
///
/// ```
/// use tombs::{Color, Entity, Equipment, Position, Slot};
///
/// let sword = Entity::new(Position::new(3, 4), '/', "sword", Color::SKY)
///     .with_equipment(Equipment::new(Slot::RightHand).with_power(3));
///
/// // Equipment is always carried as an item
/// assert!(sword.item.is_some());
/// assert!(!sword.blocks);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Stable identity, survives save/load
    pub id: EntityId,
    pub position: Position,
    pub glyph: char,
    pub color: Color,
    pub name: String,
    /// Other blocking entities cannot share this tile
    pub blocks: bool,
    /// Drawn on explored tiles even when out of sight
    pub always_visible: bool,
    pub render_order: RenderOrder,
    pub fighter: Option<Fighter>,
    pub ai: Option<Ai>,
    pub item: Option<Item>,
    pub equipment: Option<Equipment>,
}

impl Entity {
    /// Creates a bare, non-blocking entity with no components.
    pub fn new(position: Position, glyph: char, name: impl Into<String>, color: Color) -> Self {
        Self {
            id: new_entity_id(),
            position,
            glyph,
            color,
            name: name.into(),
            blocks: false,
            always_visible: false,
            render_order: RenderOrder::Item,
            fighter: None,
            ai: None,
            item: None,
            equipment: None,
        }
    }

    /// Creates the player character with starting stats.
    pub fn player(position: Position) -> Self {
        Entity::new(position, '@', "player", Color::WHITE)
            .blocking()
            .with_fighter(Fighter::new(100, 1, 2, 0, DeathKind::Player))
    }

    /// Creates a down staircase.
    pub fn stairs(position: Position) -> Self {
        let mut stairs = Entity::new(position, '<', "stairs", Color::WHITE).always_visible();
        stairs.render_order = RenderOrder::Stairs;
        stairs
    }

    /// Makes the entity block movement.
    pub fn blocking(mut self) -> Self {
        self.blocks = true;
        self
    }

    pub fn always_visible(mut self) -> Self {
        self.always_visible = true;
        self
    }

    /// Attaches a Fighter. Fighters are drawn on the actor layer.
    pub fn with_fighter(mut self, fighter: Fighter) -> Self {
        self.fighter = Some(fighter);
        self.render_order = RenderOrder::Actor;
        self
    }

    pub fn with_ai(mut self, ai: Ai) -> Self {
        self.ai = Some(ai);
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.item = Some(item);
        self.render_order = RenderOrder::Item;
        self
    }

    /// Attaches Equipment, adding an empty Item if none is present.
    pub fn with_equipment(mut self, equipment: Equipment) -> Self {
        self.equipment = Some(equipment);
        if self.item.is_none() {
            self = self.with_item(Item::default());
        }
        self
    }

    /// Whether the entity is an equipped piece of equipment.
    pub fn is_equipped(&self) -> bool {
        self.equipment.map(|e| e.is_equipped).unwrap_or(false)
    }

    /// Whether the entity fights and is still alive.
    pub fn is_alive(&self) -> bool {
        self.fighter.as_ref().map(Fighter::is_alive).unwrap_or(false)
    }

    pub fn distance_to(&self, other: &Entity) -> f64 {
        self.position.euclidean_distance(other.position)
    }
}
